//! Suspicious Clause Extraction
//!
//! Greedy first-match scan over blank-line separated paragraphs.

use std::sync::OnceLock;

use policy_guardian_core::{clamp_risk, SuspiciousClause};
use regex::Regex;

use crate::models::settings::AnalysisConfig;
use crate::utils::text::{char_len, truncate_chars};

/// Keyword rule flagging a paragraph.
#[derive(Debug, Clone, Copy)]
pub struct FlagRule {
    pub keyword: &'static str,
    pub reason: &'static str,
    pub base_score: u8,
}

/// Rules in priority order. The first match wins.
pub const FLAG_RULES: [FlagRule; 10] = [
    FlagRule {
        keyword: "perpetual",
        reason: "Grants the company perpetual rights",
        base_score: 3,
    },
    FlagRule {
        keyword: "irrevocable",
        reason: "Irrevocable license or consent",
        base_score: 3,
    },
    FlagRule {
        keyword: "binding arbitration",
        reason: "Forces binding arbitration for disputes",
        base_score: 4,
    },
    FlagRule {
        keyword: "class action",
        reason: "Waives class action rights",
        base_score: 4,
    },
    FlagRule {
        keyword: "sell",
        reason: "Allows selling personal data",
        base_score: 4,
    },
    FlagRule {
        keyword: "third party",
        reason: "Shares data with third parties",
        base_score: 3,
    },
    FlagRule {
        keyword: "tracking",
        reason: "Enables extensive tracking",
        base_score: 2,
    },
    FlagRule {
        keyword: "consent to share",
        reason: "Implied consent to share data broadly",
        base_score: 3,
    },
    FlagRule {
        keyword: "indemnif",
        reason: "Requires users to indemnify the company",
        base_score: 4,
    },
    FlagRule {
        keyword: "waive",
        reason: "Waives important legal rights",
        base_score: 3,
    },
];

/// Default clause cap.
pub const DEFAULT_CLAUSE_LIMIT: usize = 8;

fn paragraph_break() -> Option<&'static Regex> {
    static BREAK: OnceLock<Option<Regex>> = OnceLock::new();
    BREAK.get_or_init(|| Regex::new(r"\n\s*\n").ok()).as_ref()
}

/// Split on blank-line boundaries, trimming and dropping empty chunks.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    let chunks: Vec<&str> = match paragraph_break() {
        Some(re) => re.split(text).collect(),
        None => vec![text],
    };
    chunks
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Clauses using the default budgets (400-char excerpts, +1 above 500 chars).
pub fn pick_suspicious_clauses(text: &str, limit: usize) -> Vec<SuspiciousClause> {
    let config = AnalysisConfig {
        max_clauses: limit,
        ..Default::default()
    };
    pick_suspicious_clauses_with(text, &config)
}

/// Scan paragraphs in order and flag each with the first matching rule.
/// Stops once `max_clauses` clauses are collected.
pub fn pick_suspicious_clauses_with(text: &str, config: &AnalysisConfig) -> Vec<SuspiciousClause> {
    let mut clauses = Vec::new();
    if config.max_clauses == 0 {
        return clauses;
    }

    for paragraph in split_paragraphs(text) {
        let lower = paragraph.to_lowercase();
        let Some(rule) = FLAG_RULES.iter().find(|r| lower.contains(r.keyword)) else {
            continue;
        };

        let long_bonus = if char_len(paragraph) > config.long_paragraph_chars {
            1
        } else {
            0
        };
        clauses.push(SuspiciousClause {
            excerpt: truncate_chars(paragraph, config.max_excerpt_chars).to_string(),
            reason: rule.reason.to_string(),
            risk_score: clamp_risk(rule.base_score as i64 + long_bonus),
            plain_language: None,
        });

        if clauses.len() >= config.max_clauses {
            break;
        }
    }

    clauses
}
