//! Summary Digest
//!
//! Deterministic, word-bounded text rendering of a structured analysis. Used
//! as the seed for generative summarization and as the last-resort summary.

use policy_guardian_core::{Analysis, PageType, RiskHeatmapEntry, SuspiciousClause};

use crate::models::settings::AnalysisConfig;
use crate::utils::text::ELLIPSIS;

/// Text used for a clause that carries no explanation at all.
pub const GENERIC_CLAUSE_TEXT: &str = "Flagged clause with no explanation provided.";

/// Descriptive label for a risk score.
pub fn risk_label(score: f64) -> &'static str {
    if score >= 4.5 {
        "critical"
    } else if score >= 4.0 {
        "high"
    } else if score >= 3.0 {
        "elevated"
    } else if score >= 2.0 {
        "moderate"
    } else {
        "low"
    }
}

fn render_entry(entry: &RiskHeatmapEntry) -> String {
    let label = risk_label(entry.risk_level as f64);
    if entry.evidence.is_empty() {
        format!("{} ({}/5, {})", entry.category, entry.risk_level, label)
    } else {
        format!(
            "{} ({}/5, {}; evidence: {})",
            entry.category,
            entry.risk_level,
            label,
            entry.evidence.render()
        )
    }
}

fn clause_explanation(clause: &SuspiciousClause) -> &str {
    [
        clause.plain_language.as_deref(),
        Some(clause.reason.as_str()),
        Some(clause.excerpt.as_str()),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .find(|text| !text.is_empty())
    .unwrap_or(GENERIC_CLAUSE_TEXT)
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{} {}", count, one)
    } else {
        format!("{} {}", count, many)
    }
}

/// Digest with the default budgets (600 words, 5 clause lines).
pub fn build_digest(analysis: &Analysis, page_type: Option<PageType>) -> String {
    build_digest_with(analysis, page_type, &AnalysisConfig::default())
}

/// Render header, risk trends, clause count and ranked clause lines, then
/// cut the whole to `digest_word_limit` words.
pub fn build_digest_with(
    analysis: &Analysis,
    page_type: Option<PageType>,
    config: &AnalysisConfig,
) -> String {
    let document = PageType::describe(page_type);
    let mut lines = Vec::new();

    match analysis.mean_risk() {
        Some(mean) => lines.push(format!(
            "Policy Guardian review of this {}: overall risk is {} (average {:.1}/5 across {}).",
            document,
            risk_label(mean),
            mean,
            plural(analysis.risk_heatmap.len(), "category", "categories"),
        )),
        None => lines.push(format!(
            "Policy Guardian review of this {}: no category scores were produced.",
            document
        )),
    }

    let high: Vec<String> = analysis
        .risk_heatmap
        .iter()
        .filter(|e| e.risk_level >= 4)
        .map(render_entry)
        .collect();
    let medium: Vec<String> = analysis
        .risk_heatmap
        .iter()
        .filter(|e| e.risk_level == 3)
        .map(render_entry)
        .collect();

    if !high.is_empty() {
        lines.push(format!("High-risk areas: {}.", high.join("; ")));
    }
    if !medium.is_empty() {
        lines.push(format!("Medium-risk areas: {}.", medium.join("; ")));
    }
    if high.is_empty() && medium.is_empty() && !analysis.risk_heatmap.is_empty() {
        lines.push("No category scored above moderate risk.".to_string());
    }

    let clauses = &analysis.suspicious_clauses;
    if clauses.is_empty() {
        lines.push("No suspicious clauses were flagged.".to_string());
    } else {
        let shown = clauses.len().min(config.digest_clause_lines);
        lines.push(format!(
            "{} flagged; top {}:",
            plural(clauses.len(), "suspicious clause", "suspicious clauses"),
            shown
        ));
        for (rank, clause) in clauses.iter().take(shown).enumerate() {
            lines.push(format!(
                "{}. [{} {}/5] {}",
                rank + 1,
                risk_label(clause.risk_score as f64),
                clause.risk_score,
                clause_explanation(clause)
            ));
        }
        let omitted = clauses.len() - shown;
        if omitted > 0 {
            lines.push(format!(
                "{} not listed.",
                plural(omitted, "more clause", "more clauses")
            ));
        }
    }

    limit_lines_to_words(&lines, config.digest_word_limit)
}

/// Join lines with newlines, keeping at most `limit` words overall.
fn limit_lines_to_words(lines: &[String], limit: usize) -> String {
    let mut remaining = limit;
    let mut kept: Vec<String> = Vec::new();

    for line in lines {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() <= remaining {
            remaining -= words.len();
            kept.push(words.join(" "));
            continue;
        }
        if remaining > 0 {
            kept.push(format!("{}{}", words[..remaining].join(" "), ELLIPSIS));
        } else if let Some(last) = kept.last_mut() {
            last.push_str(ELLIPSIS);
        }
        break;
    }

    kept.join("\n")
}
