//! Output Normalization
//!
//! Coerces model-produced heatmaps and clauses into the bounded shapes the
//! rest of the system relies on.

use std::collections::HashSet;

use policy_guardian_core::{clamp_risk, Evidence, RiskHeatmapEntry, SuspiciousClause, MIN_RISK};
use serde_json::Value;

use crate::models::settings::AnalysisConfig;
use crate::services::generative::{RawClause, RawHeatmapEntry};
use crate::utils::text::truncate_chars;

/// Coerce a loosely typed score onto the 1-5 scale.
///
/// Numbers and numeric strings are rounded and clamped; zero, non-numeric
/// and missing values become 1.
pub fn coerce_risk(value: Option<&Value>) -> u8 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Bool(true)) => Some(1.0),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() && n != 0.0 => clamp_risk(n.round() as i64),
        _ => MIN_RISK,
    }
}

/// Evidence from a free-form JSON value.
pub fn coerce_evidence(value: Option<&Value>) -> Evidence {
    match value {
        None | Some(Value::Null) => Evidence::default(),
        Some(Value::String(s)) => Evidence::Text(s.clone()),
        Some(Value::Array(items)) => Evidence::Keywords(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        ),
        Some(other) => Evidence::Text(other.to_string()),
    }
}

/// Clamp levels, default missing fields and keep the first entry per
/// category (case-insensitive).
pub fn normalize_heatmap(raw: Vec<RawHeatmapEntry>) -> Vec<RiskHeatmapEntry> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(|entry| {
            let category = entry.category.unwrap_or_default().trim().to_string();
            if !seen.insert(category.to_lowercase()) {
                return None;
            }
            Some(RiskHeatmapEntry {
                risk_level: coerce_risk(entry.risk_level.as_ref()),
                evidence: coerce_evidence(entry.evidence.as_ref()),
                category,
            })
        })
        .collect()
}

/// Clamp scores, default missing fields, cut excerpts and cap the list.
pub fn normalize_clauses(raw: Vec<RawClause>, config: &AnalysisConfig) -> Vec<SuspiciousClause> {
    raw.into_iter()
        .take(config.max_clauses)
        .map(|clause| SuspiciousClause {
            excerpt: truncate_chars(&clause.excerpt.unwrap_or_default(), config.max_excerpt_chars)
                .to_string(),
            reason: clause.reason.unwrap_or_default(),
            risk_score: coerce_risk(clause.risk_score.as_ref()),
            plain_language: None,
        })
        .collect()
}
