//! Analysis Results
//!
//! The structured output of a policy scan: a bounded summary, the flagged
//! clauses, and a per-category risk heatmap.

use serde::{Deserialize, Serialize};

/// Lowest risk level on the 1-5 scale.
pub const MIN_RISK: u8 = 1;
/// Highest risk level on the 1-5 scale.
pub const MAX_RISK: u8 = 5;

/// Clamp any integer score onto the 1-5 risk scale.
pub fn clamp_risk(value: i64) -> u8 {
    value.clamp(MIN_RISK as i64, MAX_RISK as i64) as u8
}

/// Evidence backing a heatmap entry.
///
/// The keyword fallback reports the matched keywords; generative analysis
/// usually reports a free-form sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Evidence {
    Keywords(Vec<String>),
    Text(String),
}

impl Evidence {
    /// Render as a single display string.
    pub fn render(&self) -> String {
        match self {
            Evidence::Keywords(keywords) => keywords.join(", "),
            Evidence::Text(text) => text.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Evidence::Keywords(keywords) => keywords.is_empty(),
            Evidence::Text(text) => text.trim().is_empty(),
        }
    }
}

impl Default for Evidence {
    fn default() -> Self {
        Evidence::Text(String::new())
    }
}

/// Risk score for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskHeatmapEntry {
    pub category: String,
    /// Always within [1, 5]
    pub risk_level: u8,
    #[serde(default)]
    pub evidence: Evidence,
}

/// A flagged excerpt with its rationale and severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspiciousClause {
    pub excerpt: String,
    pub reason: String,
    /// Always within [1, 5]
    pub risk_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain_language: Option<String>,
}

/// Completed analysis of a policy page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub summary: String,
    pub suspicious_clauses: Vec<SuspiciousClause>,
    pub risk_heatmap: Vec<RiskHeatmapEntry>,
}

impl Analysis {
    /// Mean risk level across heatmap entries, if any.
    pub fn mean_risk(&self) -> Option<f64> {
        if self.risk_heatmap.is_empty() {
            return None;
        }
        let total: u32 = self.risk_heatmap.iter().map(|e| e.risk_level as u32).sum();
        Some(total as f64 / self.risk_heatmap.len() as f64)
    }
}
