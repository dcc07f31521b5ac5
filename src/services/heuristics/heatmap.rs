//! Fallback Risk Heatmap
//!
//! Fixed five-category taxonomy scored by keyword presence.

use policy_guardian_core::{clamp_risk, Evidence, RiskHeatmapEntry};

/// One heatmap category with its baseline and trigger keywords.
#[derive(Debug, Clone, Copy)]
pub struct RiskCategory {
    pub category: &'static str,
    pub baseline: u8,
    pub keywords: &'static [&'static str],
}

/// Categories in display order.
pub const RISK_MATRIX: [RiskCategory; 5] = [
    RiskCategory {
        category: "Data Collection",
        baseline: 2,
        keywords: &[
            "collect",
            "information you provide",
            "personal information",
            "metadata",
            "usage data",
        ],
    },
    RiskCategory {
        category: "Data Sharing & Selling",
        baseline: 1,
        keywords: &[
            "share",
            "third party",
            "sell",
            "broker",
            "affiliate",
            "advertising partner",
        ],
    },
    RiskCategory {
        category: "Tracking & Analytics",
        baseline: 1,
        keywords: &["cookies", "tracking", "analytics", "beacon", "pixels"],
    },
    RiskCategory {
        category: "Dispute Resolution",
        baseline: 1,
        keywords: &[
            "arbitration",
            "waive",
            "class action",
            "indemnify",
            "liability",
        ],
    },
    RiskCategory {
        category: "Account & Cancellation",
        baseline: 1,
        keywords: &[
            "automatic renewal",
            "termination",
            "cancel",
            "non-refundable",
            "perpetual",
        ],
    },
];

/// One entry per category: baseline plus the number of distinct keywords
/// present (case-insensitive), clamped to 1-5. Evidence lists the keywords
/// found.
pub fn compute_heatmap(text: &str) -> Vec<RiskHeatmapEntry> {
    let lower = text.to_lowercase();
    RISK_MATRIX
        .iter()
        .map(|category| {
            let found: Vec<String> = category
                .keywords
                .iter()
                .filter(|kw| lower.contains(*kw))
                .map(|kw| kw.to_string())
                .collect();
            RiskHeatmapEntry {
                category: category.category.to_string(),
                risk_level: clamp_risk(category.baseline as i64 + found.len() as i64),
                evidence: Evidence::Keywords(found),
            }
        })
        .collect()
}
