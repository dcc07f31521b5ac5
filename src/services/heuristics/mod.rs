//! Risk Heuristics
//!
//! Deterministic keyword rules used whenever generative analysis is
//! unavailable or incomplete.

pub mod clauses;
pub mod heatmap;
pub mod lead;

pub use clauses::{
    pick_suspicious_clauses, pick_suspicious_clauses_with, split_paragraphs, FlagRule,
    DEFAULT_CLAUSE_LIMIT, FLAG_RULES,
};
pub use heatmap::{compute_heatmap, RiskCategory, RISK_MATRIX};
pub use lead::{fallback_summary, split_sentences};
