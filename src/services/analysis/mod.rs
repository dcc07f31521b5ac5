//! Policy Analysis
//!
//! Orchestration of generative and heuristic analysis, and the
//! normalization of model output.

pub mod normalize;
pub mod orchestrator;

pub use normalize::{coerce_evidence, coerce_risk, normalize_clauses, normalize_heatmap};
pub use orchestrator::{AnalysisOrchestrator, AnalysisSource};
