//! Generative Analysis
//!
//! Optional language-model, summarizer and rewriter capabilities, and the
//! never-failing adapter the orchestrator calls them through.

pub mod adapter;
pub mod capability;
pub mod json_extract;
pub mod prompts;
pub mod rewriter;
pub mod summarizer;

pub use adapter::GenerativeAdapter;
pub use capability::{AiCapabilities, Capability};
pub use json_extract::{
    extract_json_object, parse_raw_analysis, ParseError, RawAnalysis, RawClause, RawHeatmapEntry,
};
pub use rewriter::{enrich_clauses, LlmRewriter, Rewriter, PLAIN_LANGUAGE_WORD_LIMIT};
pub use summarizer::{run_summarizer, LlmSummarizer, SummaryOutput, SummaryStyle, Summarizer};
