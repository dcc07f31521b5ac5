//! Generative Analysis Adapter
//!
//! Wraps the optional capabilities behind calls that never fail: absence,
//! transport errors and malformed replies all come back as `None` so the
//! orchestrator can fall back to the keyword heuristics.

use policy_guardian_core::{PageType, SuspiciousClause};
use policy_guardian_llm::Message;
use tracing::{debug, warn};

use super::capability::AiCapabilities;
use super::json_extract::{parse_raw_analysis, RawAnalysis};
use super::prompts::{analysis_prompt, analysis_request_options, analysis_system_prompt};
use super::rewriter::enrich_clauses;
use super::summarizer::run_summarizer;

/// Never-failing front for the generative capabilities.
#[derive(Debug, Clone, Default)]
pub struct GenerativeAdapter {
    capabilities: AiCapabilities,
}

impl GenerativeAdapter {
    pub fn new(capabilities: AiCapabilities) -> Self {
        Self { capabilities }
    }

    pub fn capabilities(&self) -> &AiCapabilities {
        &self.capabilities
    }

    /// Ask the language model for a structured analysis of `text`.
    pub async fn try_analyze(&self, text: &str, page_type: Option<PageType>) -> Option<RawAnalysis> {
        let model = self.capabilities.language_model.get()?;

        let response = match model
            .send_message(
                vec![Message::user(analysis_prompt(text, page_type))],
                Some(analysis_system_prompt(page_type)),
                analysis_request_options(),
            )
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(provider = model.name(), error = %e, "Generative analysis failed");
                return None;
            }
        };

        let Some(reply) = response.text() else {
            warn!(provider = model.name(), "Generative analysis returned no content");
            return None;
        };

        match parse_raw_analysis(reply) {
            Ok(raw) => {
                debug!(
                    clauses = raw.suspicious_clauses.len(),
                    heatmap = raw.risk_heatmap.len(),
                    "Parsed generative analysis"
                );
                Some(raw)
            }
            Err(e) => {
                warn!(error = %e, "Unable to parse JSON from model response");
                None
            }
        }
    }

    /// Best-effort plain-language enrichment.
    pub async fn enrich_clauses(&self, clauses: Vec<SuspiciousClause>) -> Vec<SuspiciousClause> {
        if clauses.is_empty() {
            return clauses;
        }
        enrich_clauses(&self.capabilities.rewriter, clauses).await
    }

    /// Generative summary within `max_words`, if a summarizer is available.
    pub async fn summarize(&self, text: &str, max_words: usize) -> Option<String> {
        run_summarizer(&self.capabilities.summarizer, text, max_words).await
    }
}
