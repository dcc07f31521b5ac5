//! Analysis Orchestrator
//!
//! Always produces a complete analysis: generative output when it is
//! available and usable, keyword heuristics for anything missing, and a
//! digest-based summary on top.

use policy_guardian_core::{Analysis, PageType, RiskHeatmapEntry, SuspiciousClause};
use tracing::{debug, info};

use super::normalize::{normalize_clauses, normalize_heatmap};
use crate::models::settings::AnalysisConfig;
use crate::services::digest::build_digest_with;
use crate::services::generative::{GenerativeAdapter, RawAnalysis};
use crate::services::heuristics::{compute_heatmap, pick_suspicious_clauses_with};
use crate::utils::text::{cap_words, truncate_chars};

/// Where the structured parts of an analysis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisSource {
    Generative,
    Fallback,
}

/// Composes the generative adapter with the heuristic fallback.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOrchestrator {
    adapter: GenerativeAdapter,
    config: AnalysisConfig,
}

impl AnalysisOrchestrator {
    pub fn new(adapter: GenerativeAdapter, config: AnalysisConfig) -> Self {
        Self { adapter, config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn adapter(&self) -> &GenerativeAdapter {
        &self.adapter
    }

    /// Analyze page text. Never fails.
    pub async fn run_policy_analysis(&self, page_text: &str, page_type: Option<PageType>) -> Analysis {
        let text = truncate_chars(page_text, self.config.max_input_chars);
        debug!(
            input_chars = page_text.chars().count(),
            page_type = PageType::describe(page_type),
            "Running policy analysis"
        );

        let raw = self.adapter.try_analyze(text, page_type).await;
        let (risk_heatmap, suspicious_clauses, source) = self.structured_parts(text, raw);

        let suspicious_clauses = self.adapter.enrich_clauses(suspicious_clauses).await;

        let mut analysis = Analysis {
            summary: String::new(),
            suspicious_clauses,
            risk_heatmap,
        };
        analysis.summary = self.summarize(&analysis, page_type).await;

        info!(
            source = ?source,
            clauses = analysis.suspicious_clauses.len(),
            categories = analysis.risk_heatmap.len(),
            "Policy analysis complete"
        );
        analysis
    }

    /// Heatmap and clauses from the model output, with heuristic
    /// replacements for anything missing or empty.
    fn structured_parts(
        &self,
        text: &str,
        raw: Option<RawAnalysis>,
    ) -> (Vec<RiskHeatmapEntry>, Vec<SuspiciousClause>, AnalysisSource) {
        let Some(raw) = raw else {
            return (
                compute_heatmap(text),
                pick_suspicious_clauses_with(text, &self.config),
                AnalysisSource::Fallback,
            );
        };

        let heatmap = if raw.risk_heatmap.is_empty() {
            debug!("Model returned no heatmap; using keyword heatmap");
            compute_heatmap(text)
        } else {
            normalize_heatmap(raw.risk_heatmap)
        };

        let clauses = if raw.suspicious_clauses.is_empty() {
            debug!("Model returned no clauses; using keyword clauses");
            pick_suspicious_clauses_with(text, &self.config)
        } else {
            normalize_clauses(raw.suspicious_clauses, &self.config)
        };

        (heatmap, clauses, AnalysisSource::Generative)
    }

    /// Digest, condensed by the summarizer when available, else trimmed.
    async fn summarize(&self, analysis: &Analysis, page_type: Option<PageType>) -> String {
        let digest = build_digest_with(analysis, page_type, &self.config);
        let limit = self.config.summary_word_limit;

        match self.adapter.summarize(&digest, limit).await {
            Some(summary) => cap_words(&summary, limit),
            None => cap_words(&digest, limit),
        }
    }
}
