//! Settings Models
//!
//! Application configuration and settings data structures. Every tuning
//! constant of the classifier and the analysis pipeline lives here so it can
//! be adjusted without code changes.

use std::path::PathBuf;

use policy_guardian_llm::ProviderConfig;
use serde::{Deserialize, Serialize};

/// Environment variable consulted for the provider API key.
pub const API_KEY_ENV: &str = "POLICY_GUARDIAN_API_KEY";

/// Application configuration stored in config.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Page classifier weights and thresholds
    pub classifier: ClassifierConfig,
    /// Structured page text limits
    pub structure: StructureConfig,
    /// Analysis pipeline budgets
    pub analysis: AnalysisConfig,
    /// Generative backend; `None` runs the keyword fallback only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderConfig>,
    /// Directory for session-scoped scan state; `None` keeps state in memory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
}

/// Page classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassifierConfig {
    pub url_weight: f64,
    pub title_weight: f64,
    pub heading_weight: f64,
    pub body_weight: f64,
    /// Added to privacy when the URL mentions "privacy"
    pub url_privacy_bonus: f64,
    /// Added to terms when the URL mentions "terms" or "conditions"
    pub url_terms_bonus: f64,
    /// Added to privacy when the title mentions "policy"
    pub title_policy_bonus: f64,
    /// Minimum winning score for a detection
    pub threshold: f64,
    /// Confidence = min(cap, score / divisor)
    pub confidence_divisor: f64,
    pub confidence_cap: f64,
    /// Number of leading headings inspected
    pub max_headings: usize,
    /// Characters of structured text used as the body sample
    pub body_sample_chars: usize,
    /// Quiet period after the last content mutation before re-classifying
    pub debounce_ms: u64,
    /// Confidence shift that counts as a new detection
    pub material_change_delta: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            url_weight: 2.5,
            title_weight: 2.0,
            heading_weight: 1.5,
            body_weight: 1.0,
            url_privacy_bonus: 1.5,
            url_terms_bonus: 1.5,
            title_policy_bonus: 1.2,
            threshold: 2.8,
            confidence_divisor: 6.0,
            confidence_cap: 0.99,
            max_headings: 4,
            body_sample_chars: 4000,
            debounce_ms: 1200,
            material_change_delta: 0.05,
        }
    }
}

/// Limits applied when structuring page text
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructureConfig {
    pub max_chars: usize,
    pub max_blocks: usize,
    /// Blocks shorter than this are dropped
    pub min_block_chars: usize,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            max_chars: 60_000,
            max_blocks: 350,
            min_block_chars: 3,
        }
    }
}

/// Analysis pipeline budgets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfig {
    /// Page text is cut to this many characters before any model call
    pub max_input_chars: usize,
    pub max_clauses: usize,
    pub max_excerpt_chars: usize,
    /// Paragraphs longer than this get a +1 clause score
    pub long_paragraph_chars: usize,
    pub summary_word_limit: usize,
    pub digest_word_limit: usize,
    /// Clauses explained individually in the digest
    pub digest_clause_lines: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_input_chars: 24_000,
            max_clauses: 8,
            max_excerpt_chars: 400,
            long_paragraph_chars: 500,
            summary_word_limit: 300,
            digest_word_limit: 600,
            digest_clause_lines: 5,
        }
    }
}

impl AppConfig {
    /// Fill a missing provider API key from the environment.
    pub fn with_env_api_key(mut self) -> Self {
        if let Some(provider) = self.provider.as_mut() {
            if provider.api_key.is_none() {
                provider.api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
            }
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let c = &self.classifier;
        if c.threshold <= 0.0 {
            return Err("classifier.threshold must be positive".to_string());
        }
        if c.confidence_divisor <= 0.0 {
            return Err("classifier.confidenceDivisor must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&c.confidence_cap) {
            return Err(format!(
                "classifier.confidenceCap must be within 0-1, got {}",
                c.confidence_cap
            ));
        }
        if c.max_headings == 0 || c.body_sample_chars == 0 {
            return Err("classifier heading and body sample sizes must be non-zero".to_string());
        }

        if self.structure.max_blocks == 0 || self.structure.max_chars == 0 {
            return Err("structure limits must be non-zero".to_string());
        }

        let a = &self.analysis;
        if a.max_input_chars == 0 {
            return Err("analysis.maxInputChars must be non-zero".to_string());
        }
        if a.summary_word_limit == 0 || a.digest_word_limit < a.summary_word_limit {
            return Err(
                "analysis.digestWordLimit must be at least analysis.summaryWordLimit (> 0)"
                    .to_string(),
            );
        }
        if a.max_excerpt_chars == 0 {
            return Err("analysis.maxExcerptChars must be non-zero".to_string());
        }

        if let Some(provider) = &self.provider {
            provider.validate()?;
        }

        Ok(())
    }
}
