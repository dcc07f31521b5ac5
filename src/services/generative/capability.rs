//! Optional AI Capabilities
//!
//! Each generative feature is either backed by an implementation or absent.
//! Orchestration branches on this sum type instead of probing at runtime.

use std::fmt;
use std::sync::Arc;

use policy_guardian_llm::{create_provider, LlmProvider, ProviderConfig};
use tracing::{info, warn};

use super::rewriter::{LlmRewriter, Rewriter};
use super::summarizer::{LlmSummarizer, Summarizer};

/// An optional capability.
pub enum Capability<T: ?Sized> {
    Available(Arc<T>),
    Unavailable,
}

impl<T: ?Sized> Capability<T> {
    pub fn get(&self) -> Option<&Arc<T>> {
        match self {
            Capability::Available(inner) => Some(inner),
            Capability::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Available(_))
    }
}

impl<T: ?Sized> Clone for Capability<T> {
    fn clone(&self) -> Self {
        match self {
            Capability::Available(inner) => Capability::Available(Arc::clone(inner)),
            Capability::Unavailable => Capability::Unavailable,
        }
    }
}

impl<T: ?Sized> Default for Capability<T> {
    fn default() -> Self {
        Capability::Unavailable
    }
}

impl<T: ?Sized> From<Option<Arc<T>>> for Capability<T> {
    fn from(value: Option<Arc<T>>) -> Self {
        match value {
            Some(inner) => Capability::Available(inner),
            None => Capability::Unavailable,
        }
    }
}

impl<T: ?Sized> fmt::Debug for Capability<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Available(_) => f.write_str("Available"),
            Capability::Unavailable => f.write_str("Unavailable"),
        }
    }
}

/// The generative features the analysis pipeline may use.
#[derive(Debug, Clone, Default)]
pub struct AiCapabilities {
    pub language_model: Capability<dyn LlmProvider>,
    pub summarizer: Capability<dyn Summarizer>,
    pub rewriter: Capability<dyn Rewriter>,
}

impl AiCapabilities {
    /// No generative backend; the keyword fallback does all the work.
    pub fn none() -> Self {
        Self::default()
    }

    /// Back every capability with one chat-completions provider.
    pub fn from_provider(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            summarizer: Capability::Available(Arc::new(LlmSummarizer::new(provider.clone()))),
            rewriter: Capability::Available(Arc::new(LlmRewriter::new(provider.clone()))),
            language_model: Capability::Available(provider),
        }
    }

    /// Build from optional provider settings. A provider that cannot be
    /// constructed leaves every capability unavailable.
    pub fn from_config(config: Option<&ProviderConfig>) -> Self {
        let Some(config) = config else {
            info!("No generative provider configured; using keyword analysis only");
            return Self::none();
        };
        match create_provider(config.clone()) {
            Ok(provider) => {
                info!(
                    provider = provider.name(),
                    model = provider.model(),
                    "Generative analysis enabled"
                );
                Self::from_provider(provider)
            }
            Err(e) => {
                warn!(error = %e, "Generative provider unavailable; using keyword analysis only");
                Self::none()
            }
        }
    }

    pub fn any_available(&self) -> bool {
        self.language_model.is_available()
            || self.summarizer.is_available()
            || self.rewriter.is_available()
    }
}
