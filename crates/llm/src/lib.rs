//! Policy Guardian LLM
//!
//! Provides a unified interface for the generative backends used by the
//! policy analysis pipeline:
//! - OpenAI chat completions
//! - Ollama (local inference through its OpenAI-compatible endpoint)
//!
//! Also includes the HTTP client factory.

pub mod http_client;
pub mod openai;
pub mod provider;
pub mod types;

// Re-export main types
pub use http_client::build_http_client;
pub use openai::OpenAIProvider;
pub use provider::{create_provider, LlmProvider};
pub use types::*;
