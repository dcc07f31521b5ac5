//! Rewriter Capability
//!
//! Adds a plain-language explanation to each flagged clause. Enrichment is
//! best-effort per clause: a failed rewrite leaves that clause unchanged.

use std::sync::Arc;

use async_trait::async_trait;
use policy_guardian_core::SuspiciousClause;
use policy_guardian_llm::{LlmProvider, LlmRequestOptions, LlmResult, Message};
use tracing::debug;

use super::capability::Capability;
use super::prompts::{rewrite_prompt, rewriter_system_prompt, REWRITE_INSTRUCTION};
use crate::utils::text::cap_words;

/// Tone requested for rewrites.
pub const REWRITE_TONE: &str = "cautious";

/// Longest plain-language explanation kept per clause, in words.
pub const PLAIN_LANGUAGE_WORD_LIMIT: usize = 80;

#[async_trait]
pub trait Rewriter: Send + Sync {
    /// Rewrite `text` following `instruction`. `Ok(None)` means the backend
    /// produced nothing usable.
    async fn rewrite(&self, text: &str, instruction: &str) -> LlmResult<Option<String>>;
}

/// Rewriter backed by a chat-completions provider.
pub struct LlmRewriter {
    provider: Arc<dyn LlmProvider>,
    tone: String,
}

impl LlmRewriter {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            tone: REWRITE_TONE.to_string(),
        }
    }
}

#[async_trait]
impl Rewriter for LlmRewriter {
    async fn rewrite(&self, text: &str, instruction: &str) -> LlmResult<Option<String>> {
        let response = self
            .provider
            .send_message(
                vec![Message::user(rewrite_prompt(text, instruction))],
                Some(rewriter_system_prompt(&self.tone)),
                LlmRequestOptions {
                    temperature_override: Some(0.2),
                    ..Default::default()
                },
            )
            .await?;
        Ok(response.text().map(str::to_string))
    }
}

/// Attach `plain_language` to each clause the rewriter can explain.
pub async fn enrich_clauses(
    rewriter: &Capability<dyn Rewriter>,
    clauses: Vec<SuspiciousClause>,
) -> Vec<SuspiciousClause> {
    let Some(rewriter) = rewriter.get() else {
        return clauses;
    };

    let mut enriched = Vec::with_capacity(clauses.len());
    for mut clause in clauses {
        if clause.excerpt.trim().is_empty() {
            enriched.push(clause);
            continue;
        }
        match rewriter.rewrite(&clause.excerpt, REWRITE_INSTRUCTION).await {
            Ok(Some(text)) if !text.trim().is_empty() => {
                clause.plain_language = Some(cap_words(&text, PLAIN_LANGUAGE_WORD_LIMIT));
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, "Clause rewrite failed; keeping clause as is"),
        }
        enriched.push(clause);
    }
    enriched
}
