//! Summarizer Capability
//!
//! Condenses text in paragraph or key-point style. `run_summarizer` applies
//! the style fallbacks and the word budget; any failure yields `None`.

use std::sync::Arc;

use async_trait::async_trait;
use policy_guardian_llm::{LlmError, LlmProvider, LlmRequestOptions, LlmResult, Message};
use tracing::{debug, warn};

use super::capability::Capability;
use crate::utils::text::{trim_to_word_limit, word_count};

/// Output style requested from a summarizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryStyle {
    Paragraph,
    KeyPoints,
}

/// A summarizer reply: free text or a list of points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutput {
    Text(String),
    Points(Vec<String>),
}

impl SummaryOutput {
    /// Flatten to text (points joined by newlines). Blank output is `None`.
    pub fn into_text(self) -> Option<String> {
        let text = match self {
            SummaryOutput::Text(text) => text,
            SummaryOutput::Points(points) => points
                .iter()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
        };
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str, style: SummaryStyle) -> LlmResult<SummaryOutput>;
}

/// Summarize `text` within `max_words`.
///
/// Paragraph style is tried first, key points second. A result over the
/// budget is condensed once more as key points and then word-trimmed.
pub async fn run_summarizer(
    summarizer: &Capability<dyn Summarizer>,
    text: &str,
    max_words: usize,
) -> Option<String> {
    let summarizer = summarizer.get()?;

    let first = match summarizer.summarize(text, SummaryStyle::Paragraph).await {
        Ok(output) => output,
        Err(e) => {
            debug!(error = %e, "Paragraph summary unavailable, trying key points");
            match summarizer.summarize(text, SummaryStyle::KeyPoints).await {
                Ok(output) => output,
                Err(e) => {
                    warn!(error = %e, "Summarizer failed");
                    return None;
                }
            }
        }
    };
    let mut summary = first.into_text()?;

    if word_count(&summary) > max_words {
        match summarizer.summarize(&summary, SummaryStyle::KeyPoints).await {
            Ok(output) => {
                if let Some(shorter) = output.into_text() {
                    summary = shorter;
                }
            }
            Err(e) => debug!(error = %e, "Secondary condense failed"),
        }
    }

    if word_count(&summary) > max_words {
        summary = trim_to_word_limit(&summary, max_words);
    }
    Some(summary)
}

/// Summarizer backed by a chat-completions provider.
pub struct LlmSummarizer {
    provider: Arc<dyn LlmProvider>,
}

impl LlmSummarizer {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    fn system_prompt(style: SummaryStyle) -> &'static str {
        match style {
            SummaryStyle::Paragraph => {
                "Summarize the user's text as one short plain-language paragraph. Reply with the summary only."
            }
            SummaryStyle::KeyPoints => {
                "Summarize the user's text as at most five short key points, one per line, each starting with \"- \". Reply with the points only."
            }
        }
    }
}

/// Strip list markers (`-`, `*`, `•`, `1.`) from each non-empty line.
pub fn parse_points(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            let line = line.trim();
            let line = line
                .strip_prefix("- ")
                .or_else(|| line.strip_prefix("* "))
                .or_else(|| line.strip_prefix("• "))
                .unwrap_or(line);
            let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
            match line[digits..].strip_prefix(". ") {
                Some(rest) if digits > 0 => rest.trim().to_string(),
                _ => line.trim().to_string(),
            }
        })
        .filter(|line| !line.is_empty())
        .collect()
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, text: &str, style: SummaryStyle) -> LlmResult<SummaryOutput> {
        let response = self
            .provider
            .send_message(
                vec![Message::user(text)],
                Some(Self::system_prompt(style).to_string()),
                LlmRequestOptions {
                    temperature_override: Some(0.2),
                    ..Default::default()
                },
            )
            .await?;

        let reply = response.text().ok_or_else(|| LlmError::ParseError {
            message: "empty summary".to_string(),
        })?;

        Ok(match style {
            SummaryStyle::Paragraph => SummaryOutput::Text(reply.to_string()),
            SummaryStyle::KeyPoints => SummaryOutput::Points(parse_points(reply)),
        })
    }
}
