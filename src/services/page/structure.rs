//! Page Text Structuring
//!
//! Turns raw page blocks (headings, paragraphs, list items) into the bounded
//! structured text every later stage works from, and derives the
//! lower-cased classifier signal from it.

use serde::{Deserialize, Serialize};

use crate::models::settings::{ClassifierConfig, StructureConfig};
use crate::utils::text::{char_len, collapse_whitespace, truncate_chars};

/// Separator placed between structured blocks.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Raw page material as captured by a collector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageSnapshot {
    pub url: String,
    pub title: String,
    /// Top-level heading texts in document order
    pub headings: Vec<String>,
    /// Text blocks in document order
    pub blocks: Vec<String>,
}

impl PageSnapshot {
    /// Build a snapshot from plain text, one block per blank-line separated
    /// paragraph.
    pub fn from_plain_text(
        url: impl Into<String>,
        title: impl Into<String>,
        headings: Vec<String>,
        text: &str,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            headings,
            blocks: crate::services::heuristics::split_paragraphs(text)
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Structured text under the configured limits.
    pub fn structured(&self, config: &StructureConfig) -> StructuredText {
        StructuredText::from_blocks(&self.blocks, config)
    }

    /// Lower-cased classifier signal for this page.
    pub fn signal(&self, structured: &StructuredText, config: &ClassifierConfig) -> PageSignal {
        let heading_text = self
            .headings
            .iter()
            .take(config.max_headings)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");

        PageSignal {
            url: self.url.to_lowercase(),
            title: self.title.to_lowercase(),
            heading_text: heading_text.to_lowercase(),
            body_sample: truncate_chars(&structured.text, config.body_sample_chars).to_lowercase(),
            content_length: char_len(&structured.text),
            page_url: self.url.clone(),
            page_title: self.title.clone(),
        }
    }

    /// Content handed to a scan.
    pub fn content(&self, structured: StructuredText) -> PageContent {
        PageContent {
            text: structured.text,
            paragraphs: structured.paragraphs,
            url: self.url.clone(),
            title: self.title.clone(),
        }
    }
}

/// Bounded page text plus the blocks it was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredText {
    /// Blocks joined by blank lines, capped at `max_chars`
    pub text: String,
    /// Accepted blocks, at most `max_blocks`
    pub paragraphs: Vec<String>,
}

impl StructuredText {
    /// Collapse whitespace in each block, drop blocks shorter than
    /// `min_block_chars`, keep at most `max_blocks`, then join and cap.
    pub fn from_blocks<S: AsRef<str>>(blocks: &[S], config: &StructureConfig) -> Self {
        let paragraphs: Vec<String> = blocks
            .iter()
            .map(|block| collapse_whitespace(block.as_ref()))
            .filter(|block| char_len(block) >= config.min_block_chars)
            .take(config.max_blocks)
            .collect();

        let joined = paragraphs.join(BLOCK_SEPARATOR);
        let text = truncate_chars(&joined, config.max_chars).to_string();

        Self { text, paragraphs }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Normalized per-pass classifier input. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSignal {
    pub url: String,
    pub title: String,
    /// First headings joined by spaces
    pub heading_text: String,
    pub body_sample: String,
    /// Length of the structured text, in characters
    pub content_length: usize,
    /// URL as shown to the user
    pub page_url: String,
    /// Title as shown to the user
    pub page_title: String,
}

/// Response to a `collect-page-text` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    pub text: String,
    pub paragraphs: Vec<String>,
    pub url: String,
    pub title: String,
}
