//! Lead Summary
//!
//! Non-generative summary made of the opening sentences of a page, served by
//! the preview command.

use crate::utils::text::{collapse_whitespace, trim_to_word_limit};

/// Number of sentences kept.
pub const LEAD_SENTENCES: usize = 3;

/// Word cap on the lead summary.
pub const LEAD_WORD_LIMIT: usize = 300;

/// Split collapsed text after `.`, `!` or `?` followed by a space.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if matches!(ch, '.' | '!' | '?') {
            if let Some(&(next_idx, ' ')) = chars.peek() {
                let sentence = text[start..idx + ch.len_utf8()].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = next_idx + 1;
            }
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// First three sentences, capped at 300 words.
pub fn fallback_summary(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    let lead = split_sentences(&collapsed)
        .into_iter()
        .take(LEAD_SENTENCES)
        .collect::<Vec<_>>()
        .join(" ");
    trim_to_word_limit(&lead, LEAD_WORD_LIMIT)
}
