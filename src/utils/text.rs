//! Text Helpers
//!
//! Word- and character-bounded truncation shared by the heuristics, the
//! digest builder and the orchestrator. Character limits count Unicode
//! scalar values, never bytes.

/// Marker appended to word-truncated text.
pub const ELLIPSIS: &str = "…";

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Keep at most `limit` words, re-joined with single spaces.
///
/// Appends [`ELLIPSIS`] when words were dropped; a zero limit yields an
/// empty string.
pub fn trim_to_word_limit(text: &str, limit: usize) -> String {
    if limit == 0 {
        return String::new();
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= limit {
        return words.join(" ");
    }
    format!("{}{}", words[..limit].join(" "), ELLIPSIS)
}

/// `text` unchanged when it fits in `limit` words, otherwise
/// [`trim_to_word_limit`].
pub fn cap_words(text: &str, limit: usize) -> String {
    if word_count(text) <= limit {
        text.trim().to_string()
    } else {
        trim_to_word_limit(text, limit)
    }
}

/// Prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Collapse every run of whitespace into a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("  one\ttwo\n three  "), 3);
    }

    #[test]
    fn test_trim_to_word_limit() {
        assert_eq!(trim_to_word_limit("a b c", 5), "a b c");
        assert_eq!(trim_to_word_limit("a  b\nc", 3), "a b c");
        assert_eq!(trim_to_word_limit("a b c d", 2), "a b…");
        assert_eq!(trim_to_word_limit("a b c", 0), "");
    }

    #[test]
    fn test_cap_words_keeps_layout() {
        assert_eq!(cap_words("line one\nline two\n", 10), "line one\nline two");
        assert_eq!(cap_words("line one\nline two", 3), "line one line…");
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("", 3), "");
        assert_eq!(char_len("héllo"), 5);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  We   collect\n\n data "), "We collect data");
    }
}
