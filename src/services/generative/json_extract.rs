//! JSON Extraction
//!
//! Model replies wrap the requested JSON in prose or code fences, or break it
//! entirely. Everything here is best-effort and returns `ParseError` instead
//! of assuming well-formed input.

use serde_json::{Map, Value};
use thiserror::Error;

/// Why a model reply could not be read as an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("response was empty")]
    Empty,

    #[error("no JSON object found in response")]
    NoObject,

    #[error("JSON object is not closed")]
    Unbalanced,

    #[error("invalid JSON: {0}")]
    Invalid(String),
}

/// First balanced `{...}` substring of `text`.
///
/// Braces inside JSON strings (including escaped quotes) do not count.
pub fn extract_json_object(text: &str) -> Result<&str, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    let start = text.find('{').ok_or(ParseError::NoObject)?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    Err(ParseError::Unbalanced)
}

/// Clause as returned by a model. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawClause {
    pub excerpt: Option<String>,
    pub reason: Option<String>,
    pub risk_score: Option<Value>,
}

/// Heatmap entry as returned by a model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawHeatmapEntry {
    pub category: Option<String>,
    pub risk_level: Option<Value>,
    pub evidence: Option<Value>,
}

/// Analysis-shaped partial result. Collections that were missing or not
/// arrays are empty; entries that were not objects are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawAnalysis {
    pub summary: Option<String>,
    pub suspicious_clauses: Vec<RawClause>,
    pub risk_heatmap: Vec<RawHeatmapEntry>,
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn value_field(object: &Map<String, Value>, key: &str) -> Option<Value> {
    object.get(key).filter(|v| !v.is_null()).cloned()
}

fn objects<'a>(object: &'a Map<String, Value>, key: &str) -> Vec<&'a Map<String, Value>> {
    match object.get(key) {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_object).collect(),
        _ => Vec::new(),
    }
}

impl RawAnalysis {
    /// Read the analysis fields from a parsed JSON value.
    pub fn from_value(value: &Value) -> Result<Self, ParseError> {
        let object = value
            .as_object()
            .ok_or_else(|| ParseError::Invalid("top-level value is not an object".to_string()))?;

        Ok(Self {
            summary: string_field(object, "summary"),
            suspicious_clauses: objects(object, "suspiciousClauses")
                .into_iter()
                .map(|clause| RawClause {
                    excerpt: string_field(clause, "excerpt"),
                    reason: string_field(clause, "reason"),
                    risk_score: value_field(clause, "riskScore"),
                })
                .collect(),
            risk_heatmap: objects(object, "riskHeatmap")
                .into_iter()
                .map(|entry| RawHeatmapEntry {
                    category: string_field(entry, "category"),
                    risk_level: value_field(entry, "riskLevel"),
                    evidence: value_field(entry, "evidence"),
                })
                .collect(),
        })
    }
}

/// Extract and parse the analysis JSON from a model reply.
pub fn parse_raw_analysis(text: &str) -> Result<RawAnalysis, ParseError> {
    let candidate = extract_json_object(text)?;
    let value: Value =
        serde_json::from_str(candidate).map_err(|e| ParseError::Invalid(e.to_string()))?;
    RawAnalysis::from_value(&value)
}
