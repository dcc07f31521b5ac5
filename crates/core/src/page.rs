//! Page Types and Detections
//!
//! A `Detection` is the classifier's verdict that a page is a policy
//! document. It is produced without a timestamp by the classifier and
//! stamped when the scan service records it for a tab.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of legal-policy page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageType {
    TermsOfService,
    PrivacyPolicy,
}

impl PageType {
    /// Wire identifier (`terms-of-service` / `privacy-policy`).
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::TermsOfService => "terms-of-service",
            PageType::PrivacyPolicy => "privacy-policy",
        }
    }

    /// Human-readable label used in prompts and digests.
    pub fn label(&self) -> &'static str {
        match self {
            PageType::TermsOfService => "terms of service",
            PageType::PrivacyPolicy => "privacy policy",
        }
    }

    /// Describe an optional page type, defaulting to a generic "policy".
    pub fn describe(page_type: Option<PageType>) -> &'static str {
        page_type.map(|p| p.label()).unwrap_or("policy")
    }

    /// Parse from a wire identifier.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "terms-of-service" | "terms" | "tos" => Some(PageType::TermsOfService),
            "privacy-policy" | "privacy" => Some(PageType::PrivacyPolicy),
            _ => None,
        }
    }
}

impl std::fmt::Display for PageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifier verdict for a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub page_type: PageType,
    /// Saturating score mapping in [0, 1], not a calibrated probability
    pub confidence: f64,
    /// `Zone: keyword` pairs that contributed to the winning class
    pub keyword_matches: Vec<String>,
    /// Length of the structured page text, in characters
    pub content_length: usize,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_at: Option<DateTime<Utc>>,
}

impl Detection {
    /// Whether `self` replaces `previous` for the same tab: the page type
    /// changed, or confidence moved by more than `delta`.
    pub fn differs_materially(&self, previous: Option<&Detection>, delta: f64) -> bool {
        match previous {
            None => true,
            Some(prev) => {
                prev.page_type != self.page_type
                    || (prev.confidence - self.confidence).abs() > delta
            }
        }
    }

    /// Copy of this detection stamped with `at`.
    pub fn stamped(mut self, at: DateTime<Utc>) -> Self {
        self.detected_at = Some(at);
        self
    }
}
