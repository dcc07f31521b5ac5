//! Keyword Taxonomies
//!
//! The two label classes a page can be classified into, the keyword list for
//! each, and the page zones keywords are searched in.

use policy_guardian_core::PageType;

use crate::models::settings::ClassifierConfig;

/// Label class scored by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyClass {
    Terms,
    Privacy,
}

impl PolicyClass {
    pub fn page_type(self) -> PageType {
        match self {
            PolicyClass::Terms => PageType::TermsOfService,
            PolicyClass::Privacy => PageType::PrivacyPolicy,
        }
    }
}

/// Page region a keyword was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Url,
    Title,
    Heading,
    Body,
}

impl Zone {
    /// All zones in scoring order.
    pub const ALL: [Zone; 4] = [Zone::Url, Zone::Title, Zone::Heading, Zone::Body];

    /// Prefix used in keyword match labels.
    pub fn label(self) -> &'static str {
        match self {
            Zone::Url => "URL",
            Zone::Title => "Title",
            Zone::Heading => "Heading",
            Zone::Body => "Body",
        }
    }

    pub fn weight(self, config: &ClassifierConfig) -> f64 {
        match self {
            Zone::Url => config.url_weight,
            Zone::Title => config.title_weight,
            Zone::Heading => config.heading_weight,
            Zone::Body => config.body_weight,
        }
    }
}

/// Keyword lists for both classes. Keywords are matched lower-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTaxonomies {
    pub terms: Vec<String>,
    pub privacy: Vec<String>,
}

impl KeywordTaxonomies {
    pub fn keywords(&self, class: PolicyClass) -> &[String] {
        match class {
            PolicyClass::Terms => &self.terms,
            PolicyClass::Privacy => &self.privacy,
        }
    }
}

impl Default for KeywordTaxonomies {
    fn default() -> Self {
        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        Self {
            terms: owned(&[
                "terms of service",
                "terms & conditions",
                "terms and conditions",
                "user agreement",
                "service agreement",
                "acceptable use policy",
                "end user license",
                "eula",
                "conditions of use",
            ]),
            privacy: owned(&[
                "privacy policy",
                "data policy",
                "privacy notice",
                "data protection",
                "personal data",
                "data collection",
                "information we collect",
                "gdpr",
                "ccpa",
            ]),
        }
    }
}
