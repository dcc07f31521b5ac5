//! Page Classifier
//!
//! Scores a `PageSignal` against both keyword taxonomies and decides whether
//! the page is a policy document. Pure: the same signal always yields the
//! same detection.

use std::sync::OnceLock;

use policy_guardian_core::Detection;
use regex::Regex;

use super::taxonomy::{KeywordTaxonomies, PolicyClass, Zone};
use crate::models::settings::{ClassifierConfig, StructureConfig};
use crate::services::page::{PageSignal, PageSnapshot};

/// Cheap regex signal that adds a fixed bonus to one class.
struct BonusRule {
    zone: Zone,
    regex: Regex,
    class: PolicyClass,
    label: &'static str,
}

impl BonusRule {
    fn amount(&self, config: &ClassifierConfig) -> f64 {
        match (self.zone, self.class) {
            (Zone::Url, PolicyClass::Privacy) => config.url_privacy_bonus,
            (Zone::Url, PolicyClass::Terms) => config.url_terms_bonus,
            _ => config.title_policy_bonus,
        }
    }
}

fn bonus_rules() -> &'static Vec<BonusRule> {
    static RULES: OnceLock<Vec<BonusRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            (Zone::Url, "privacy", PolicyClass::Privacy, r#"URL contains "privacy""#),
            (Zone::Url, "terms|conditions", PolicyClass::Terms, r#"URL contains "terms""#),
            (Zone::Title, "policy", PolicyClass::Privacy, r#"Title contains "policy""#),
        ]
        .into_iter()
        .filter_map(|(zone, pattern, class, label)| {
            Regex::new(pattern).ok().map(|regex| BonusRule {
                zone,
                regex,
                class,
                label,
            })
        })
        .collect()
    })
}

/// Running score and contributing matches for one class.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassTally {
    pub score: f64,
    pub matches: Vec<String>,
}

impl ClassTally {
    fn add(&mut self, amount: f64, label: String) {
        self.score += amount;
        self.matches.push(label);
    }
}

/// Scores of both classes for one signal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassScores {
    pub terms: ClassTally,
    pub privacy: ClassTally,
}

impl ClassScores {
    fn tally_mut(&mut self, class: PolicyClass) -> &mut ClassTally {
        match class {
            PolicyClass::Terms => &mut self.terms,
            PolicyClass::Privacy => &mut self.privacy,
        }
    }

    /// Winning class; ties favour terms.
    pub fn winner(&self) -> (PolicyClass, &ClassTally) {
        if self.terms.score >= self.privacy.score {
            (PolicyClass::Terms, &self.terms)
        } else {
            (PolicyClass::Privacy, &self.privacy)
        }
    }
}

fn zone_text(signal: &PageSignal, zone: Zone) -> &str {
    match zone {
        Zone::Url => &signal.url,
        Zone::Title => &signal.title,
        Zone::Heading => &signal.heading_text,
        Zone::Body => &signal.body_sample,
    }
}

/// Weighted keyword scores for both classes.
///
/// Each keyword counts once per zone it occurs in. Bonus signals are added
/// after the zone matches.
pub fn score_signal(
    signal: &PageSignal,
    taxonomies: &KeywordTaxonomies,
    config: &ClassifierConfig,
) -> ClassScores {
    let mut scores = ClassScores::default();

    for zone in Zone::ALL {
        let haystack = zone_text(signal, zone);
        let weight = zone.weight(config);
        for class in [PolicyClass::Terms, PolicyClass::Privacy] {
            for keyword in taxonomies.keywords(class) {
                if haystack.contains(keyword.as_str()) {
                    scores
                        .tally_mut(class)
                        .add(weight, format!("{}: {}", zone.label(), keyword));
                }
            }
        }
    }

    for rule in bonus_rules() {
        if rule.regex.is_match(zone_text(signal, rule.zone)) {
            scores
                .tally_mut(rule.class)
                .add(rule.amount(config), rule.label.to_string());
        }
    }

    scores
}

/// Classify a signal. Returns `None` when the winning score is below the
/// threshold.
pub fn classify(
    signal: &PageSignal,
    taxonomies: &KeywordTaxonomies,
    config: &ClassifierConfig,
) -> Option<Detection> {
    let scores = score_signal(signal, taxonomies, config);
    let (class, tally) = scores.winner();

    if tally.score < config.threshold {
        return None;
    }

    let confidence = (tally.score / config.confidence_divisor).min(config.confidence_cap);

    Some(Detection {
        page_type: class.page_type(),
        confidence,
        keyword_matches: tally.matches.clone(),
        content_length: signal.content_length,
        title: signal.page_title.clone(),
        url: signal.page_url.clone(),
        detected_at: None,
    })
}

/// Classifier bound to its taxonomies and configuration.
#[derive(Debug, Clone, Default)]
pub struct PageClassifier {
    taxonomies: KeywordTaxonomies,
    config: ClassifierConfig,
    structure: StructureConfig,
}

impl PageClassifier {
    pub fn new(
        taxonomies: KeywordTaxonomies,
        config: ClassifierConfig,
        structure: StructureConfig,
    ) -> Self {
        Self {
            taxonomies,
            config,
            structure,
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn classify(&self, signal: &PageSignal) -> Option<Detection> {
        classify(signal, &self.taxonomies, &self.config)
    }

    /// Structure a snapshot and classify it.
    pub fn classify_snapshot(&self, snapshot: &PageSnapshot) -> Option<Detection> {
        let structured = snapshot.structured(&self.structure);
        self.classify(&snapshot.signal(&structured, &self.config))
    }
}
