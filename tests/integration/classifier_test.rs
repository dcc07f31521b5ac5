//! Classifier Integration Tests
//!
//! Classification of captured pages through the structuring layer.

use policy_guardian::services::classifier::PageClassifier;
use policy_guardian::services::page::PageSnapshot;
use policy_guardian_core::PageType;

use crate::support::{privacy_snapshot, PRIVACY_TITLE, PRIVACY_URL};

#[test]
fn test_privacy_page_is_detected() {
    let classifier = PageClassifier::default();
    let detection = classifier
        .classify_snapshot(&privacy_snapshot())
        .expect("privacy page should be detected");

    assert_eq!(detection.page_type, PageType::PrivacyPolicy);
    assert!(detection.confidence > 0.7, "confidence {}", detection.confidence);
    assert!(detection.confidence <= 0.99);
    assert_eq!(detection.url, PRIVACY_URL);
    assert_eq!(detection.title, PRIVACY_TITLE);
    assert!(detection.detected_at.is_none());
    assert!(detection
        .keyword_matches
        .iter()
        .any(|m| m == "Title: privacy policy"));
}

#[test]
fn test_terms_page_from_headings() {
    let snapshot = PageSnapshot {
        url: "https://example.com/legal/terms".to_string(),
        title: "Legal".to_string(),
        headings: vec!["Terms of Service".to_string()],
        blocks: vec!["By using the service you accept these terms and conditions.".to_string()],
    };
    let detection = PageClassifier::default()
        .classify_snapshot(&snapshot)
        .expect("terms page should be detected");
    assert_eq!(detection.page_type, PageType::TermsOfService);
}

#[test]
fn test_ordinary_page_is_not_detected() {
    let snapshot = PageSnapshot::from_plain_text(
        "https://example.com/blog/launch",
        "We launched!",
        vec!["Launch day".to_string()],
        "Today we shipped the new editor. Thanks to everyone who helped.",
    );
    assert!(PageClassifier::default().classify_snapshot(&snapshot).is_none());
}

#[test]
fn test_classification_is_idempotent() {
    let classifier = PageClassifier::default();
    let snapshot = privacy_snapshot();
    let first = classifier.classify_snapshot(&snapshot);
    let second = classifier.classify_snapshot(&snapshot);
    assert_eq!(first, second);
}
