//! Scan Lifecycle Integration Tests
//!
//! Detection, scan start, the terminal event, and state teardown through
//! `ScanService` with real analysis behind it.

use policy_guardian::services::classifier::PageClassifier;
use policy_guardian::services::generative::AiCapabilities;
use policy_guardian::services::page::PageSnapshot;
use policy_guardian::services::scan::{
    ScanEvent, TabStatus, ANALYSIS_FAILED_ERROR, CONTENT_UNAVAILABLE_ERROR,
};
use policy_guardian_core::PageType;

use crate::support::{app_with, drain, language_model_only, privacy_snapshot, Behavior, MockProvider};

const TAB: u32 = 7;

fn terminal_count(events: &[ScanEvent]) -> usize {
    events.iter().filter(|e| e.is_terminal()).count()
}

#[tokio::test]
async fn test_successful_scan_lifecycle() {
    let (state, _) = app_with(AiCapabilities::none(), &[(TAB, privacy_snapshot())]);
    let service = state.scan_service();
    let mut rx = service.subscribe();

    let detection = PageClassifier::default()
        .classify_snapshot(&privacy_snapshot())
        .unwrap();
    let detected = service.on_policy_detected(TAB, detection).await;
    assert!(detected.detected);
    assert!(detected.detection.as_ref().unwrap().detected_at.is_some());

    let final_state = service.start_scan(TAB, None, Some("popup".into())).await.unwrap();
    assert!(!final_state.scanning);
    assert!(final_state.error.is_none());
    assert!(final_state.last_scanned_at.is_some());
    assert!(final_state.detected);
    assert!(final_state.analysis.is_some());

    let events = drain(&mut rx);
    let kinds: Vec<&str> = events.iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, vec!["policy-detected", "scan-started", "scan-complete"]);
    assert_eq!(terminal_count(&events), 1);

    match &events[1] {
        ScanEvent::ScanStarted { origin, state, .. } => {
            assert_eq!(origin, "popup");
            assert!(state.scanning);
        }
        other => panic!("unexpected event {:?}", other),
    }
    match &events[2] {
        ScanEvent::ScanComplete {
            tab_id, detection, ..
        } => {
            assert_eq!(*tab_id, TAB);
            assert_eq!(
                detection.as_ref().map(|d| d.page_type),
                Some(PageType::PrivacyPolicy)
            );
        }
        other => panic!("unexpected event {:?}", other),
    }

    assert_eq!(service.get_state(TAB).await, final_state);
}

#[tokio::test]
async fn test_missing_page_reports_content_error() {
    let (state, _) = app_with(AiCapabilities::none(), &[]);
    let service = state.scan_service();
    let mut rx = service.subscribe();

    let final_state = service.run_scan(TAB, None, None).await;
    assert!(!final_state.scanning);
    assert_eq!(final_state.error.as_deref(), Some(CONTENT_UNAVAILABLE_ERROR));
    assert!(final_state.analysis.is_none());

    let events = drain(&mut rx);
    assert_eq!(terminal_count(&events), 1);
    assert_eq!(events.last().map(|e| e.kind()), Some("scan-error"));
}

#[tokio::test]
async fn test_empty_page_reports_content_error() {
    let (state, _) = app_with(AiCapabilities::none(), &[(TAB, PageSnapshot::default())]);
    let final_state = state.scan_service().run_scan(TAB, None, None).await;
    assert_eq!(final_state.error.as_deref(), Some(CONTENT_UNAVAILABLE_ERROR));
}

#[tokio::test]
async fn test_panicking_analysis_reports_failure() {
    let provider = MockProvider::new(Behavior::Panic);
    let (state, _) = app_with(language_model_only(provider), &[(TAB, privacy_snapshot())]);
    let service = state.scan_service();
    let mut rx = service.subscribe();

    let final_state = service.run_scan(TAB, Some(PageType::PrivacyPolicy), None).await;
    assert!(!final_state.scanning);
    assert_eq!(final_state.error.as_deref(), Some(ANALYSIS_FAILED_ERROR));
    assert!(final_state.analysis.is_none());

    let events = drain(&mut rx);
    assert_eq!(terminal_count(&events), 1);
    match events.last() {
        Some(ScanEvent::ScanError { error, .. }) => assert_eq!(error, ANALYSIS_FAILED_ERROR),
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_rescan_keeps_prior_analysis() {
    let (state, collector) = app_with(AiCapabilities::none(), &[(TAB, privacy_snapshot())]);
    let service = state.scan_service();

    let first = service.run_scan(TAB, None, None).await;
    let analysis = first.analysis.clone().unwrap();

    collector.remove(TAB);
    let second = service.run_scan(TAB, None, None).await;
    assert_eq!(second.error.as_deref(), Some(CONTENT_UNAVAILABLE_ERROR));
    assert_eq!(second.analysis, Some(analysis));
    assert_eq!(second.last_scanned_at, first.last_scanned_at);
}

#[tokio::test]
async fn test_double_start_leaves_consistent_state() {
    let (state, _) = app_with(AiCapabilities::none(), &[(TAB, privacy_snapshot())]);
    let service = state.scan_service();
    let mut rx = service.subscribe();

    let first = service.start_scan(TAB, None, None);
    let second = service.start_scan(TAB, None, None);
    first.await.unwrap();
    second.await.unwrap();

    let stored = service.get_state(TAB).await;
    assert!(!stored.scanning);
    assert!(stored.error.is_none());
    assert!(stored.analysis.is_some());

    let events = drain(&mut rx);
    assert_eq!(terminal_count(&events), 2);
}

#[tokio::test]
async fn test_repeat_detection_is_not_rebroadcast() {
    let (state, _) = app_with(AiCapabilities::none(), &[]);
    let service = state.scan_service();
    let mut rx = service.subscribe();
    let detection = PageClassifier::default()
        .classify_snapshot(&privacy_snapshot())
        .unwrap();

    service.on_policy_detected(TAB, detection.clone()).await;
    service.on_policy_detected(TAB, detection).await;

    assert_eq!(drain(&mut rx).len(), 1);
}

#[tokio::test]
async fn test_navigation_and_close_drop_state() {
    let (state, _) = app_with(AiCapabilities::none(), &[(TAB, privacy_snapshot())]);
    let service = state.scan_service();

    service.run_scan(TAB, None, None).await;
    service.on_tab_updated(TAB, TabStatus::Complete).await;
    assert!(service.get_state(TAB).await.analysis.is_some());

    service.on_tab_updated(TAB, TabStatus::Loading).await;
    assert!(service.get_state(TAB).await.analysis.is_none());

    service.run_scan(TAB, None, None).await;
    service.on_tab_removed(TAB).await;
    let cleared = service.get_state(TAB).await;
    assert!(!cleared.detected);
    assert!(cleared.analysis.is_none());
}
