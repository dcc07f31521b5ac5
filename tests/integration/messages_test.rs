//! Message Contract Integration Tests
//!
//! Raw JSON messages routed through `AppState::handle_message`.

use policy_guardian::commands::{MISSING_TAB_ERROR, UNKNOWN_MESSAGE_ERROR};
use policy_guardian::services::classifier::PageClassifier;
use policy_guardian::services::generative::AiCapabilities;
use policy_guardian::services::scan::ScanEvent;
use serde_json::json;

use crate::support::{app_with, privacy_snapshot};

const TAB: u32 = 3;

#[tokio::test]
async fn test_unknown_and_untargeted_messages() {
    let (state, _) = app_with(AiCapabilities::none(), &[]);

    let resp = state.handle_message(json!({"type": "reticulate"}), Some(TAB)).await;
    assert!(!resp.ok);
    assert_eq!(resp.error.as_deref(), Some(UNKNOWN_MESSAGE_ERROR));

    let resp = state.handle_message(json!({"type": "get-state"}), None).await;
    assert!(!resp.ok);
    assert_eq!(resp.error.as_deref(), Some(MISSING_TAB_ERROR));

    let resp = state.handle_message(json!({"type": "start-scan"}), None).await;
    assert_eq!(resp.error.as_deref(), Some(MISSING_TAB_ERROR));

    let resp = state
        .handle_message(json!({"type": "policy-detected", "payload": {}}), Some(TAB))
        .await;
    assert!(!resp.ok);
    assert!(resp.error.unwrap().starts_with("Invalid message"));
}

#[tokio::test]
async fn test_get_state_for_unknown_tab_is_default() {
    let (state, _) = app_with(AiCapabilities::none(), &[]);
    let resp = state
        .handle_message(json!({"type": "get-state", "tabId": 99}), None)
        .await;
    assert!(resp.ok);
    let scan_state = resp.data.unwrap();
    assert!(!scan_state.detected);
    assert!(!scan_state.scanning);
    assert!(scan_state.analysis.is_none());
}

#[tokio::test]
async fn test_detect_scan_and_clear_via_messages() {
    let (state, _) = app_with(AiCapabilities::none(), &[(TAB, privacy_snapshot())]);
    let mut rx = state.scan_service().subscribe();

    let detection = PageClassifier::default()
        .classify_snapshot(&privacy_snapshot())
        .unwrap();
    // Content scripts omit the tab id; the sender tab fills it in.
    let resp = state
        .handle_message(
            json!({"type": "policy-detected", "payload": detection}),
            Some(TAB),
        )
        .await;
    assert!(resp.ok);
    assert!(resp.data.unwrap().detected);

    let resp = state
        .handle_message(
            json!({"type": "start-scan", "tabId": TAB, "origin": "popup"}),
            None,
        )
        .await;
    assert!(resp.ok);
    assert!(resp.data.is_none());

    loop {
        let event = rx.recv().await.unwrap();
        if event.is_terminal() {
            assert!(matches!(event, ScanEvent::ScanComplete { .. }));
            break;
        }
    }

    let resp = state
        .handle_message(json!({"type": "get-state", "tabId": TAB}), None)
        .await;
    let scan_state = resp.data.unwrap();
    assert!(scan_state.analysis.is_some());
    assert!(!scan_state.scanning);

    let resp = state
        .handle_message(json!({"type": "clear-state", "tabId": TAB}), None)
        .await;
    assert!(resp.ok);
    let resp = state
        .handle_message(json!({"type": "get-state", "tabId": TAB}), None)
        .await;
    assert!(resp.data.unwrap().analysis.is_none());
}

#[tokio::test]
async fn test_clear_state_without_tab_is_acknowledged() {
    let (state, _) = app_with(AiCapabilities::none(), &[]);
    let resp = state.handle_message(json!({"type": "clear-state"}), None).await;
    assert!(resp.ok);
}

#[tokio::test]
async fn test_tab_lifecycle_messages() {
    let (state, _) = app_with(AiCapabilities::none(), &[(TAB, privacy_snapshot())]);
    state.scan_service().run_scan(TAB, None, None).await;

    let resp = state
        .handle_message(
            json!({"type": "tab-updated", "tabId": TAB, "status": "complete"}),
            None,
        )
        .await;
    assert!(resp.ok);
    assert!(state.scan_service().get_state(TAB).await.analysis.is_some());

    state
        .handle_message(
            json!({"type": "tab-updated", "tabId": TAB, "status": "loading"}),
            None,
        )
        .await;
    assert!(state.scan_service().get_state(TAB).await.analysis.is_none());
}

#[test]
fn test_events_serialize_with_type_tags() {
    let event = ScanEvent::ScanError {
        tab_id: TAB,
        error: "boom".to_string(),
    };
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value, json!({"type": "scan-error", "tabId": TAB, "error": "boom"}));
}
