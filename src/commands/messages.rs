//! Message Router
//!
//! Entry point for the JSON message contract between the page host, the
//! popup and the scan service. Every message gets a `CommandResponse`;
//! failures are reported in the envelope, never raised.

use policy_guardian_core::{Detection, PageType, ScanState, TabId};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::response::CommandResponse;
use crate::services::scan::{ScanService, TabStatus};

/// Error returned when neither the message nor its sender names a tab.
pub const MISSING_TAB_ERROR: &str = "Missing tab id";

/// Error returned for message types the router does not know.
pub const UNKNOWN_MESSAGE_ERROR: &str = "Unknown message type";

/// Parsed inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    PolicyDetected {
        tab_id: Option<TabId>,
        detection: Detection,
    },
    StartScan {
        tab_id: Option<TabId>,
        page_type: Option<PageType>,
        origin: Option<String>,
    },
    GetState {
        tab_id: Option<TabId>,
    },
    ClearState {
        tab_id: Option<TabId>,
    },
    TabRemoved {
        tab_id: Option<TabId>,
    },
    TabUpdated {
        tab_id: Option<TabId>,
        loading: bool,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PolicyDetectedBody {
    tab_id: Option<TabId>,
    payload: Detection,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartScanBody {
    tab_id: Option<TabId>,
    page_type: Option<String>,
    origin: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TabBody {
    tab_id: Option<TabId>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TabUpdatedBody {
    tab_id: Option<TabId>,
    status: Option<String>,
}

/// Why a raw message was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    Unknown,
    Invalid(String),
}

impl MessageError {
    fn into_response(self) -> CommandResponse<ScanState> {
        match self {
            MessageError::Unknown => CommandResponse::err(UNKNOWN_MESSAGE_ERROR),
            MessageError::Invalid(e) => CommandResponse::err(format!("Invalid message: {}", e)),
        }
    }
}

fn body<T: for<'de> Deserialize<'de>>(raw: Value) -> Result<T, MessageError> {
    serde_json::from_value(raw).map_err(|e| MessageError::Invalid(e.to_string()))
}

impl InboundMessage {
    /// Parse a raw message by its `type` field.
    pub fn parse(raw: Value) -> Result<Self, MessageError> {
        let kind = raw
            .get("type")
            .and_then(Value::as_str)
            .ok_or(MessageError::Unknown)?
            .to_string();

        match kind.as_str() {
            "policy-detected" => {
                let b: PolicyDetectedBody = body(raw)?;
                Ok(Self::PolicyDetected {
                    tab_id: b.tab_id,
                    detection: b.payload,
                })
            }
            "start-scan" => {
                let b: StartScanBody = body(raw)?;
                Ok(Self::StartScan {
                    tab_id: b.tab_id,
                    // Unrecognized page types fall back to the stored detection
                    page_type: b.page_type.as_deref().and_then(PageType::parse),
                    origin: b.origin,
                })
            }
            "get-state" => Ok(Self::GetState {
                tab_id: body::<TabBody>(raw)?.tab_id,
            }),
            "clear-state" => Ok(Self::ClearState {
                tab_id: body::<TabBody>(raw)?.tab_id,
            }),
            "tab-removed" => Ok(Self::TabRemoved {
                tab_id: body::<TabBody>(raw)?.tab_id,
            }),
            "tab-updated" => {
                let b: TabUpdatedBody = body(raw)?;
                Ok(Self::TabUpdated {
                    tab_id: b.tab_id,
                    loading: b.status.as_deref() == Some("loading"),
                })
            }
            _ => Err(MessageError::Unknown),
        }
    }
}

/// Handle a raw message. `sender_tab` is the tab the message came from, used
/// when the message carries no `tabId`.
pub async fn handle_message(
    service: &ScanService,
    raw: Value,
    sender_tab: Option<TabId>,
) -> CommandResponse<ScanState> {
    match InboundMessage::parse(raw) {
        Ok(message) => dispatch(service, message, sender_tab).await,
        Err(e) => {
            warn!(error = ?e, "Rejected inbound message");
            e.into_response()
        }
    }
}

/// Route a parsed message to the scan service.
pub async fn dispatch(
    service: &ScanService,
    message: InboundMessage,
    sender_tab: Option<TabId>,
) -> CommandResponse<ScanState> {
    debug!(message = ?message, "Dispatching message");
    match message {
        InboundMessage::PolicyDetected { tab_id, detection } => {
            match tab_id.or(sender_tab) {
                Some(tab) => CommandResponse::ok(service.on_policy_detected(tab, detection).await),
                None => CommandResponse::err(MISSING_TAB_ERROR),
            }
        }
        InboundMessage::StartScan {
            tab_id,
            page_type,
            origin,
        } => match tab_id.or(sender_tab) {
            Some(tab) => {
                // Fire and forget; progress arrives as broadcast events.
                drop(service.start_scan(tab, page_type, origin));
                CommandResponse::ack()
            }
            None => CommandResponse::err(MISSING_TAB_ERROR),
        },
        InboundMessage::GetState { tab_id } => match tab_id.or(sender_tab) {
            Some(tab) => CommandResponse::ok(service.get_state(tab).await),
            None => CommandResponse::err(MISSING_TAB_ERROR),
        },
        InboundMessage::ClearState { tab_id } => {
            if let Some(tab) = tab_id.or(sender_tab) {
                service.clear_state(tab).await;
            }
            CommandResponse::ack()
        }
        InboundMessage::TabRemoved { tab_id } => match tab_id.or(sender_tab) {
            Some(tab) => {
                service.on_tab_removed(tab).await;
                CommandResponse::ack()
            }
            None => CommandResponse::err(MISSING_TAB_ERROR),
        },
        InboundMessage::TabUpdated { tab_id, loading } => match tab_id.or(sender_tab) {
            Some(tab) => {
                let status = if loading {
                    TabStatus::Loading
                } else {
                    TabStatus::Complete
                };
                service.on_tab_updated(tab, status).await;
                CommandResponse::ack()
            }
            None => CommandResponse::err(MISSING_TAB_ERROR),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_known_messages() {
        let msg = InboundMessage::parse(json!({
            "type": "start-scan",
            "tabId": 4,
            "pageType": "privacy-policy",
            "origin": "popup"
        }))
        .unwrap();
        assert_eq!(
            msg,
            InboundMessage::StartScan {
                tab_id: Some(4),
                page_type: Some(PageType::PrivacyPolicy),
                origin: Some("popup".to_string()),
            }
        );

        let msg = InboundMessage::parse(json!({"type": "get-state"})).unwrap();
        assert_eq!(msg, InboundMessage::GetState { tab_id: None });

        let msg =
            InboundMessage::parse(json!({"type": "tab-updated", "tabId": 1, "status": "loading"}))
                .unwrap();
        assert_eq!(
            msg,
            InboundMessage::TabUpdated {
                tab_id: Some(1),
                loading: true
            }
        );
    }

    #[test]
    fn test_parse_policy_detected() {
        let msg = InboundMessage::parse(json!({
            "type": "policy-detected",
            "payload": {
                "pageType": "terms-of-service",
                "confidence": 0.75,
                "keywordMatches": ["Title: terms of service"],
                "contentLength": 1200,
                "title": "Terms",
                "url": "https://example.com/terms"
            }
        }))
        .unwrap();
        match msg {
            InboundMessage::PolicyDetected { tab_id, detection } => {
                assert!(tab_id.is_none());
                assert_eq!(detection.page_type, PageType::TermsOfService);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejections() {
        assert_eq!(
            InboundMessage::parse(json!({"type": "explode"})),
            Err(MessageError::Unknown)
        );
        assert_eq!(InboundMessage::parse(json!({})), Err(MessageError::Unknown));
        assert!(matches!(
            InboundMessage::parse(json!({"type": "policy-detected", "payload": 3})),
            Err(MessageError::Invalid(_))
        ));
        assert!(matches!(
            InboundMessage::parse(json!({"type": "get-state", "tabId": "seven"})),
            Err(MessageError::Invalid(_))
        ));
    }

    #[test]
    fn test_unknown_page_type_is_dropped() {
        let msg = InboundMessage::parse(json!({"type": "start-scan", "pageType": "cookie"})).unwrap();
        assert!(matches!(
            msg,
            InboundMessage::StartScan {
                page_type: None,
                ..
            }
        ));
    }
}
