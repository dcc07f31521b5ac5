//! Scan Events
//!
//! Notifications broadcast to every observer (popup, page widget, CLI) as a
//! scan moves through its phases.

use policy_guardian_core::{Analysis, Detection, ScanState, TabId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

/// Buffered events per subscriber before old ones are dropped.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Event broadcast after a detection or scan phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ScanEvent {
    #[serde(rename_all = "camelCase")]
    PolicyDetected { tab_id: TabId, detection: Detection },

    #[serde(rename_all = "camelCase")]
    ScanStarted {
        tab_id: TabId,
        origin: String,
        state: ScanState,
    },

    #[serde(rename_all = "camelCase")]
    ScanComplete {
        tab_id: TabId,
        analysis: Analysis,
        #[serde(skip_serializing_if = "Option::is_none")]
        detection: Option<Detection>,
    },

    #[serde(rename_all = "camelCase")]
    ScanError { tab_id: TabId, error: String },
}

impl ScanEvent {
    pub fn tab_id(&self) -> TabId {
        match self {
            ScanEvent::PolicyDetected { tab_id, .. }
            | ScanEvent::ScanStarted { tab_id, .. }
            | ScanEvent::ScanComplete { tab_id, .. }
            | ScanEvent::ScanError { tab_id, .. } => *tab_id,
        }
    }

    /// Wire name of the event.
    pub fn kind(&self) -> &'static str {
        match self {
            ScanEvent::PolicyDetected { .. } => "policy-detected",
            ScanEvent::ScanStarted { .. } => "scan-started",
            ScanEvent::ScanComplete { .. } => "scan-complete",
            ScanEvent::ScanError { .. } => "scan-error",
        }
    }

    /// Whether the event ends a scan.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ScanEvent::ScanComplete { .. } | ScanEvent::ScanError { .. }
        )
    }
}

/// Fan-out channel for scan events.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ScanEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ScanEvent> {
        self.sender.subscribe()
    }

    /// Broadcast to current subscribers. Having none is not an error.
    pub fn emit(&self, event: ScanEvent) {
        let kind = event.kind();
        let tab_id = event.tab_id();
        match self.sender.send(event) {
            Ok(receivers) => trace!(kind, tab_id, receivers, "Broadcast scan event"),
            Err(_) => trace!(kind, tab_id, "No subscribers for scan event"),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(EVENT_CHANNEL_CAPACITY)
    }
}
