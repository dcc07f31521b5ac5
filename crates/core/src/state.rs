//! Per-Tab Scan State
//!
//! `ScanState` is replaced as a whole on every write. Callers describe the
//! fields they want to change with a `StatePatch`; `ScanState::merged`
//! applies it to whatever state is current at write time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::Analysis;
use crate::page::Detection;

/// Browser tab identifier.
pub type TabId = u32;

/// State of one tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanState {
    pub detected: bool,
    pub detection: Option<Detection>,
    /// True only while an analysis is in flight
    pub scanning: bool,
    pub analysis: Option<Analysis>,
    pub error: Option<String>,
    pub last_scanned_at: Option<DateTime<Utc>>,
    pub last_updated: DateTime<Utc>,
}

impl Default for ScanState {
    fn default() -> Self {
        Self {
            detected: false,
            detection: None,
            scanning: false,
            analysis: None,
            error: None,
            last_scanned_at: None,
            last_updated: Utc::now(),
        }
    }
}

impl ScanState {
    /// Apply `patch` and bump `last_updated`.
    pub fn merged(mut self, patch: StatePatch, now: DateTime<Utc>) -> Self {
        if let Some(detected) = patch.detected {
            self.detected = detected;
        }
        if let Some(detection) = patch.detection {
            self.detection = Some(detection);
        }
        if let Some(scanning) = patch.scanning {
            self.scanning = scanning;
        }
        if let Some(analysis) = patch.analysis {
            self.analysis = Some(analysis);
        }
        if let Some(error) = patch.error {
            self.error = error;
        }
        if let Some(at) = patch.last_scanned_at {
            self.last_scanned_at = Some(at);
        }
        self.last_updated = now;
        self
    }
}

/// Fields to overwrite in a `ScanState`. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct StatePatch {
    pub detected: Option<bool>,
    pub detection: Option<Detection>,
    pub scanning: Option<bool>,
    pub analysis: Option<Analysis>,
    /// `Some(None)` clears the error
    pub error: Option<Option<String>>,
    pub last_scanned_at: Option<DateTime<Utc>>,
}

impl StatePatch {
    /// A classifier reported a new detection.
    pub fn detected(detection: Detection) -> Self {
        Self {
            detected: Some(true),
            detection: Some(detection),
            error: Some(None),
            ..Default::default()
        }
    }

    /// A scan began.
    pub fn scan_started() -> Self {
        Self {
            scanning: Some(true),
            error: Some(None),
            ..Default::default()
        }
    }

    /// A scan failed with a user-visible message. Any prior analysis is kept.
    pub fn scan_failed(message: impl Into<String>) -> Self {
        Self {
            scanning: Some(false),
            error: Some(Some(message.into())),
            ..Default::default()
        }
    }

    /// A scan completed.
    pub fn scan_completed(analysis: Analysis, at: DateTime<Utc>) -> Self {
        Self {
            scanning: Some(false),
            analysis: Some(analysis),
            last_scanned_at: Some(at),
            ..Default::default()
        }
    }
}
