//! Scan Service
//!
//! Drives the per-tab state machine: records detections, runs scans through
//! the analysis orchestrator, broadcasts each phase, and drops state when a
//! tab closes or navigates.
//!
//! Scans for the same tab are not serialized. A second `start_scan` while
//! one is in flight runs alongside it and whichever finishes last wins.

use std::sync::Arc;

use chrono::Utc;
use policy_guardian_core::{Detection, PageType, ScanState, StatePatch, TabId};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::events::{EventBus, ScanEvent};
use super::store::ScanStateStore;
use crate::services::analysis::AnalysisOrchestrator;
use crate::services::page::PageContentCollector;

/// Shown when the page text could not be collected.
pub const CONTENT_UNAVAILABLE_ERROR: &str =
    "Unable to read page content. Try refreshing the page and scanning again.";

/// Shown when the analysis task itself failed.
pub const ANALYSIS_FAILED_ERROR: &str =
    "Analysis failed. Please try again or reduce the amount of text on the page.";

/// Origin recorded when a request names none.
pub const DEFAULT_SCAN_ORIGIN: &str = "manual";

/// Tab lifecycle notifications from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabStatus {
    /// A new top-level document started loading
    Loading,
    Complete,
}

/// Per-tab scan coordinator.
#[derive(Clone)]
pub struct ScanService {
    store: Arc<ScanStateStore>,
    orchestrator: Arc<AnalysisOrchestrator>,
    collector: Arc<dyn PageContentCollector>,
    events: EventBus,
    material_delta: f64,
}

impl ScanService {
    pub fn new(
        store: Arc<ScanStateStore>,
        orchestrator: Arc<AnalysisOrchestrator>,
        collector: Arc<dyn PageContentCollector>,
        material_delta: f64,
    ) -> Self {
        Self {
            store,
            orchestrator,
            collector,
            events: EventBus::default(),
            material_delta,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ScanEvent> {
        self.events.subscribe()
    }

    pub fn store(&self) -> &ScanStateStore {
        &self.store
    }

    /// Record a classifier detection for a tab.
    ///
    /// Detections that do not differ materially from the stored one leave the
    /// state untouched and broadcast nothing.
    pub async fn on_policy_detected(&self, tab_id: TabId, detection: Detection) -> ScanState {
        let current = self.store.read(tab_id).await;
        if !detection.differs_materially(current.detection.as_ref(), self.material_delta) {
            debug!(tab_id, "Detection unchanged; keeping stored state");
            return current;
        }

        let detection = detection.stamped(Utc::now());
        info!(
            tab_id,
            page_type = %detection.page_type,
            confidence = detection.confidence,
            "Policy page detected"
        );
        let next = self
            .store
            .update(tab_id, StatePatch::detected(detection))
            .await;
        if let Some(detection) = next.detection.clone() {
            self.events
                .emit(ScanEvent::PolicyDetected { tab_id, detection });
        }
        next
    }

    /// Run a scan in the background. The handle resolves to the state
    /// written at the end of the scan.
    pub fn start_scan(
        &self,
        tab_id: TabId,
        page_type: Option<PageType>,
        origin: Option<String>,
    ) -> JoinHandle<ScanState> {
        let service = self.clone();
        tokio::spawn(async move { service.run_scan(tab_id, page_type, origin).await })
    }

    /// Run a scan to completion.
    ///
    /// Emits `scan-started` and then exactly one of `scan-complete` or
    /// `scan-error`. `scanning` is false in the returned state either way.
    pub async fn run_scan(
        &self,
        tab_id: TabId,
        page_type: Option<PageType>,
        origin: Option<String>,
    ) -> ScanState {
        let scan_id = Uuid::new_v4();
        let origin = origin.unwrap_or_else(|| DEFAULT_SCAN_ORIGIN.to_string());
        info!(%scan_id, tab_id, %origin, "Scan started");

        let state = self.store.update(tab_id, StatePatch::scan_started()).await;
        self.events.emit(ScanEvent::ScanStarted {
            tab_id,
            origin,
            state: state.clone(),
        });

        let content = match self.collector.collect_page_text(tab_id).await {
            Ok(content) if !content.text.trim().is_empty() => content,
            Ok(_) => {
                warn!(%scan_id, tab_id, "Page returned no text");
                return self.fail(tab_id, CONTENT_UNAVAILABLE_ERROR).await;
            }
            Err(e) => {
                warn!(%scan_id, tab_id, error = %e, "Unable to collect page text");
                return self.fail(tab_id, CONTENT_UNAVAILABLE_ERROR).await;
            }
        };

        let page_type = page_type.or_else(|| state.detection.as_ref().map(|d| d.page_type));
        let orchestrator = Arc::clone(&self.orchestrator);
        let text = content.text;
        let task =
            tokio::spawn(async move { orchestrator.run_policy_analysis(&text, page_type).await });

        match task.await {
            Ok(analysis) => {
                let next = self
                    .store
                    .update(tab_id, StatePatch::scan_completed(analysis, Utc::now()))
                    .await;
                info!(%scan_id, tab_id, "Scan complete");
                if let Some(analysis) = next.analysis.clone() {
                    self.events.emit(ScanEvent::ScanComplete {
                        tab_id,
                        analysis,
                        detection: next.detection.clone(),
                    });
                }
                next
            }
            Err(e) => {
                error!(%scan_id, tab_id, error = %e, "Analysis task failed");
                self.fail(tab_id, ANALYSIS_FAILED_ERROR).await
            }
        }
    }

    async fn fail(&self, tab_id: TabId, message: &str) -> ScanState {
        let next = self
            .store
            .update(tab_id, StatePatch::scan_failed(message))
            .await;
        self.events.emit(ScanEvent::ScanError {
            tab_id,
            error: message.to_string(),
        });
        next
    }

    pub async fn get_state(&self, tab_id: TabId) -> ScanState {
        self.store.read(tab_id).await
    }

    pub async fn clear_state(&self, tab_id: TabId) {
        self.store.clear(tab_id).await;
    }

    /// The tab was closed.
    pub async fn on_tab_removed(&self, tab_id: TabId) {
        self.clear_state(tab_id).await;
    }

    /// The tab changed status; loading a new document destroys its state.
    pub async fn on_tab_updated(&self, tab_id: TabId, status: TabStatus) {
        if status == TabStatus::Loading {
            self.clear_state(tab_id).await;
        }
    }
}
