//! Scan State Machine
//!
//! Per-tab state store, persistence backends, broadcast events and the scan
//! service tying them to the analysis orchestrator.

pub mod backends;
pub mod events;
pub mod service;
pub mod store;

pub use backends::{JsonFileBackend, MemoryBackend};
pub use events::{EventBus, ScanEvent, EVENT_CHANNEL_CAPACITY};
pub use service::{
    ScanService, TabStatus, ANALYSIS_FAILED_ERROR, CONTENT_UNAVAILABLE_ERROR, DEFAULT_SCAN_ORIGIN,
};
pub use store::ScanStateStore;
