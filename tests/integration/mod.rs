//! Integration Tests Module
//!
//! End-to-end tests for Policy Guardian: page classification, the analysis
//! pipeline with and without a generative provider, the per-tab scan
//! lifecycle, and the message contract.

// Mock providers and page fixtures
mod support;

// Classifier over captured pages
mod classifier_test;

// Analysis orchestrator with mock providers
mod analysis_test;

// Scan state machine and broadcast events
mod scan_lifecycle_test;

// Message routing through AppState
mod messages_test;
