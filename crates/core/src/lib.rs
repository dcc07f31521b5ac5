//! Policy Guardian Core
//!
//! Domain models, error types, and the persistence trait shared by the
//! Policy Guardian workspace. This crate has no dependency on the analysis
//! services, the LLM providers, or any storage backend.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `page` - Page types and classifier detections (`PageType`, `Detection`)
//! - `analysis` - Analysis results (`Analysis`, `SuspiciousClause`, `RiskHeatmapEntry`)
//! - `state` - Per-tab scan state and merge patches (`ScanState`, `StatePatch`)
//! - `backend` - Persistence trait for scan state (`StateBackend`, `StateKey`)

pub mod analysis;
pub mod backend;
pub mod error;
pub mod page;
pub mod state;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Page Detection ─────────────────────────────────────────────────────
pub use page::{Detection, PageType};

// ── Analysis Results ───────────────────────────────────────────────────
pub use analysis::{
    clamp_risk, Analysis, Evidence, RiskHeatmapEntry, SuspiciousClause, MAX_RISK, MIN_RISK,
};

// ── Scan State ─────────────────────────────────────────────────────────
pub use state::{ScanState, StatePatch, TabId};

// ── Persistence ────────────────────────────────────────────────────────
pub use backend::{StateBackend, StateKey, STATE_KEY_PREFIX};
