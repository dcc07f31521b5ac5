//! Policy Guardian Library
//!
//! Detects terms-of-service and privacy-policy pages, analyzes them for risky
//! clauses, and tracks a per-tab scan lifecycle. It includes:
//! - Message and command handlers
//! - Classifier, analysis and scan services
//! - Configuration storage
//! - Data models and utilities

pub mod commands;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use commands::{analyze_page, classify_page, handle_message, load_snapshot};
pub use models::response::*;
pub use models::settings::AppConfig;
pub use state::AppState;
pub use utils::error::{AppError, AppResult};
