//! Data Models
//!
//! Configuration and response envelopes used throughout the application.

pub mod response;
pub mod settings;

pub use response::*;
pub use settings::*;
