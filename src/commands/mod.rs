//! Command Handlers
//!
//! Entry points shared by the message contract and the command line.

pub mod messages;
pub mod page;
pub mod settings;

pub use messages::{dispatch, handle_message, InboundMessage, MISSING_TAB_ERROR, UNKNOWN_MESSAGE_ERROR};
pub use page::{analyze_page, classify_page, load_snapshot, preview_page};
pub use settings::{get_settings, reset_settings};
