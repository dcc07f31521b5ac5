//! Settings Commands
//!
//! Commands for reading and resetting application settings.

use crate::models::response::CommandResponse;
use crate::models::settings::AppConfig;
use crate::storage::ConfigService;

/// Placeholder shown instead of a configured API key.
pub const REDACTED: &str = "********";

/// Get the effective settings with secrets redacted
pub fn get_settings(config: &ConfigService) -> CommandResponse<AppConfig> {
    let mut effective = config.effective_config();
    if let Some(provider) = effective.provider.as_mut() {
        if provider.api_key.is_some() {
            provider.api_key = Some(REDACTED.to_string());
        }
    }
    CommandResponse::ok(effective)
}

/// Reset settings to defaults and persist them
pub fn reset_settings(config: &mut ConfigService) -> CommandResponse<AppConfig> {
    match config.reset() {
        Ok(()) => CommandResponse::ok(config.get_config().clone()),
        Err(e) => CommandResponse::err(e.to_string()),
    }
}
