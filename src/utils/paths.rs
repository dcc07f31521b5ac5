//! Cross-Platform Path Utilities
//!
//! Functions for resolving application directories across platforms.
//! Handles ~/.policy-guardian/ and its session subdirectory.

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the Policy Guardian directory (~/.policy-guardian/)
pub fn policy_guardian_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".policy-guardian"))
}

/// Get the config file path (~/.policy-guardian/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(policy_guardian_dir()?.join("config.json"))
}

/// Get the session state directory (~/.policy-guardian/session/)
pub fn session_state_dir() -> AppResult<PathBuf> {
    Ok(policy_guardian_dir()?.join("session"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the Policy Guardian directory, creating if it doesn't exist
pub fn ensure_policy_guardian_dir() -> AppResult<PathBuf> {
    let path = policy_guardian_dir()?;
    ensure_dir(&path)?;
    Ok(path)
}
