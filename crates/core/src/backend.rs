//! State Backend Trait
//!
//! Session-scoped persistence for per-tab scan state. Entries are keyed
//! `policy-state:<tabId>`, one `ScanState` per key. Losing the store on
//! restart is acceptable.

use async_trait::async_trait;

use crate::error::{CoreError, CoreResult};
use crate::state::{ScanState, TabId};

/// Prefix shared by every persisted state key.
pub const STATE_KEY_PREFIX: &str = "policy-state:";

/// Validated persistence key for one tab.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey(String);

impl StateKey {
    pub fn for_tab(tab_id: TabId) -> Self {
        Self(format!("{}{}", STATE_KEY_PREFIX, tab_id))
    }

    /// Parse a raw key back into a state key.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let tab = raw.strip_prefix(STATE_KEY_PREFIX).ok_or_else(|| {
            CoreError::parse(format!(
                "State key must start with '{}'. Got: '{}'",
                STATE_KEY_PREFIX, raw
            ))
        })?;
        let tab_id: TabId = tab
            .parse()
            .map_err(|_| CoreError::parse(format!("Invalid tab id in state key: '{}'", raw)))?;
        Ok(Self::for_tab(tab_id))
    }

    /// The tab this key belongs to.
    pub fn tab_id(&self) -> TabId {
        // Constructed only through `for_tab`/`parse`, so the suffix is numeric.
        self.0[STATE_KEY_PREFIX.len()..].parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Async persistence for scan state.
///
/// Implementations report failures; the scan service logs and swallows them
/// so that a broken store never blocks a scan.
#[async_trait]
pub trait StateBackend: Send + Sync {
    /// Short backend name for logging.
    fn name(&self) -> &str;

    /// Load the state stored under `key`, if any.
    async fn load(&self, key: &StateKey) -> CoreResult<Option<ScanState>>;

    /// Store `state` under `key`, replacing any previous value.
    async fn save(&self, key: &StateKey, state: &ScanState) -> CoreResult<()>;

    /// Remove the entry under `key`. Removing a missing key succeeds.
    async fn remove(&self, key: &StateKey) -> CoreResult<()>;
}
