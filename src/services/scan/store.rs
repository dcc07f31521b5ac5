//! Scan State Store
//!
//! Per-tab `ScanState` held in a concurrent map and mirrored to a
//! `StateBackend`. Every write is a read-merge-write of the whole state.
//! Writes for one tab are serialized by a per-tab lock, so the cache and the
//! backend always end on the same state. Scans are not: two overlapping
//! scans interleave their patches and the last completion wins.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use policy_guardian_core::{ScanState, StateBackend, StateKey, StatePatch, TabId};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Keyed store with read / merge-write / delete.
pub struct ScanStateStore {
    cache: DashMap<TabId, ScanState>,
    write_locks: DashMap<TabId, Arc<Mutex<()>>>,
    backend: Arc<dyn StateBackend>,
}

impl ScanStateStore {
    pub fn new(backend: Arc<dyn StateBackend>) -> Self {
        Self {
            cache: DashMap::new(),
            write_locks: DashMap::new(),
            backend,
        }
    }

    fn write_lock(&self, tab_id: TabId) -> Arc<Mutex<()>> {
        self.write_locks.entry(tab_id).or_default().clone()
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Current state for a tab. Missing entries read as a default state;
    /// backend failures are logged and treated as missing.
    pub async fn read(&self, tab_id: TabId) -> ScanState {
        if let Some(state) = self.cache.get(&tab_id).map(|entry| entry.value().clone()) {
            return state;
        }

        let key = StateKey::for_tab(tab_id);
        match self.backend.load(&key).await {
            Ok(Some(state)) => {
                self.cache.insert(tab_id, state.clone());
                state
            }
            Ok(None) => ScanState::default(),
            Err(e) => {
                warn!(tab_id, backend = self.backend.name(), error = %e, "Failed to load scan state");
                ScanState::default()
            }
        }
    }

    /// Merge `patch` into whatever state is current and store the result.
    pub async fn update(&self, tab_id: TabId, patch: StatePatch) -> ScanState {
        let lock = self.write_lock(tab_id);
        let _guard = lock.lock().await;
        let current = self.read(tab_id).await;
        let next = current.merged(patch, Utc::now());
        self.write(tab_id, next.clone()).await;
        next
    }

    async fn write(&self, tab_id: TabId, state: ScanState) {
        let key = StateKey::for_tab(tab_id);
        if let Err(e) = self.backend.save(&key, &state).await {
            warn!(tab_id, backend = self.backend.name(), error = %e, "Failed to persist scan state");
        }
        self.cache.insert(tab_id, state);
    }

    /// Delete a tab's state everywhere.
    pub async fn clear(&self, tab_id: TabId) {
        let lock = self.write_lock(tab_id);
        let _guard = lock.lock().await;
        self.cache.remove(&tab_id);
        let key = StateKey::for_tab(tab_id);
        if let Err(e) = self.backend.remove(&key).await {
            warn!(tab_id, backend = self.backend.name(), error = %e, "Failed to remove scan state");
        }
        debug!(tab_id, "Cleared scan state");
    }
}
