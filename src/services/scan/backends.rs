//! State Backends
//!
//! `MemoryBackend` keeps state for the life of the process; `JsonFileBackend`
//! writes one JSON file per tab into a session directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dashmap::DashMap;
use policy_guardian_core::{CoreError, CoreResult, ScanState, StateBackend, StateKey};
use tracing::debug;
use uuid::Uuid;

/// In-process backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: DashMap<StateKey, ScanState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl StateBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self, key: &StateKey) -> CoreResult<Option<ScanState>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn save(&self, key: &StateKey, state: &ScanState) -> CoreResult<()> {
        self.entries.insert(key.clone(), state.clone());
        Ok(())
    }

    async fn remove(&self, key: &StateKey) -> CoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per tab under a directory.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path for a key. `:` is not portable in file names.
    pub fn path_for(&self, key: &StateKey) -> PathBuf {
        self.dir
            .join(format!("{}.json", key.as_str().replace(':', "-")))
    }

    /// Delete every state file in the directory, including temp files left
    /// by an interrupted save.
    pub async fn purge(&self) -> CoreResult<usize> {
        let mut removed = 0;
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_state_file = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| {
                    n.starts_with("policy-state-") && (n.ends_with(".json") || n.ends_with(".tmp"))
                })
                .unwrap_or(false);
            if is_state_file {
                tokio::fs::remove_file(&path).await?;
                removed += 1;
            }
        }
        debug!(dir = %self.dir.display(), removed, "Purged session state");
        Ok(removed)
    }
}

#[async_trait]
impl StateBackend for JsonFileBackend {
    fn name(&self) -> &str {
        "json-file"
    }

    async fn load(&self, key: &StateKey) -> CoreResult<Option<ScanState>> {
        let path = self.path_for(key);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let state = serde_json::from_str(&content)?;
        Ok(Some(state))
    }

    async fn save(&self, key: &StateKey, state: &ScanState) -> CoreResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(key);
        // One temp file per write so overlapping saves never share it
        let tmp = path.with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()));
        let content = serde_json::to_string_pretty(state)?;
        tokio::fs::write(&tmp, content).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(CoreError::storage(format!("{}: {}", path.display(), e)));
        }
        Ok(())
    }

    async fn remove(&self, key: &StateKey) -> CoreResult<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
