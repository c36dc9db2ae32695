//! Per-repository worktree config persistence.
//!
//! The orchestrator never reaches for ambient global state; it is handed a
//! [`WorktreeConfigStore`] and reads a repository's [`WorktreeConfig`] once,
//! at worktree-creation time. [`JsonConfigStore`] persists the whole store
//! as one flat JSON object keyed by repository root path;
//! [`MemoryConfigStore`] backs fixture-free tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{error, info};

use crate::config::types::WorktreeConfig;
use crate::errors::ConfigError;

/// Keyed access to per-repository worktree configs.
pub trait WorktreeConfigStore: Send + Sync {
    /// Config for a repository root; a repository with no stored config
    /// gets the empty default (no propagation, origin upstream).
    fn get(&self, repo_root: &Path) -> WorktreeConfig;

    /// Persist a repository's config.
    fn set(&self, repo_root: &Path, config: &WorktreeConfig) -> Result<(), ConfigError>;
}

/// File-backed store: one JSON object mapping repository root paths to
/// their [`WorktreeConfig`].
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the whole store, degrading to empty on a missing or corrupted
    /// file. Corruption is logged at error level: it means stored
    /// propagation settings were lost and the user must act.
    fn read_store(&self) -> BTreeMap<String, WorktreeConfig> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                error!(
                    event = "core.config.store_read_failed",
                    path = %self.path.display(),
                    error = %e
                );
                return BTreeMap::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(store) => store,
            Err(e) => {
                error!(
                    event = "core.config.store_parse_failed",
                    path = %self.path.display(),
                    error = %e,
                    "Worktree config store contains invalid JSON - propagation settings lost"
                );
                BTreeMap::new()
            }
        }
    }

    fn write_store(&self, store: &BTreeMap<String, WorktreeConfig>) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::ConfigWriteError {
                message: format!("Failed to create directory ({}): {}", parent.display(), e),
            })?;
        }

        let json =
            serde_json::to_string_pretty(store).map_err(|e| ConfigError::ConfigWriteError {
                message: format!("Failed to serialize worktree configs: {}", e),
            })?;

        std::fs::write(&self.path, json).map_err(|e| ConfigError::ConfigWriteError {
            message: format!("Failed to write '{}': {}", self.path.display(), e),
        })?;

        info!(
            event = "core.config.store_saved",
            path = %self.path.display(),
            count = store.len()
        );

        Ok(())
    }
}

impl WorktreeConfigStore for JsonConfigStore {
    fn get(&self, repo_root: &Path) -> WorktreeConfig {
        self.read_store()
            .remove(&repo_root.display().to_string())
            .unwrap_or_default()
    }

    fn set(&self, repo_root: &Path, config: &WorktreeConfig) -> Result<(), ConfigError> {
        let mut store = self.read_store();
        store.insert(repo_root.display().to_string(), config.clone());
        self.write_store(&store)
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryConfigStore {
    inner: Mutex<BTreeMap<PathBuf, WorktreeConfig>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct pre-populated with a single repository's config.
    pub fn with_config(repo_root: &Path, config: WorktreeConfig) -> Self {
        let store = Self::new();
        store
            .inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(repo_root.to_path_buf(), config);
        store
    }
}

impl WorktreeConfigStore for MemoryConfigStore {
    fn get(&self, repo_root: &Path) -> WorktreeConfig {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(repo_root)
            .cloned()
            .unwrap_or_default()
    }

    fn set(&self, repo_root: &Path, config: &WorktreeConfig) -> Result<(), ConfigError> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(repo_root.to_path_buf(), config.clone());
        Ok(())
    }
}
