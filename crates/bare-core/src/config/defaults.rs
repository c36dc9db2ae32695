//! Default implementations for configuration types.

use crate::config::types::{Config, GitSettings};
use std::path::PathBuf;

/// Remote used when neither the worktree config nor the TOML config
/// names one.
pub const DEFAULT_UPSTREAM_REMOTE: &str = "origin";

/// Returns the default upstream remote name.
///
/// Used by serde `#[serde(default = "...")]` attribute.
pub fn default_upstream_remote() -> String {
    DEFAULT_UPSTREAM_REMOTE.to_string()
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            upstream_remote: default_upstream_remote(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let home = match dirs::home_dir() {
            Some(home) => home,
            None => {
                eprintln!(
                    "Warning: Could not find home directory. Set HOME environment variable. \
                    Using fallback directory."
                );
                std::env::temp_dir()
            }
        };

        let workspace_root = match std::env::var("BARE_WORKSPACE_ROOT") {
            Ok(val) if !val.trim().is_empty() => PathBuf::from(val),
            _ => home.join("GitHub"),
        };

        Self {
            bare_dir: home.join(".bare"),
            workspace_root,
            log_level: std::env::var("BARE_LOG_LEVEL").unwrap_or("info".to_string()),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the JSON store holding per-repository worktree configs.
    pub fn worktree_config_file(&self) -> PathBuf {
        self.bare_dir.join("worktree-config.json")
    }
}
