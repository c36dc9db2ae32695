//! Configuration type definitions.
//!
//! Two kinds of configuration exist: the runtime [`Config`] derived from
//! environment variables and system defaults, and the TOML-backed
//! [`BareConfig`] loaded from config files. Per-repository propagation
//! settings live in [`WorktreeConfig`], persisted separately through a
//! [`super::store::WorktreeConfigStore`].
//!
//! # Example Configuration
//!
//! ```toml
//! [git]
//! upstream_remote = "upstream"
//!
//! [install]
//! default_manager = "npm"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::install::types::PackageManager;

/// Runtime configuration.
///
/// Holds paths and settings derived from environment variables and system
/// defaults, not from config files.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory for bare data (default: ~/.bare)
    pub bare_dir: PathBuf,
    /// Root under which cloned repositories are laid out as
    /// `{workspace_root}/{owner}/{name}` (default: ~/GitHub)
    pub workspace_root: PathBuf,
    /// Log level for the application
    pub log_level: String,
}

/// Main configuration loaded from TOML config files.
///
/// Loaded from `~/.bare/config.toml` and `./.bare/config.toml`; project
/// config values override user config values.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BareConfig {
    /// Git-related settings
    #[serde(default)]
    pub git: GitSettings,

    /// Dependency installation settings
    #[serde(default)]
    pub install: InstallSettings,
}

/// Git-related settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitSettings {
    /// Remote that `__main__` is updated from when a repository's
    /// worktree config does not name one. Default: "origin".
    #[serde(default = "super::defaults::default_upstream_remote")]
    pub upstream_remote: String,
}

/// Dependency installation settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InstallSettings {
    /// Package manager to use when no lockfile identifies one.
    /// Default: pnpm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_manager: Option<PackageManager>,
}

/// Per-repository worktree propagation settings.
///
/// Read once at worktree-creation time; edits do not retroactively affect
/// existing worktrees. Both pattern lists are ordered and hold paths
/// relative to the `__main__` worktree.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WorktreeConfig {
    /// Entries symlinked into every new worktree (shared state, e.g. `.env`).
    #[serde(default)]
    pub symlink: Vec<String>,

    /// Entries copied into every new worktree (forked per worktree; later
    /// edits to the main copy must not leak through).
    #[serde(default)]
    pub copy: Vec<String>,

    /// Remote that branches are based on and `__main__` pulls from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_remote: Option<String>,
}

impl WorktreeConfig {
    /// Effective upstream remote, defaulting to "origin".
    pub fn upstream_remote(&self) -> &str {
        self.upstream_remote
            .as_deref()
            .unwrap_or(super::defaults::DEFAULT_UPSTREAM_REMOTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_config_serialization() {
        let config = BareConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: BareConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.git.upstream_remote, parsed.git.upstream_remote);
    }

    #[test]
    fn test_worktree_config_upstream_default() {
        let config = WorktreeConfig::default();
        assert_eq!(config.upstream_remote(), "origin");

        let config = WorktreeConfig {
            upstream_remote: Some("fork".to_string()),
            ..Default::default()
        };
        assert_eq!(config.upstream_remote(), "fork");
    }

    #[test]
    fn test_worktree_config_json_round_trip() {
        let config = WorktreeConfig {
            symlink: vec![".env".to_string(), ".env.local".to_string()],
            copy: vec![".env.example".to_string()],
            upstream_remote: None,
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: WorktreeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
        // Absent upstream stays absent rather than serializing as null
        assert!(!json.contains("upstream_remote"));
    }

    #[test]
    fn test_install_settings_from_toml() {
        let config: BareConfig = toml::from_str(
            r#"
[install]
default_manager = "yarn"
"#,
        )
        .unwrap();
        assert_eq!(config.install.default_manager, Some(PackageManager::Yarn));
    }
}
