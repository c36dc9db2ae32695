//! Configuration loading and merging logic.
//!
//! Configuration is loaded in the following order (later sources override
//! earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.bare/config.toml` (global user preferences)
//! 3. **Project config** - `./.bare/config.toml` (project-specific overrides)

use std::fs;
use std::path::PathBuf;

use crate::config::types::{BareConfig, GitSettings, InstallSettings};
use crate::errors::ConfigError;

/// Load configuration from the hierarchy of config files.
///
/// # Errors
///
/// Returns an error on unreadable or unparseable config files. Missing
/// config files are not errors.
pub fn load_hierarchy() -> Result<BareConfig, ConfigError> {
    let mut config = BareConfig::default();

    if let Some(user_config) = load_optional(user_config_path())? {
        config = merge_configs(config, user_config);
    }

    if let Some(project_config) = load_optional(project_config_path()?)? {
        config = merge_configs(config, project_config);
    }

    Ok(config)
}

fn user_config_path() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(".bare").join("config.toml"),
        None => PathBuf::from(".bare").join("config.toml"),
    }
}

fn project_config_path() -> Result<PathBuf, ConfigError> {
    Ok(std::env::current_dir()?.join(".bare").join("config.toml"))
}

/// Load a config file, treating a missing file as `None`.
fn load_optional(path: PathBuf) -> Result<Option<BareConfig>, ConfigError> {
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ConfigError::IoError { source: e }),
    };

    let config: BareConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
            message: format!("'{}': {}", path.display(), e),
        })?;
    Ok(Some(config))
}

/// Merge two configurations, with `override_config` taking precedence.
pub fn merge_configs(base: BareConfig, override_config: BareConfig) -> BareConfig {
    BareConfig {
        git: GitSettings {
            // The serde default is "origin"; an explicit value in the
            // override file always wins.
            upstream_remote: override_config.git.upstream_remote,
        },
        install: InstallSettings {
            default_manager: override_config
                .install
                .default_manager
                .or(base.install.default_manager),
        },
    }
}

impl BareConfig {
    /// Load configuration from the hierarchy of config files.
    pub fn load_hierarchy() -> Result<BareConfig, ConfigError> {
        load_hierarchy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::types::PackageManager;

    #[test]
    fn test_merge_prefers_override_install_manager() {
        let base: BareConfig = toml::from_str(
            r#"
[install]
default_manager = "npm"
"#,
        )
        .unwrap();
        let override_config: BareConfig = toml::from_str(
            r#"
[install]
default_manager = "bun"
"#,
        )
        .unwrap();

        let merged = merge_configs(base, override_config);
        assert_eq!(merged.install.default_manager, Some(PackageManager::Bun));
    }

    #[test]
    fn test_merge_keeps_base_when_override_absent() {
        let base: BareConfig = toml::from_str(
            r#"
[install]
default_manager = "yarn"
"#,
        )
        .unwrap();
        let override_config: BareConfig = toml::from_str("").unwrap();

        let merged = merge_configs(base, override_config);
        assert_eq!(merged.install.default_manager, Some(PackageManager::Yarn));
    }

    #[test]
    fn test_load_optional_missing_file() {
        let missing = std::env::temp_dir().join("bare-test-does-not-exist/config.toml");
        let loaded = load_optional(missing).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_optional_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "invalid toml [[[").unwrap();

        let result = load_optional(path);
        assert!(matches!(
            result,
            Err(ConfigError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_load_optional_reads_valid_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[git]
upstream_remote = "upstream"
"#,
        )
        .unwrap();

        let loaded = load_optional(path).unwrap().unwrap();
        assert_eq!(loaded.git.upstream_remote, "upstream");
    }
}
