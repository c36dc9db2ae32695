use std::fmt;

use serde::{Deserialize, Serialize};

/// Package managers the installer knows how to drive.
///
/// Each variant's CLI verb is plain `install`; the managers differ only in
/// binary name and the lockfile that identifies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Pnpm,
    Yarn,
    Bun,
    Npm,
}

impl PackageManager {
    /// Binary name on PATH.
    pub fn command(&self) -> &'static str {
        match self {
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
            PackageManager::Npm => "npm",
        }
    }

    /// Lockfile that identifies this manager.
    pub fn lockfile(&self) -> &'static str {
        match self {
            PackageManager::Pnpm => "pnpm-lock.yaml",
            PackageManager::Yarn => "yarn.lock",
            PackageManager::Bun => "bun.lockb",
            PackageManager::Npm => "package-lock.json",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names() {
        assert_eq!(PackageManager::Pnpm.command(), "pnpm");
        assert_eq!(PackageManager::Yarn.command(), "yarn");
        assert_eq!(PackageManager::Bun.command(), "bun");
        assert_eq!(PackageManager::Npm.command(), "npm");
    }

    #[test]
    fn test_display_matches_command() {
        assert_eq!(PackageManager::Npm.to_string(), "npm");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&PackageManager::Pnpm).unwrap();
        assert_eq!(json, "\"pnpm\"");
        let parsed: PackageManager = serde_json::from_str("\"bun\"").unwrap();
        assert_eq!(parsed, PackageManager::Bun);
    }
}
