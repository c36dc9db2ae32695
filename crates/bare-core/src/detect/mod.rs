//! First-match-wins detection tables.
//!
//! Both detections are ordered lists of (marker, result) pairs evaluated
//! against the canonical `__main__` worktree; the first marker that exists
//! wins and a fixed default applies when none match.

use std::path::Path;

use tracing::debug;

use crate::git::types::MAIN_WORKTREE;
use crate::install::types::PackageManager;
use crate::registry::types::RepoKind;

/// Lockfile checks in priority order.
const LOCKFILE_CHECKS: &[(&str, PackageManager)] = &[
    ("pnpm-lock.yaml", PackageManager::Pnpm),
    ("yarn.lock", PackageManager::Yarn),
    ("bun.lockb", PackageManager::Bun),
    ("package-lock.json", PackageManager::Npm),
];

/// Repository-kind markers in priority order. The `workspace` kind has no
/// single marker file and is probed separately via package.json.
const KIND_MARKERS: &[(&str, RepoKind)] = &[
    ("turbo.json", RepoKind::Turborepo),
    ("nx.json", RepoKind::Nx),
    ("lerna.json", RepoKind::Lerna),
];

/// Detect the package manager from lockfiles in `{repo_root}/__main__`.
pub fn detect_package_manager(repo_root: &Path, fallback: PackageManager) -> PackageManager {
    let main = repo_root.join(MAIN_WORKTREE);
    for (lockfile, manager) in LOCKFILE_CHECKS {
        if main.join(lockfile).exists() {
            debug!(
                event = "core.detect.package_manager",
                manager = %manager,
                lockfile = lockfile
            );
            return *manager;
        }
    }
    debug!(
        event = "core.detect.package_manager_fallback",
        manager = %fallback
    );
    fallback
}

/// Detect the repository kind from marker files in `{repo_root}/__main__`.
pub fn detect_repo_kind(repo_root: &Path) -> RepoKind {
    let main = repo_root.join(MAIN_WORKTREE);
    for (marker, kind) in KIND_MARKERS {
        if main.join(marker).exists() {
            debug!(event = "core.detect.repo_kind", kind = %kind, marker = marker);
            return *kind;
        }
    }

    if has_workspace_manifest(&main) {
        debug!(event = "core.detect.repo_kind", kind = %RepoKind::Workspace);
        return RepoKind::Workspace;
    }

    RepoKind::Standard
}

/// True when package.json declares `workspaces` (npm/yarn) or
/// `pnpm.workspaces`.
fn has_workspace_manifest(main: &Path) -> bool {
    let Ok(content) = std::fs::read_to_string(main.join("package.json")) else {
        return false;
    };
    let Ok(pkg) = serde_json::from_str::<serde_json::Value>(&content) else {
        return false;
    };
    pkg.get("workspaces").is_some() || pkg.pointer("/pnpm/workspaces").is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn repo_with_main() -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let main = dir.path().join(MAIN_WORKTREE);
        fs::create_dir_all(&main).unwrap();
        (dir, main)
    }

    #[test]
    fn test_detect_package_manager_priority_order() {
        let (dir, main) = repo_with_main();

        // No lockfile: fallback wins
        assert_eq!(
            detect_package_manager(dir.path(), PackageManager::Pnpm),
            PackageManager::Pnpm
        );

        fs::write(main.join("package-lock.json"), "{}").unwrap();
        assert_eq!(
            detect_package_manager(dir.path(), PackageManager::Pnpm),
            PackageManager::Npm
        );

        // pnpm-lock.yaml outranks package-lock.json
        fs::write(main.join("pnpm-lock.yaml"), "").unwrap();
        assert_eq!(
            detect_package_manager(dir.path(), PackageManager::Npm),
            PackageManager::Pnpm
        );
    }

    #[test]
    fn test_detect_package_manager_yarn_and_bun() {
        let (dir, main) = repo_with_main();

        fs::write(main.join("bun.lockb"), "").unwrap();
        assert_eq!(
            detect_package_manager(dir.path(), PackageManager::Pnpm),
            PackageManager::Bun
        );

        // yarn.lock outranks bun.lockb
        fs::write(main.join("yarn.lock"), "").unwrap();
        assert_eq!(
            detect_package_manager(dir.path(), PackageManager::Pnpm),
            PackageManager::Yarn
        );
    }

    #[test]
    fn test_detect_repo_kind_markers() {
        let (dir, main) = repo_with_main();
        assert_eq!(detect_repo_kind(dir.path()), RepoKind::Standard);

        fs::write(main.join("lerna.json"), "{}").unwrap();
        assert_eq!(detect_repo_kind(dir.path()), RepoKind::Lerna);

        fs::write(main.join("nx.json"), "{}").unwrap();
        assert_eq!(detect_repo_kind(dir.path()), RepoKind::Nx);

        fs::write(main.join("turbo.json"), "{}").unwrap();
        assert_eq!(detect_repo_kind(dir.path()), RepoKind::Turborepo);
    }

    #[test]
    fn test_detect_repo_kind_workspace_manifest() {
        let (dir, main) = repo_with_main();

        fs::write(main.join("package.json"), r#"{"name": "plain"}"#).unwrap();
        assert_eq!(detect_repo_kind(dir.path()), RepoKind::Standard);

        fs::write(
            main.join("package.json"),
            r#"{"name": "mono", "workspaces": ["packages/*"]}"#,
        )
        .unwrap();
        assert_eq!(detect_repo_kind(dir.path()), RepoKind::Workspace);

        fs::write(
            main.join("package.json"),
            r#"{"name": "mono", "pnpm": {"workspaces": ["packages/*"]}}"#,
        )
        .unwrap();
        assert_eq!(detect_repo_kind(dir.path()), RepoKind::Workspace);
    }

    #[test]
    fn test_detect_repo_kind_malformed_package_json() {
        let (dir, main) = repo_with_main();
        fs::write(main.join("package.json"), "not json").unwrap();
        assert_eq!(detect_repo_kind(dir.path()), RepoKind::Standard);
    }
}
