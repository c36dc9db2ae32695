use std::path::Path;

use tracing::{error, info, warn};

use crate::install::errors::InstallError;
use crate::install::types::PackageManager;

/// Run the manager's install verb with `root` as working directory.
///
/// Installation is always manager-driven (never a raw copy of dependency
/// trees) so per-worktree lockfile deltas are honored while the manager's
/// own content cache keeps it fast.
///
/// # Errors
///
/// Returns `InstallError::InstallFailed` with the exit code and stderr on a
/// non-zero exit, `InstallError::SpawnFailed` if the binary cannot be run.
pub fn install(root: &Path, manager: PackageManager) -> Result<(), InstallError> {
    if which::which(manager.command()).is_err() {
        warn!(
            event = "core.install.manager_not_on_path",
            manager = %manager,
            "Package manager binary not found in PATH - install will likely fail"
        );
    }

    info!(
        event = "core.install.started",
        manager = %manager,
        path = %root.display()
    );

    let output = std::process::Command::new(manager.command())
        .current_dir(root)
        .arg("install")
        .output()
        .map_err(|e| InstallError::SpawnFailed {
            manager,
            message: e.to_string(),
        })?;

    if output.status.success() {
        info!(
            event = "core.install.completed",
            manager = %manager,
            path = %root.display()
        );
        return Ok(());
    }

    let code = output.status.code().unwrap_or(-1);
    let stderr = String::from_utf8_lossy(&output.stderr);
    error!(
        event = "core.install.failed",
        manager = %manager,
        path = %root.display(),
        code = code,
        stderr = %stderr.trim()
    );
    Err(InstallError::InstallFailed {
        manager,
        code,
        message: stderr.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_install_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone");

        // Spawning in a nonexistent cwd fails before the manager runs
        let result = install(&missing, PackageManager::Npm);
        assert!(result.is_err());
    }
}
