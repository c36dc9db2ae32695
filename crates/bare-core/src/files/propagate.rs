//! File propagation from the canonical worktree into a new one.
//!
//! Symlinked entries are deliberately shared state (secrets, local env
//! files): the worktree sees the `__main__` copy through the link. Copied
//! entries are deliberately forked per worktree and must not reflect later
//! edits to the main copy.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::types::WorktreeConfig;
use crate::files::errors::FileError;
use crate::files::types::PropagationSummary;

/// Propagate the configured file set from `main_path` into `worktree_path`.
///
/// Symlink patterns run first, then copy patterns, each in config order.
/// A pattern whose source is absent under `__main__` is skipped with a
/// warning, never an error.
pub fn propagate(
    config: &WorktreeConfig,
    main_path: &Path,
    worktree_path: &Path,
) -> Result<PropagationSummary, FileError> {
    info!(
        event = "core.files.propagate_started",
        main = %main_path.display(),
        worktree = %worktree_path.display(),
        symlink_count = config.symlink.len(),
        copy_count = config.copy.len()
    );

    let mut summary = PropagationSummary::default();

    for pattern in &config.symlink {
        let source = main_path.join(pattern);
        let target = worktree_path.join(pattern);

        if !source.exists() {
            warn!(
                event = "core.files.symlink_skipped",
                pattern = pattern.as_str(),
                "Source not found under __main__, skipping"
            );
            summary.skipped += 1;
            continue;
        }

        remove_existing(&target)?;
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }

        make_symlink(&source, &target).map_err(|e| FileError::SymlinkFailed {
            source_path: source.display().to_string(),
            dest_path: target.display().to_string(),
            message: e.to_string(),
        })?;

        debug!(
            event = "core.files.symlink_created",
            pattern = pattern.as_str(),
            target = %target.display()
        );
        summary.linked += 1;
    }

    for pattern in &config.copy {
        let source = main_path.join(pattern);
        let target = worktree_path.join(pattern);

        if !source.exists() {
            warn!(
                event = "core.files.copy_skipped",
                pattern = pattern.as_str(),
                "Source not found under __main__, skipping"
            );
            summary.skipped += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }

        copy_recursive(&source, &target).map_err(|e| FileError::CopyFailed {
            source_path: source.display().to_string(),
            dest_path: target.display().to_string(),
            message: e.to_string(),
        })?;

        debug!(
            event = "core.files.copy_created",
            pattern = pattern.as_str(),
            target = %target.display()
        );
        summary.copied += 1;
    }

    info!(
        event = "core.files.propagate_completed",
        linked = summary.linked,
        copied = summary.copied,
        skipped = summary.skipped
    );

    Ok(summary)
}

/// Remove whatever sits at `path`, tolerating absence.
fn remove_existing(path: &Path) -> Result<(), FileError> {
    match path.symlink_metadata() {
        Ok(metadata) if metadata.is_dir() => std::fs::remove_dir_all(path)?,
        Ok(_) => std::fs::remove_file(path)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(FileError::IoError { source: e }),
    }
    Ok(())
}

fn make_symlink(source: &Path, target: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(source, target)
    }
    #[cfg(windows)]
    {
        if source.is_dir() {
            std::os::windows::fs::symlink_dir(source, target)
        } else {
            std::os::windows::fs::symlink_file(source, target)
        }
    }
}

/// Copy a file, or a directory entry by entry preserving structure.
fn copy_recursive(source: &Path, dest: &Path) -> std::io::Result<()> {
    let metadata = std::fs::metadata(source)?;
    if !metadata.is_dir() {
        std::fs::copy(source, dest)?;
        return Ok(());
    }

    for entry in walkdir::WalkDir::new(source) {
        let entry = entry?;
        let relative = match entry.path().strip_prefix(source) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
        let tmp = TempDir::new().unwrap();
        let main = tmp.path().join("__main__");
        let worktree = tmp.path().join("feat-a");
        fs::create_dir_all(&main).unwrap();
        fs::create_dir_all(&worktree).unwrap();
        (tmp, main, worktree)
    }

    #[test]
    fn test_symlink_resolves_to_main_copy() {
        let (_tmp, main, worktree) = setup();
        fs::write(main.join(".env"), "SECRET=1\n").unwrap();

        let config = WorktreeConfig {
            symlink: vec![".env".to_string()],
            ..Default::default()
        };
        let summary = propagate(&config, &main, &worktree).unwrap();
        assert_eq!(summary.linked, 1);

        let linked = worktree.join(".env");
        assert!(linked.symlink_metadata().unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&linked).unwrap(), "SECRET=1\n");

        // Shared state: a later edit to main's copy shows through the link
        fs::write(main.join(".env"), "SECRET=2\n").unwrap();
        assert_eq!(fs::read_to_string(&linked).unwrap(), "SECRET=2\n");
    }

    #[test]
    fn test_copy_does_not_share_later_edits() {
        let (_tmp, main, worktree) = setup();
        fs::write(main.join(".env.example"), "EXAMPLE=1\n").unwrap();

        let config = WorktreeConfig {
            copy: vec![".env.example".to_string()],
            ..Default::default()
        };
        let summary = propagate(&config, &main, &worktree).unwrap();
        assert_eq!(summary.copied, 1);

        fs::write(main.join(".env.example"), "EXAMPLE=2\n").unwrap();
        assert_eq!(
            fs::read_to_string(worktree.join(".env.example")).unwrap(),
            "EXAMPLE=1\n"
        );
    }

    #[test]
    fn test_missing_source_skips_without_error() {
        let (_tmp, main, worktree) = setup();

        let config = WorktreeConfig {
            symlink: vec![".env".to_string()],
            copy: vec!["settings.local.json".to_string()],
            ..Default::default()
        };
        let summary = propagate(&config, &main, &worktree).unwrap();
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.linked, 0);
        assert_eq!(summary.copied, 0);
        assert!(!worktree.join(".env").exists());
        assert!(!worktree.join("settings.local.json").exists());
    }

    #[test]
    fn test_symlink_replaces_existing_target() {
        let (_tmp, main, worktree) = setup();
        fs::write(main.join(".env"), "MAIN\n").unwrap();
        fs::write(worktree.join(".env"), "STALE\n").unwrap();

        let config = WorktreeConfig {
            symlink: vec![".env".to_string()],
            ..Default::default()
        };
        propagate(&config, &main, &worktree).unwrap();

        let linked = worktree.join(".env");
        assert!(linked.symlink_metadata().unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&linked).unwrap(), "MAIN\n");
    }

    #[test]
    fn test_symlink_replaces_existing_directory_target() {
        let (_tmp, main, worktree) = setup();
        fs::create_dir_all(main.join("certs")).unwrap();
        fs::write(main.join("certs/dev.pem"), "cert\n").unwrap();
        fs::create_dir_all(worktree.join("certs")).unwrap();
        fs::write(worktree.join("certs/old.pem"), "old\n").unwrap();

        let config = WorktreeConfig {
            symlink: vec!["certs".to_string()],
            ..Default::default()
        };
        propagate(&config, &main, &worktree).unwrap();

        let linked = worktree.join("certs");
        assert!(linked.symlink_metadata().unwrap().file_type().is_symlink());
        assert!(linked.join("dev.pem").exists());
        assert!(!linked.join("old.pem").exists());
    }

    #[test]
    fn test_copy_directory_preserves_structure() {
        let (_tmp, main, worktree) = setup();
        fs::create_dir_all(main.join("fixtures/nested")).unwrap();
        fs::write(main.join("fixtures/a.json"), "{}").unwrap();
        fs::write(main.join("fixtures/nested/b.json"), "{}").unwrap();

        let config = WorktreeConfig {
            copy: vec!["fixtures".to_string()],
            ..Default::default()
        };
        let summary = propagate(&config, &main, &worktree).unwrap();
        assert_eq!(summary.copied, 1);
        assert!(worktree.join("fixtures/a.json").exists());
        assert!(worktree.join("fixtures/nested/b.json").exists());
    }

    #[test]
    fn test_nested_pattern_creates_parents() {
        let (_tmp, main, worktree) = setup();
        fs::create_dir_all(main.join("config/local")).unwrap();
        fs::write(main.join("config/local/dev.toml"), "x = 1\n").unwrap();

        let config = WorktreeConfig {
            symlink: vec!["config/local/dev.toml".to_string()],
            ..Default::default()
        };
        propagate(&config, &main, &worktree).unwrap();
        assert_eq!(
            fs::read_to_string(worktree.join("config/local/dev.toml")).unwrap(),
            "x = 1\n"
        );
    }

    #[test]
    fn test_patterns_run_in_config_order() {
        let (_tmp, main, worktree) = setup();
        fs::write(main.join("a.txt"), "a\n").unwrap();
        fs::write(main.join("b.txt"), "b\n").unwrap();

        let config = WorktreeConfig {
            symlink: vec!["a.txt".to_string()],
            copy: vec!["b.txt".to_string()],
            ..Default::default()
        };
        let summary = propagate(&config, &main, &worktree).unwrap();
        assert_eq!(summary.linked, 1);
        assert_eq!(summary.copied, 1);
    }
}
