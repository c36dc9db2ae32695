//! Worktree and branch management against a bare-rooted repository.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::git::cli::{is_already_up_to_date, run_git, validate_git_arg};
use crate::git::errors::GitError;
use crate::git::types::{MAIN_WORKTREE, Worktree, parse_worktree_list};

/// Create a worktree named `name` under the repository root.
///
/// With an explicit `branch`, the worktree checks out that exact branch and
/// any tool failure surfaces verbatim. Without one, a local or
/// `{upstream}/{name}` branch matching `name` is force-reset onto
/// `{upstream}/main` (`-B`), so a worktree whose branch outlived a prior
/// deletion can be recreated; otherwise a fresh branch is created from
/// `{upstream}/main` (`-b`). Either way the new branch tracks the upstream
/// base.
///
/// Returns the new worktree's absolute path.
///
/// # Errors
///
/// `GitError::WorktreeExists` if the target path already names a worktree,
/// `GitError::WorktreeOpFailed` carrying the tool diagnostic otherwise.
pub fn add_worktree(
    repo_root: &Path,
    name: &str,
    branch: Option<&str>,
    upstream: &str,
) -> Result<PathBuf, GitError> {
    validate_git_arg(name, "worktree name")?;
    validate_git_arg(upstream, "remote name")?;
    if let Some(branch) = branch {
        validate_git_arg(branch, "branch name")?;
    }

    info!(
        event = "core.git.worktree.add_started",
        name = name,
        branch = branch.unwrap_or("<new>"),
        path = %repo_root.display()
    );

    let worktree_path = repo_root.join(name);
    if worktree_path.exists() {
        error!(
            event = "core.git.worktree.add_failed",
            name = name,
            worktree_path = %worktree_path.display(),
            error = "worktree already exists"
        );
        return Err(GitError::WorktreeExists {
            path: worktree_path.display().to_string(),
        });
    }

    let output = match branch {
        Some(branch) => run_git(repo_root, &["worktree", "add", name, branch])?,
        None => {
            let branches = list_branches(repo_root)?;
            let remote_name = format!("{}/{}", upstream, name);
            let branch_exists = branches.iter().any(|b| b == name || *b == remote_name);
            let base = format!("{}/main", upstream);

            if branch_exists {
                debug!(
                    event = "core.git.worktree.branch_reused",
                    name = name,
                    base = %base,
                    "Branch already exists, force-resetting onto upstream base"
                );
                run_git(repo_root, &["worktree", "add", "-B", name, name, &base])?
            } else {
                run_git(repo_root, &["worktree", "add", "-b", name, name, &base])?
            }
        }
    };

    if !output.success {
        error!(
            event = "core.git.worktree.add_failed",
            name = name,
            code = output.code,
            stderr = %output.diagnostic()
        );
        return Err(GitError::WorktreeOpFailed {
            message: output.diagnostic().to_string(),
        });
    }

    info!(
        event = "core.git.worktree.add_completed",
        name = name,
        worktree_path = %worktree_path.display()
    );

    Ok(worktree_path)
}

/// Force-remove a worktree, then best-effort delete its same-named branch.
///
/// Branch deletion failure (branch checked out elsewhere, or absent) is
/// swallowed. Worktree removal failure is fatal.
pub fn remove_worktree(repo_root: &Path, name: &str) -> Result<(), GitError> {
    validate_git_arg(name, "worktree name")?;

    info!(
        event = "core.git.worktree.remove_started",
        name = name,
        path = %repo_root.display()
    );

    let output = run_git(repo_root, &["worktree", "remove", name, "--force"])?;
    if !output.success {
        let diagnostic = output.diagnostic();
        if diagnostic.contains("is not a working tree") {
            return Err(GitError::WorktreeNotFound {
                name: name.to_string(),
            });
        }
        error!(
            event = "core.git.worktree.remove_failed",
            name = name,
            stderr = %diagnostic
        );
        return Err(GitError::WorktreeOpFailed {
            message: diagnostic.to_string(),
        });
    }

    match run_git(repo_root, &["branch", "-D", name]) {
        Ok(branch_output) if branch_output.success => {
            debug!(event = "core.git.worktree.branch_deleted", name = name);
        }
        Ok(branch_output) => {
            debug!(
                event = "core.git.worktree.branch_delete_skipped",
                name = name,
                stderr = %branch_output.diagnostic()
            );
        }
        Err(e) => {
            debug!(
                event = "core.git.worktree.branch_delete_skipped",
                name = name,
                error = %e
            );
        }
    }

    info!(event = "core.git.worktree.remove_completed", name = name);
    Ok(())
}

/// Parse the repository's worktree table.
///
/// HEAD commit subjects are filled best-effort via git2; a failure to open
/// or resolve leaves them `None`.
pub fn list_worktrees(repo_root: &Path) -> Result<Vec<Worktree>, GitError> {
    let output = run_git(repo_root, &["worktree", "list", "--porcelain"])?;
    if !output.success {
        return Err(GitError::OperationFailed {
            message: output.diagnostic().to_string(),
        });
    }

    let mut worktrees = parse_worktree_list(&output.stdout);

    match git2::Repository::open(repo_root) {
        Ok(repo) => {
            for worktree in &mut worktrees {
                if let Some(head) = &worktree.head {
                    worktree.commit_subject = commit_subject(&repo, head);
                }
            }
        }
        Err(e) => {
            debug!(
                event = "core.git.worktree.subject_lookup_skipped",
                path = %repo_root.display(),
                error = %e
            );
        }
    }

    Ok(worktrees)
}

fn commit_subject(repo: &git2::Repository, head: &str) -> Option<String> {
    let oid = git2::Oid::from_str(head).ok()?;
    let commit = repo.find_commit(oid).ok()?;
    commit.summary().map(|s| s.to_string())
}

/// All local and remote branch short names, excluding the synthetic
/// remote-HEAD pointer.
pub fn list_branches(repo_root: &Path) -> Result<Vec<String>, GitError> {
    let output = run_git(repo_root, &["branch", "-a", "--format=%(refname:short)"])?;
    if !output.success {
        return Err(GitError::OperationFailed {
            message: output.diagnostic().to_string(),
        });
    }

    Ok(output
        .stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.ends_with("/HEAD"))
        .map(str::to_string)
        .collect())
}

/// Pull `{upstream}/main` into the `__main__` worktree.
///
/// A non-zero exit whose output reports "already up to date" is normalized
/// to success (see [`is_already_up_to_date`]); any other failure carries
/// the tool diagnostic.
pub fn update_main(repo_root: &Path, upstream: &str) -> Result<(), GitError> {
    validate_git_arg(upstream, "remote name")?;

    let main_path = repo_root.join(MAIN_WORKTREE);

    info!(
        event = "core.git.update_main_started",
        remote = upstream,
        path = %main_path.display()
    );

    let output = run_git(&main_path, &["pull", upstream, "main"])?;

    if output.success {
        info!(event = "core.git.update_main_completed", remote = upstream);
        return Ok(());
    }

    if is_already_up_to_date(&output.combined()) {
        info!(
            event = "core.git.update_main_already_up_to_date",
            remote = upstream,
            code = output.code
        );
        return Ok(());
    }

    warn!(
        event = "core.git.update_main_failed",
        remote = upstream,
        code = output.code,
        stderr = %output.diagnostic()
    );
    Err(GitError::PullFailed {
        remote: upstream.to_string(),
        message: output.diagnostic().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::Config;
    use crate::git::clone::clone_repository;
    use crate::progress::Reporter;
    use std::fs;
    use std::process::Command;
    use tempfile::TempDir;

    fn git(dir: &Path, args: &[&str]) {
        let output = Command::new("git")
            .current_dir(dir)
            .args(args)
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    fn configure_git_user(dir: &Path) {
        git(dir, &["config", "user.email", "test@test.com"]);
        git(dir, &["config", "user.name", "Test"]);
    }

    /// Create a work repo on `branch`, commit a README, and publish it as a
    /// bare origin. Returns (work, origin) paths.
    fn make_origin(tmp: &Path, branch: &str) -> (PathBuf, PathBuf) {
        let work = tmp.join("work");
        fs::create_dir_all(&work).unwrap();
        git(&work, &["init", "-b", branch]);
        configure_git_user(&work);
        fs::write(work.join("README.md"), "# widgets\n").unwrap();
        git(&work, &["add", "."]);
        git(&work, &["commit", "-m", "initial"]);

        git(tmp, &["init", "--bare", "origin.git"]);
        let origin = tmp.join("origin.git");
        git(&work, &["remote", "add", "origin", origin.to_str().unwrap()]);
        git(&work, &["push", "-u", "origin", branch]);
        (work, origin)
    }

    /// Clone the origin into the `.bare` layout and populate
    /// `refs/remotes/origin/*` via an initial pull.
    fn clone_fixture(tmp: &Path, origin: &Path) -> PathBuf {
        let config = Config {
            bare_dir: tmp.join(".bare-data"),
            workspace_root: tmp.join("workspace"),
            log_level: "info".to_string(),
        };
        let root = clone_repository(
            &config,
            origin.to_str().unwrap(),
            "widgets",
            &mut Reporter::discard(),
        )
        .unwrap();
        configure_git_user(&root.join(MAIN_WORKTREE));
        update_main(&root, "origin").unwrap();
        root
    }

    #[test]
    fn test_add_worktree_creates_tracking_branch() {
        let tmp = TempDir::new().unwrap();
        let (_work, origin) = make_origin(tmp.path(), "main");
        let root = clone_fixture(tmp.path(), &origin);

        let path = add_worktree(&root, "feat-x", None, "origin").unwrap();
        assert_eq!(path, root.join("feat-x"));
        assert!(path.join("README.md").exists());

        // New branch tracks origin/main
        let output = Command::new("git")
            .current_dir(&path)
            .args(["rev-parse", "--abbrev-ref", "feat-x@{upstream}"])
            .output()
            .unwrap();
        assert_eq!(
            String::from_utf8_lossy(&output.stdout).trim(),
            "origin/main"
        );
    }

    #[test]
    fn test_add_worktree_rejects_existing_path() {
        let tmp = TempDir::new().unwrap();
        let (_work, origin) = make_origin(tmp.path(), "main");
        let root = clone_fixture(tmp.path(), &origin);

        add_worktree(&root, "feat-x", None, "origin").unwrap();
        let result = add_worktree(&root, "feat-x", None, "origin");
        assert!(matches!(result, Err(GitError::WorktreeExists { .. })));
    }

    #[test]
    fn test_add_worktree_remove_then_add_again() {
        let tmp = TempDir::new().unwrap();
        let (_work, origin) = make_origin(tmp.path(), "main");
        let root = clone_fixture(tmp.path(), &origin);

        add_worktree(&root, "feat-x", None, "origin").unwrap();
        remove_worktree(&root, "feat-x").unwrap();
        let path = add_worktree(&root, "feat-x", None, "origin").unwrap();
        assert!(path.join("README.md").exists());
    }

    #[test]
    fn test_add_worktree_reuses_lingering_branch() {
        let tmp = TempDir::new().unwrap();
        let (_work, origin) = make_origin(tmp.path(), "main");
        let root = clone_fixture(tmp.path(), &origin);

        // A branch that outlived its worktree
        git(&root, &["branch", "stale", "origin/main"]);

        let path = add_worktree(&root, "stale", None, "origin").unwrap();
        assert!(path.join("README.md").exists());
    }

    #[test]
    fn test_add_worktree_explicit_branch() {
        let tmp = TempDir::new().unwrap();
        let (_work, origin) = make_origin(tmp.path(), "main");
        let root = clone_fixture(tmp.path(), &origin);

        git(&root, &["branch", "release", "main"]);
        let path = add_worktree(&root, "rel", Some("release"), "origin").unwrap();
        assert!(path.join("README.md").exists());

        let worktrees = list_worktrees(&root).unwrap();
        let rel = worktrees
            .iter()
            .find(|w| w.path.ends_with("rel"))
            .expect("rel worktree listed");
        assert_eq!(rel.branch.as_deref(), Some("refs/heads/release"));
    }

    #[test]
    fn test_add_worktree_explicit_missing_branch_surfaces_diagnostic() {
        let tmp = TempDir::new().unwrap();
        let (_work, origin) = make_origin(tmp.path(), "main");
        let root = clone_fixture(tmp.path(), &origin);

        let result = add_worktree(&root, "ghost", Some("no-such-branch"), "origin");
        match result {
            Err(GitError::WorktreeOpFailed { message }) => {
                assert!(!message.is_empty());
            }
            other => panic!("expected WorktreeOpFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_remove_worktree_not_found() {
        let tmp = TempDir::new().unwrap();
        let (_work, origin) = make_origin(tmp.path(), "main");
        let root = clone_fixture(tmp.path(), &origin);

        let result = remove_worktree(&root, "never-created");
        assert!(matches!(result, Err(GitError::WorktreeNotFound { .. })));
    }

    #[test]
    fn test_remove_worktree_swallows_branch_delete_failure() {
        let tmp = TempDir::new().unwrap();
        let (_work, origin) = make_origin(tmp.path(), "main");
        let root = clone_fixture(tmp.path(), &origin);

        // Worktree name "rel" has no same-named branch; branch -D fails
        git(&root, &["branch", "release", "main"]);
        add_worktree(&root, "rel", Some("release"), "origin").unwrap();

        remove_worktree(&root, "rel").unwrap();
        assert!(!root.join("rel").exists());
    }

    #[test]
    fn test_list_worktrees_reports_bare_and_main() {
        let tmp = TempDir::new().unwrap();
        let (_work, origin) = make_origin(tmp.path(), "main");
        let root = clone_fixture(tmp.path(), &origin);

        let worktrees = list_worktrees(&root).unwrap();
        let bare = worktrees.iter().find(|w| w.bare).expect("bare entry");
        assert!(bare.path.ends_with(".bare"));

        let main = worktrees
            .iter()
            .find(|w| w.path.ends_with(MAIN_WORKTREE))
            .expect("__main__ entry");
        assert!(!main.bare);
        assert_eq!(main.branch.as_deref(), Some("refs/heads/main"));
        assert_eq!(main.commit_subject.as_deref(), Some("initial"));
    }

    #[test]
    fn test_list_branches_excludes_remote_head() {
        let tmp = TempDir::new().unwrap();
        let (_work, origin) = make_origin(tmp.path(), "main");
        let root = clone_fixture(tmp.path(), &origin);

        git(&root, &["remote", "set-head", "origin", "main"]);

        let branches = list_branches(&root).unwrap();
        assert!(branches.iter().any(|b| b == "main"));
        assert!(branches.iter().any(|b| b == "origin/main"));
        assert!(!branches.iter().any(|b| b.ends_with("/HEAD")));
    }

    #[test]
    fn test_update_main_noop_pull_succeeds() {
        let tmp = TempDir::new().unwrap();
        let (_work, origin) = make_origin(tmp.path(), "main");
        let root = clone_fixture(tmp.path(), &origin);

        // Nothing new upstream; must not raise
        update_main(&root, "origin").unwrap();
    }

    #[test]
    fn test_update_main_pulls_new_commits() {
        let tmp = TempDir::new().unwrap();
        let (work, origin) = make_origin(tmp.path(), "main");
        let root = clone_fixture(tmp.path(), &origin);

        fs::write(work.join("CHANGELOG.md"), "v2\n").unwrap();
        git(&work, &["add", "."]);
        git(&work, &["commit", "-m", "add changelog"]);
        git(&work, &["push", "origin", "main"]);

        update_main(&root, "origin").unwrap();
        assert!(root.join(MAIN_WORKTREE).join("CHANGELOG.md").exists());
    }

    #[test]
    fn test_update_main_missing_remote_branch_fails() {
        let tmp = TempDir::new().unwrap();
        // master-only origin: clone falls back to master for __main__,
        // but update_main still pulls 'main' and must surface the failure
        let (_work, origin) = make_origin(tmp.path(), "master");
        let config = Config {
            bare_dir: tmp.path().join(".bare-data"),
            workspace_root: tmp.path().join("workspace"),
            log_level: "info".to_string(),
        };
        let root = clone_repository(
            &config,
            origin.to_str().unwrap(),
            "widgets",
            &mut Reporter::discard(),
        )
        .unwrap();
        assert!(root.join(MAIN_WORKTREE).join("README.md").exists());

        let result = update_main(&root, "origin");
        assert!(matches!(result, Err(GitError::PullFailed { .. })));
    }
}
