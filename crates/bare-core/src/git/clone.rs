//! Repository cloning.
//!
//! A cloned repository lands at `{workspace_root}/{owner}/{name}` as a bare
//! object store in `.bare`, a gitlink file redirecting tooling at it, and a
//! canonical `__main__` worktree. Clone output is streamed line by line
//! into the caller's progress reporter.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, error, info};

use crate::config::types::Config;
use crate::git::cli::{run_git, validate_git_arg};
use crate::git::errors::GitError;
use crate::git::types::{BARE_DIR, GITLINK_CONTENTS, MAIN_WORKTREE};
use crate::progress::Reporter;

/// Derive the owner segment from a remote URL.
///
/// Understands SSH `git@host:owner/repo` and HTTPS-style
/// `scheme://host/owner/repo` forms; anything else falls back to the
/// current OS user so local-path clones still land somewhere sensible.
pub fn derive_owner_from_url(url: &str) -> String {
    // scheme://host/owner/repo
    if let Some((_, rest)) = url.split_once("://") {
        let mut segments = rest.split('/');
        let _host = segments.next();
        if let (Some(owner), Some(_repo)) = (segments.next(), segments.next())
            && !owner.is_empty()
        {
            return owner.to_string();
        }
    } else if let Some((_, rest)) = url.split_once('@') {
        // user@host:owner/repo
        if let Some((_, path)) = rest.split_once(':')
            && let Some((owner, _repo)) = path.split_once('/')
            && !owner.is_empty()
        {
            return owner.to_string();
        }
    }

    std::env::var("USER").unwrap_or_else(|_| "user".to_string())
}

/// Validate a clone target directory name: a single path segment.
fn validate_target_dir(name: &str) -> Result<(), GitError> {
    validate_git_arg(name, "target directory")?;
    if name.is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\\') {
        return Err(GitError::OperationFailed {
            message: format!("Invalid target directory: '{}'", name),
        });
    }
    Ok(())
}

/// The repository root a clone of `url` as `target_dir` would produce.
pub fn repository_root(config: &Config, url: &str, target_dir: &str) -> PathBuf {
    config
        .workspace_root
        .join(derive_owner_from_url(url))
        .join(target_dir)
}

/// Bare-clone `url` and establish the canonical worktree.
///
/// Steps, each reported as progress and fatal on failure:
/// 1. create the target directory
/// 2. `git clone --bare <url> .bare` (output streamed as progress lines)
/// 3. write the `.git` gitlink redirecting resolution at `.bare`
/// 4. widen the origin fetch refspec (bare clones otherwise fetch a
///    restricted ref set)
/// 5. create the `__main__` worktree on `main`, falling back to `master`
///
/// Returns the absolute repository root.
///
/// # Errors
///
/// `GitError::RepositoryExists` if the target already contains a `.bare`
/// store; `GitError::CloneFailed` / `GitError::WorktreeOpFailed` with the
/// tool diagnostic on subprocess failure.
pub fn clone_repository(
    config: &Config,
    url: &str,
    target_dir: &str,
    reporter: &mut Reporter,
) -> Result<PathBuf, GitError> {
    validate_target_dir(target_dir)?;
    validate_git_arg(url, "remote url")?;

    let root = repository_root(config, url, target_dir);

    info!(
        event = "core.git.clone_started",
        url = url,
        path = %root.display()
    );

    if root.join(BARE_DIR).exists() {
        return Err(GitError::RepositoryExists {
            path: root.display().to_string(),
        });
    }

    std::fs::create_dir_all(&root)?;

    run_clone_streaming(&root, url, reporter)?;

    std::fs::write(root.join(".git"), GITLINK_CONTENTS)?;
    reporter.line("Created .git file");

    let refspec = run_git(
        &root,
        &[
            "config",
            "remote.origin.fetch",
            "+refs/heads/*:refs/remotes/origin/*",
        ],
    )?;
    if !refspec.success {
        return Err(GitError::OperationFailed {
            message: refspec.diagnostic().to_string(),
        });
    }
    reporter.line("Configured remote fetch");

    create_main_worktree(&root, reporter)?;

    info!(
        event = "core.git.clone_completed",
        url = url,
        path = %root.display()
    );

    Ok(root)
}

/// Run `git clone --bare`, streaming its output lines into the reporter.
///
/// git writes clone chatter to stderr; the collected text doubles as the
/// failure diagnostic.
fn run_clone_streaming(root: &Path, url: &str, reporter: &mut Reporter) -> Result<(), GitError> {
    let mut child = Command::new("git")
        .current_dir(root)
        .args(["clone", "--bare", url, BARE_DIR])
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| GitError::CloneFailed {
            message: format!("Failed to execute git: {}", e),
        })?;

    let mut collected = String::new();
    if let Some(stderr) = child.stderr.take() {
        for line in std::io::BufReader::new(stderr).lines() {
            let line = line?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                reporter.line(trimmed);
                collected.push_str(trimmed);
                collected.push('\n');
            }
        }
    }

    let status = child.wait()?;
    if !status.success() {
        error!(
            event = "core.git.clone_failed",
            url = url,
            code = status.code().unwrap_or(-1),
            stderr = %collected.trim()
        );
        return Err(GitError::CloneFailed {
            message: collected.trim().to_string(),
        });
    }

    Ok(())
}

/// Create the `__main__` worktree on `main`, falling back to `master`.
///
/// The fallback's diagnostic wins when both are missing: it names the
/// branch the repository actually lacks.
fn create_main_worktree(root: &Path, reporter: &mut Reporter) -> Result<(), GitError> {
    let main = run_git(root, &["worktree", "add", MAIN_WORKTREE, "main"])?;
    if main.success {
        reporter.line("Created __main__ worktree");
        return Ok(());
    }

    debug!(
        event = "core.git.main_branch_missing",
        path = %root.display(),
        stderr = %main.diagnostic(),
        "No 'main' branch, trying 'master'"
    );

    let master = run_git(root, &["worktree", "add", MAIN_WORKTREE, "master"])?;
    if master.success {
        reporter.line("Created __main__ worktree (master)");
        return Ok(());
    }

    error!(
        event = "core.git.main_worktree_failed",
        path = %root.display(),
        stderr = %master.diagnostic()
    );
    Err(GitError::WorktreeOpFailed {
        message: master.diagnostic().to_string(),
    })
}

/// Read the origin remote URL, best-effort.
pub fn remote_url(repo_root: &Path) -> Option<String> {
    let output = run_git(repo_root, &["remote", "get-url", "origin"]).ok()?;
    if output.success {
        let url = output.stdout.trim();
        if !url.is_empty() {
            return Some(url.to_string());
        }
    }
    None
}
