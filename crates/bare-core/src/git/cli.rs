//! Git CLI plumbing.
//!
//! All repository mutations go through the git CLI rather than libgit2: the
//! CLI inherits the user's SSH agent and credential helpers automatically,
//! which clone/fetch/pull need. git2 is reserved for local read-only
//! queries. Each wrapper validates arguments, logs structured events, and
//! maps errors consistently.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use super::errors::GitError;

/// Captured result of one git invocation.
#[derive(Debug)]
pub(crate) struct GitOutput {
    pub stdout: String,
    pub stderr: String,
    pub code: i32,
    pub success: bool,
}

impl GitOutput {
    /// Diagnostic text for error reporting: stderr if present, stdout
    /// otherwise (git splits messages between the two inconsistently).
    pub fn diagnostic(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }

    /// stdout and stderr concatenated, for predicates that must see both.
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// Run git with the given arguments in `dir`, capturing output.
///
/// A non-zero exit is not an error at this layer; callers decide how to
/// interpret it. Only failure to execute git at all is.
pub(crate) fn run_git(dir: &Path, args: &[&str]) -> Result<GitOutput, GitError> {
    debug!(
        event = "core.git.cli_invoked",
        args = %args.join(" "),
        path = %dir.display()
    );

    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .map_err(|e| GitError::OperationFailed {
            message: format!("Failed to execute git in {}: {}", dir.display(), e),
        })?;

    Ok(GitOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        code: output.status.code().unwrap_or(-1),
        success: output.status.success(),
    })
}

/// Validate a git argument to prevent injection.
///
/// Rejects values that start with `-` (option injection), contain control
/// characters, or contain `::` sequences (refspec injection).
pub fn validate_git_arg(value: &str, label: &str) -> Result<(), GitError> {
    if value.starts_with('-') {
        return Err(GitError::OperationFailed {
            message: format!("Invalid {label}: '{value}' (must not start with '-')"),
        });
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(GitError::OperationFailed {
            message: format!("Invalid {label}: contains control characters"),
        });
    }
    if value.contains("::") {
        return Err(GitError::OperationFailed {
            message: format!("Invalid {label}: '::' sequences are not allowed"),
        });
    }
    Ok(())
}

/// Check if a pull's output indicates there was simply nothing to pull.
///
/// Some git versions report "already up to date" through a non-zero exit,
/// so the pipeline normalizes that outcome to success. This is a substring
/// match against git's own wording; localized or future git output can
/// silently stop matching, which is why the predicate is isolated here and
/// tested on its own.
pub fn is_already_up_to_date(output: &str) -> bool {
    let lower = output.to_lowercase();
    ["already up to date", "already up-to-date"]
        .iter()
        .any(|pattern| lower.contains(pattern))
}
