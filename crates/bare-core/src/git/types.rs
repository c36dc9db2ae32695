use std::path::PathBuf;

use serde::Serialize;

/// Name of the canonical worktree checked out at clone time. It is the
/// source of truth for propagated files and the target of sync operations,
/// and is never removed through this subsystem.
pub const MAIN_WORKTREE: &str = "__main__";

/// Hidden directory holding the bare object store at the repository root.
pub const BARE_DIR: &str = ".bare";

/// Exact contents of the gitlink file written at the repository root.
pub const GITLINK_CONTENTS: &str = "gitdir: ./.bare\n";

/// One entry of the repository's worktree table.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Worktree {
    /// Absolute path of the working directory (or of the bare store for
    /// the `bare` entry).
    pub path: PathBuf,
    /// HEAD commit hash.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
    /// Full branch ref (e.g. `refs/heads/feat-a`); absent when detached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    pub bare: bool,
    pub detached: bool,
    /// Subject line of the HEAD commit, filled best-effort.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_subject: Option<String>,
}

/// Parse the output of `git worktree list --porcelain`.
///
/// Entries are blank-line separated attribute blocks; unknown attributes
/// are ignored so newer git versions don't break the parse.
pub fn parse_worktree_list(porcelain: &str) -> Vec<Worktree> {
    let mut worktrees = Vec::new();

    for block in porcelain.split("\n\n") {
        let mut worktree = Worktree::default();
        let mut has_path = false;

        for line in block.lines() {
            if let Some(path) = line.strip_prefix("worktree ") {
                worktree.path = PathBuf::from(path);
                has_path = true;
            } else if let Some(head) = line.strip_prefix("HEAD ") {
                worktree.head = Some(head.to_string());
            } else if let Some(branch) = line.strip_prefix("branch ") {
                worktree.branch = Some(branch.to_string());
            } else if line == "bare" {
                worktree.bare = true;
            } else if line == "detached" {
                worktree.detached = true;
            }
        }

        if has_path {
            worktrees.push(worktree);
        }
    }

    worktrees
}
