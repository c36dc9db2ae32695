pub mod cli;
pub mod clone;
pub mod errors;
pub mod types;
pub mod worktree;

// Re-export commonly used types and functions
pub use cli::{is_already_up_to_date, validate_git_arg};
pub use clone::{clone_repository, derive_owner_from_url, remote_url, repository_root};
pub use errors::GitError;
pub use types::{BARE_DIR, GITLINK_CONTENTS, MAIN_WORKTREE, Worktree};
pub use worktree::{add_worktree, list_branches, list_worktrees, remove_worktree, update_main};
