use crate::errors::BareError;

#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("Repository already exists at {path}")]
    RepositoryExists { path: String },

    #[error("Branch '{branch}' not found")]
    BranchNotFound { branch: String },

    #[error("Worktree already exists at path: {path}")]
    WorktreeExists { path: String },

    #[error("Worktree '{name}' not found")]
    WorktreeNotFound { name: String },

    #[error("Clone failed: {message}")]
    CloneFailed { message: String },

    #[error("Pull from '{remote}' failed: {message}")]
    PullFailed { remote: String, message: String },

    #[error("Worktree operation failed: {message}")]
    WorktreeOpFailed { message: String },

    #[error("Git operation failed: {message}")]
    OperationFailed { message: String },

    #[error("Git2 library error: {source}")]
    Git2Error {
        #[from]
        source: git2::Error,
    },

    #[error("IO error during git operation: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl BareError for GitError {
    fn error_code(&self) -> &'static str {
        match self {
            GitError::RepositoryExists { .. } => "REPOSITORY_EXISTS",
            GitError::BranchNotFound { .. } => "BRANCH_NOT_FOUND",
            GitError::WorktreeExists { .. } => "WORKTREE_EXISTS",
            GitError::WorktreeNotFound { .. } => "WORKTREE_NOT_FOUND",
            GitError::CloneFailed { .. } => "CLONE_FAILED",
            GitError::PullFailed { .. } => "PULL_FAILED",
            GitError::WorktreeOpFailed { .. } => "WORKTREE_OP_FAILED",
            GitError::OperationFailed { .. } => "GIT_OPERATION_FAILED",
            GitError::Git2Error { .. } => "GIT2_ERROR",
            GitError::IoError { .. } => "GIT_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            GitError::RepositoryExists { .. }
                | GitError::BranchNotFound { .. }
                | GitError::WorktreeExists { .. }
                | GitError::WorktreeNotFound { .. }
        )
    }
}
