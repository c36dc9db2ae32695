use crate::errors::BareError;

/// Pipeline failures are mostly pass-throughs: the terminal progress
/// marker must carry the underlying diagnostic verbatim, so the wrapped
/// errors stay transparent.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("The '__main__' worktree is protected and cannot be removed")]
    MainWorktreeProtected,

    #[error(transparent)]
    Git {
        #[from]
        source: crate::git::errors::GitError,
    },

    #[error(transparent)]
    File {
        #[from]
        source: crate::files::errors::FileError,
    },

    #[error(transparent)]
    Install {
        #[from]
        source: crate::install::errors::InstallError,
    },
}

impl BareError for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            PipelineError::MainWorktreeProtected => "MAIN_WORKTREE_PROTECTED",
            PipelineError::Git { source } => source.error_code(),
            PipelineError::File { source } => source.error_code(),
            PipelineError::Install { source } => source.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            PipelineError::MainWorktreeProtected => true,
            PipelineError::Git { source } => source.is_user_error(),
            PipelineError::File { source } => source.is_user_error(),
            PipelineError::Install { source } => source.is_user_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::errors::GitError;

    #[test]
    fn test_main_worktree_protected() {
        let error = PipelineError::MainWorktreeProtected;
        assert_eq!(
            error.to_string(),
            "The '__main__' worktree is protected and cannot be removed"
        );
        assert_eq!(error.error_code(), "MAIN_WORKTREE_PROTECTED");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_wrapped_errors_stay_transparent() {
        let error: PipelineError = GitError::PullFailed {
            remote: "origin".to_string(),
            message: "fatal: couldn't find remote ref main".to_string(),
        }
        .into();

        // Display and code come straight from the wrapped error
        assert_eq!(
            error.to_string(),
            "Pull from 'origin' failed: fatal: couldn't find remote ref main"
        );
        assert_eq!(error.error_code(), "PULL_FAILED");
    }
}
