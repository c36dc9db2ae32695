//! bare-core: Core library for multi-repository worktree management
//!
//! One bare clone, many independently usable worktrees. The library
//! sequences multi-step, multi-tool operations (clone, branch creation,
//! file propagation, dependency installation), tolerates known-benign
//! failure codes from the underlying tools, and streams incremental
//! progress to the caller. It is used by the CLI and by any transport
//! that forwards progress to a UI.
//!
//! # Main Entry Points
//!
//! - [`pipeline`] - Clone repositories, add/remove worktrees, sync `__main__`
//! - [`git`] - Worktree and branch primitives
//! - [`files`] - File propagation between worktrees
//! - [`progress`] - Progress event contract
//! - [`config`] - Configuration management

pub mod config;
pub mod detect;
pub mod errors;
pub mod events;
pub mod files;
pub mod git;
pub mod install;
pub mod logging;
pub mod pipeline;
pub mod progress;
pub mod registry;

// Re-export commonly used types at crate root for convenience
pub use config::{
    BareConfig, Config, JsonConfigStore, MemoryConfigStore, WorktreeConfig, WorktreeConfigStore,
};
pub use errors::{BareError, BareResult};
pub use files::PropagationSummary;
pub use git::{GitError, MAIN_WORKTREE, Worktree};
pub use install::{CommandInstaller, InstallError, Installer, PackageManager};
pub use pipeline::{Pipeline, PipelineError};
pub use progress::{
    ChannelSink, NullSink, PipelineStage, ProgressEvent, ProgressSink, Reporter, TextSink,
};
pub use registry::{MemoryRepositoryStore, RepoKind, Repository, RepositoryStore};

// Re-export logging initialization
pub use logging::init_logging;
