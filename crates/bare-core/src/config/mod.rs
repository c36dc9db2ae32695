pub mod defaults;
pub mod loading;
pub mod store;
pub mod types;

// Re-export commonly used types and functions
pub use defaults::DEFAULT_UPSTREAM_REMOTE;
pub use loading::{load_hierarchy, merge_configs};
pub use store::{JsonConfigStore, MemoryConfigStore, WorktreeConfigStore};
pub use types::{BareConfig, Config, GitSettings, InstallSettings, WorktreeConfig};
