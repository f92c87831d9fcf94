//! Configuration for legwork tasks

mod settings;

// Re-export main types
pub use settings::{
    Config, DocsConfig, ManageConfig, SetupConfig, SphinxConfig, SyncdbConfig, TestConfig,
};
