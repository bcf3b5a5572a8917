//! Configuration file loading for party-consensus
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PARTY_CONSENSUS_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./party-consensus.toml` or `./.party-consensus.toml`
//! 4. Global: `$XDG_CONFIG_HOME/party-consensus/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileAiVotersConfig, FileConfig, FileDefaultsConfig, FileLoggingConfig, FileMemberConfig,
    FileSimulationConfig, FileStorageConfig, StorageBackend,
};
pub use loader::ConfigLoader;
