//! Infrastructure layer for party-consensus
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod simulation;
pub mod storage;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileAiVotersConfig, FileConfig, FileDefaultsConfig, FileLoggingConfig,
    FileMemberConfig, FileSimulationConfig, FileStorageConfig, StorageBackend,
};
pub use logging::JsonlDecisionLogger;
pub use simulation::{DayPeriodClock, SimulatedLocationService, StaticRoster};
pub use storage::{ConsensusTables, InMemoryConsensusStore, JsonFileConsensusStore};
