//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod collaborators;
pub mod decision_logger;
pub mod progress;
pub mod proposal_store;
pub mod settings_store;
