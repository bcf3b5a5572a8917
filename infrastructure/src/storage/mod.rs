//! Proposal, vote and settings persistence
//!
//! Both adapters share [`ConsensusTables`]; they differ only in whether
//! the rows outlive the process.

mod json_file;
mod memory;
mod records;
mod tables;

pub use json_file::JsonFileConsensusStore;
pub use memory::InMemoryConsensusStore;
pub use records::{ProposalRow, SettingsRow, VoteRow};
pub use tables::ConsensusTables;
