//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod ai_voter_scheduler;
pub mod cancel_proposal;
pub mod cast_vote;
pub mod consensus_settings;
pub mod create_proposal;
pub mod execute_movement;
pub mod get_voting_summary;
pub(crate) mod shared;
#[cfg(test)]
pub(crate) mod test_support;
