//! Application layer for party-consensus
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod error;
pub mod ports;
pub mod response;
pub mod service;
pub mod use_cases;

// Re-export commonly used types
pub use config::{AiVoterConfig, DelayRange};
pub use error::ConsensusError;
pub use ports::{
    collaborators::{
        CharacterDataProvider, CollaboratorError, LocationService, RosterProvider, TimeService,
    },
    decision_logger::{DecisionEvent, DecisionLogger, NoDecisionLogger},
    progress::{NoProgress, VotingProgressNotifier},
    proposal_store::{ProposalStore, StatusTransition, StoreError, TransitionResult},
    settings_store::SettingsStore,
};
pub use response::{ApiError, ApiResponse};
pub use service::{ConsensusPorts, MovementConsensusService, MovementConsensusServiceBuilder};
pub use use_cases::ai_voter_scheduler::AiVoterScheduler;
pub use use_cases::cast_vote::CastVoteInput;
pub use use_cases::execute_movement::ExecuteMovementInput;
