//! Domain layer for party-consensus
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Movement Proposal
//!
//! A party member proposes to move the whole party to a new location. The
//! proposal is voted on by every player character; NPC companions follow
//! the party without a vote.
//!
//! ## Quorum
//!
//! - **Majority** (default): `ceil(n / 2)` approvals
//! - **Unanimous**: all `n` eligible voters approve
//!
//! The decision policy resolves a proposal as soon as its outcome is
//! certain (early approval, outright rejection, or unreachable approval).

pub mod ai;
pub mod config;
pub mod core;
pub mod movement;
pub mod party;
pub mod proposal;
pub mod quorum;
pub mod settings;

// Re-export commonly used types
pub use ai::{
    AiDecision, AiVoteContext, AiVotePolicy, UrgencyBiasedPolicy, clamp_probability,
};
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use core::{
    error::DomainError,
    ids::{CampaignId, CharacterId, LocationId, ProposalId, SessionId, VoteId},
};
pub use movement::{MemberMoveResult, MoveRequest, MoveTally, MovementOutcome, TimeAdvance};
pub use party::{CharacterProfile, CharacterType, PartyMember, VoterType};
pub use proposal::{
    Difficulty, EstimatedCost, MAX_ACTION_POINTS, MovementEstimate, MovementMethod,
    MovementProposal, ProposalDraft, ProposalStatus, Urgency, Vote, VoteChoice,
};
pub use settings::{ConsensusSettings, ConsensusSettingsPatch};

// Re-export quorum types
pub use quorum::{
    ConsensusOutcome, ConsensusType, RejectionReason, VoteCounts, VoterDetail, VotingSummary,
    VotingSystem, summarize,
};
