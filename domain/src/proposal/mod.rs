//! Movement proposals and the votes cast on them

pub mod entities;
pub mod estimate;
pub mod vote;

pub use entities::{
    Difficulty, EstimatedCost, MovementMethod, MovementProposal, ProposalDraft, ProposalStatus,
    Urgency,
};
pub use estimate::{MAX_ACTION_POINTS, MovementEstimate};
pub use vote::{Vote, VoteChoice};
