//! Proposal store port
//!
//! Durable record of movement proposals and their votes. The store is the
//! only owner of proposal and vote rows; everything else reads through it.

use async_trait::async_trait;
use consensus_domain::{MovementProposal, ProposalId, ProposalStatus, SessionId, Vote};
use thiserror::Error;

/// Errors that can occur in a store adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Session already has an active proposal: {proposal_id}")]
    ActiveProposalExists { proposal_id: ProposalId },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// A compare-and-set status change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    /// Status the caller observed; the write is refused if it changed
    pub expected: ProposalStatus,
    pub next: ProposalStatus,
    /// Stored as the cancellation reason when present
    pub note: Option<String>,
}

impl StatusTransition {
    pub fn new(expected: ProposalStatus, next: ProposalStatus) -> Self {
        Self {
            expected,
            next,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Result of a compare-and-set status write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionResult {
    Applied,
    /// The stored status differed from `expected`; nothing was written
    Conflict(ProposalStatus),
}

/// Store for proposals and votes
///
/// Implementations live in the infrastructure layer.
#[async_trait]
pub trait ProposalStore: Send + Sync {
    /// Insert a proposal together with the proposer's vote
    ///
    /// Must fail with [`StoreError::ActiveProposalExists`] when the session
    /// already holds a pending or voting proposal. The check and the insert
    /// are atomic.
    async fn create_proposal(
        &self,
        proposal: MovementProposal,
        proposer_vote: Vote,
    ) -> Result<(), StoreError>;

    /// The session's pending or voting proposal, if any
    async fn get_active_proposal(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<MovementProposal>, StoreError>;

    async fn get_proposal(&self, id: &ProposalId) -> Result<Option<MovementProposal>, StoreError>;

    /// Insert or replace the vote of `(proposal_id, voter_id)`
    async fn upsert_vote(&self, vote: Vote) -> Result<(), StoreError>;

    /// Effective votes of a proposal in write order
    async fn list_votes(&self, proposal_id: &ProposalId) -> Result<Vec<Vote>, StoreError>;

    /// Unconditional status write
    async fn set_status(&self, id: &ProposalId, status: ProposalStatus) -> Result<(), StoreError>;

    /// Conditional status write keyed on the expected current status
    async fn transition_status(
        &self,
        id: &ProposalId,
        transition: &StatusTransition,
    ) -> Result<TransitionResult, StoreError>;
}
