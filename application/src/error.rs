//! Engine error taxonomy
//!
//! Every failure an exposed operation can report. The service facade turns
//! these into `{ success: false, error: { code, message } }` envelopes.

use crate::ports::collaborators::CollaboratorError;
use crate::ports::proposal_store::StoreError;
use consensus_domain::{CharacterId, DomainError, ProposalId, ProposalStatus, SessionId};
use thiserror::Error;

/// Errors surfaced by the consensus engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConsensusError {
    #[error("Session {session_id} already has an active proposal ({proposal_id})")]
    ActiveProposalExists {
        session_id: SessionId,
        proposal_id: ProposalId,
    },

    #[error("Proposal not found: {0}")]
    ProposalNotFound(ProposalId),

    #[error("Voting is closed for proposal {proposal_id} (status: {status})")]
    VotingClosed {
        proposal_id: ProposalId,
        status: ProposalStatus,
    },

    #[error("{voter_id} is not an eligible voter in this party")]
    NotEligible { voter_id: CharacterId },

    #[error("Abstention is not allowed in this session")]
    AbstentionNotAllowed,

    #[error("Proposal {proposal_id} is not approved (status: {status})")]
    NotApproved {
        proposal_id: ProposalId,
        status: ProposalStatus,
    },

    #[error("Movement failed: {succeeded}/{total} party members moved")]
    PartialMovementFailure {
        succeeded: usize,
        total: usize,
        failed_members: Vec<CharacterId>,
    },

    #[error("Proposal {proposal_id} is already resolved (status: {status})")]
    AlreadyResolved {
        proposal_id: ProposalId,
        status: ProposalStatus,
    },

    #[error("Status of {proposal_id} changed concurrently: expected {expected}, found {actual}")]
    StatusConflict {
        proposal_id: ProposalId,
        expected: ProposalStatus,
        actual: ProposalStatus,
    },

    /// Only produced inside the AI voter scheduler, which recovers from it
    /// by recording an abstention
    #[error("AI vote generation failed: {0}")]
    AiVoteGeneration(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ConsensusError {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            ConsensusError::ActiveProposalExists { .. } => "active_proposal_exists",
            ConsensusError::ProposalNotFound(_) => "proposal_not_found",
            ConsensusError::VotingClosed { .. } => "voting_closed",
            ConsensusError::NotEligible { .. } => "not_eligible",
            ConsensusError::AbstentionNotAllowed => "abstention_not_allowed",
            ConsensusError::NotApproved { .. } => "not_approved",
            ConsensusError::PartialMovementFailure { .. } => "partial_movement_failure",
            ConsensusError::AlreadyResolved { .. } => "already_resolved",
            ConsensusError::StatusConflict { .. } => "status_conflict",
            ConsensusError::AiVoteGeneration(_) => "ai_vote_generation_error",
            ConsensusError::Store(_) => "store_error",
            ConsensusError::Collaborator(_) => "collaborator_error",
            ConsensusError::Domain(_) => "domain_error",
        }
    }

    /// Map a store error raised while creating a proposal for `session_id`
    pub(crate) fn from_create(session_id: &SessionId, error: StoreError) -> Self {
        match error {
            StoreError::ActiveProposalExists { proposal_id } => {
                ConsensusError::ActiveProposalExists {
                    session_id: session_id.clone(),
                    proposal_id,
                }
            }
            other => ConsensusError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_failure_reports_ratio() {
        let error = ConsensusError::PartialMovementFailure {
            succeeded: 2,
            total: 3,
            failed_members: vec![CharacterId::new("pc-3")],
        };
        assert_eq!(error.to_string(), "Movement failed: 2/3 party members moved");
        assert_eq!(error.code(), "partial_movement_failure");
    }

    #[test]
    fn test_from_create_maps_conflict() {
        let error = ConsensusError::from_create(
            &SessionId::new("s-1"),
            StoreError::ActiveProposalExists {
                proposal_id: ProposalId::new("p-0"),
            },
        );
        assert_eq!(error.code(), "active_proposal_exists");

        let error = ConsensusError::from_create(
            &SessionId::new("s-1"),
            StoreError::Storage("disk full".to_string()),
        );
        assert_eq!(error.code(), "store_error");
    }

    #[test]
    fn test_voting_closed_display() {
        let error = ConsensusError::VotingClosed {
            proposal_id: ProposalId::new("p-1"),
            status: ProposalStatus::Approved,
        };
        assert_eq!(
            error.to_string(),
            "Voting is closed for proposal p-1 (status: approved)"
        );
    }
}
