//! Cancel Proposal use case
//!
//! Withdraws a proposal that has not started moving the party. The proposal
//! is closed as `rejected` with the cancellation reason attached, and its
//! pending AI votes are aborted.

use crate::error::ConsensusError;
use crate::ports::proposal_store::StatusTransition;
use crate::use_cases::ai_voter_scheduler::AiVoterScheduler;
use crate::use_cases::shared::VotingCore;
use consensus_domain::{ProposalId, ProposalStatus};
use std::sync::Arc;
use tracing::info;

const DEFAULT_CANCEL_REASON: &str = "Cancelled";

pub struct CancelProposalUseCase {
    core: Arc<VotingCore>,
    scheduler: Arc<AiVoterScheduler>,
}

impl CancelProposalUseCase {
    pub(crate) fn new(core: Arc<VotingCore>, scheduler: Arc<AiVoterScheduler>) -> Self {
        Self { core, scheduler }
    }

    pub async fn execute(
        &self,
        proposal_id: &ProposalId,
        reason: Option<String>,
    ) -> Result<(), ConsensusError> {
        let guard = self.core.locks.acquire(proposal_id).await;
        let proposal = self.core.load_proposal(proposal_id).await?;

        let status = proposal.status;
        if !matches!(
            status,
            ProposalStatus::Pending | ProposalStatus::Voting | ProposalStatus::Approved
        ) {
            return Err(ConsensusError::AlreadyResolved {
                proposal_id: proposal.id,
                status,
            });
        }

        let reason = reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CANCEL_REASON.to_string());
        self.core
            .transition(
                proposal_id,
                StatusTransition::new(status, ProposalStatus::Rejected).with_note(reason.clone()),
            )
            .await?;
        drop(guard);
        self.core.locks.prune(proposal_id);

        self.scheduler.cancel(proposal_id);
        info!("Proposal {} cancelled: {}", proposal_id, reason);
        Ok(())
    }
}
