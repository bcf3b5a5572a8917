//! Create Proposal use case
//!
//! Stores a new movement proposal together with the proposer's approval,
//! opens it for voting and hands the AI-controlled members to the
//! scheduler.

use crate::error::ConsensusError;
use crate::ports::decision_logger::DecisionEvent;
use crate::ports::proposal_store::StatusTransition;
use crate::use_cases::ai_voter_scheduler::AiVoterScheduler;
use crate::use_cases::shared::VotingCore;
use chrono::Utc;
use consensus_domain::{
    MovementProposal, ProposalDraft, ProposalId, ProposalStatus, Vote, VoteChoice,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub struct CreateProposalUseCase {
    core: Arc<VotingCore>,
    scheduler: Arc<AiVoterScheduler>,
}

impl CreateProposalUseCase {
    pub(crate) fn new(core: Arc<VotingCore>, scheduler: Arc<AiVoterScheduler>) -> Self {
        Self { core, scheduler }
    }

    /// Returns the proposal as it stands after the proposer's vote, which
    /// may already be `approved` in a party of one.
    pub async fn execute(&self, draft: ProposalDraft) -> Result<MovementProposal, ConsensusError> {
        let roster = self.core.roster.party_members(&draft.session_id).await?;
        let Some(proposer) = roster
            .iter()
            .find(|m| m.character_id == draft.proposer_id && m.is_eligible_voter())
        else {
            return Err(ConsensusError::NotEligible {
                voter_id: draft.proposer_id,
            });
        };

        let settings = self.core.settings.get(&draft.session_id).await?;
        let created_at = Utc::now();
        let mut proposal = MovementProposal::from_draft(
            draft,
            ProposalId::generate(),
            created_at,
            settings.voting_window(),
        );
        let proposer_vote = Vote::new(
            proposal.id.clone(),
            proposer.character_id.clone(),
            proposer.voter_type(),
            VoteChoice::Approve,
        )
        .with_reason(format!("Proposed travel to {}", proposal.target_location_id))
        .at(created_at);

        self.core
            .proposals
            .create_proposal(proposal.clone(), proposer_vote)
            .await
            .map_err(|e| ConsensusError::from_create(&proposal.session_id, e))?;

        info!(
            "Proposal {} created by {}: {} to {} ({} AP)",
            proposal.id,
            proposer.character_name,
            proposal.movement_method,
            proposal.target_location_id,
            proposal.estimated_cost.action_points
        );
        self.core.progress.on_proposal_created(&proposal);
        self.core.logger.log(DecisionEvent::new(
            "proposal_created",
            json!({
                "proposal_id": proposal.id,
                "session_id": proposal.session_id,
                "proposer_id": proposal.proposer_id,
                "target_location_id": proposal.target_location_id,
                "movement_method": proposal.movement_method,
                "urgency": proposal.urgency,
                "difficulty": proposal.difficulty,
                "action_points": proposal.estimated_cost.action_points,
            }),
        ));

        {
            let _guard = self.core.locks.acquire(&proposal.id).await;
            self.core
                .transition(
                    &proposal.id,
                    StatusTransition::new(ProposalStatus::Pending, ProposalStatus::Voting),
                )
                .await?;
            proposal.status = ProposalStatus::Voting;
            let summary = self
                .core
                .reevaluate_locked(&proposal, &roster, &settings)
                .await?;
            proposal.status = summary.status;
        }

        if proposal.status == ProposalStatus::Voting {
            self.scheduler
                .schedule_voting(proposal.id.clone(), proposal.session_id.clone());
        } else {
            self.core.locks.prune(&proposal.id);
        }
        Ok(proposal)
    }
}
