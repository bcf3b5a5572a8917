//! Execute Movement use case
//!
//! Relocates the whole party once a proposal is approved. The move is
//! all-or-nothing at the party level: the proposal ends `completed` only if
//! every member moved, and only then is the turn cost charged to the
//! campaign clock. Any failed member leaves the proposal `failed` with no
//! time spent.

use crate::error::ConsensusError;
use crate::ports::collaborators::{LocationService, TimeService};
use crate::ports::decision_logger::DecisionEvent;
use crate::ports::proposal_store::StatusTransition;
use crate::use_cases::shared::VotingCore;
use consensus_domain::{
    MAX_ACTION_POINTS, MemberMoveResult, MoveRequest, MoveTally, MovementOutcome,
    MovementProposal, ProposalId, ProposalStatus, TimeAdvance,
};
use futures::future::join_all;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Input for the ExecuteMovement use case
#[derive(Debug, Clone)]
pub struct ExecuteMovementInput {
    pub proposal_id: ProposalId,
    /// Administrative override: execute a proposal that was not approved
    pub force_execute: bool,
}

impl ExecuteMovementInput {
    pub fn new(proposal_id: impl Into<ProposalId>) -> Self {
        Self {
            proposal_id: proposal_id.into(),
            force_execute: false,
        }
    }

    pub fn forced(mut self) -> Self {
        self.force_execute = true;
        self
    }
}

pub struct ExecuteMovementUseCase {
    core: Arc<VotingCore>,
    locations: Arc<dyn LocationService>,
    time: Arc<dyn TimeService>,
}

impl ExecuteMovementUseCase {
    pub(crate) fn new(
        core: Arc<VotingCore>,
        locations: Arc<dyn LocationService>,
        time: Arc<dyn TimeService>,
    ) -> Self {
        Self {
            core,
            locations,
            time,
        }
    }

    pub async fn execute(
        &self,
        input: ExecuteMovementInput,
    ) -> Result<MovementOutcome, ConsensusError> {
        let guard = self.core.locks.acquire(&input.proposal_id).await;
        let proposal = self.core.load_proposal(&input.proposal_id).await?;

        let status = proposal.status;
        let executable = status == ProposalStatus::Approved
            || (input.force_execute && status.can_transition_to(ProposalStatus::Executing));
        if !executable {
            return Err(ConsensusError::NotApproved {
                proposal_id: proposal.id,
                status,
            });
        }
        if status != ProposalStatus::Approved {
            warn!(
                "Force-executing proposal {} from status {}",
                proposal.id, status
            );
        }

        self.core
            .transition(
                &proposal.id,
                StatusTransition::new(status, ProposalStatus::Executing),
            )
            .await?;

        let result = self.run(&proposal).await;
        drop(guard);
        self.core.locks.prune(&proposal.id);
        result
    }

    /// Drive `executing` to `completed` or `failed`
    async fn run(&self, proposal: &MovementProposal) -> Result<MovementOutcome, ConsensusError> {
        let tally = match self.move_party(proposal).await {
            Ok(tally) => tally,
            Err(e) => {
                warn!("Cannot move party for {}: {}", proposal.id, e);
                self.finish(proposal, ProposalStatus::Failed).await?;
                return Err(e);
            }
        };

        if !tally.all_succeeded() {
            self.finish(proposal, ProposalStatus::Failed).await?;
            let error = ConsensusError::PartialMovementFailure {
                succeeded: tally.succeeded(),
                total: tally.total(),
                failed_members: tally.failed_members(),
            };
            warn!("Proposal {} failed: {}", proposal.id, error);
            self.core.logger.log(DecisionEvent::new(
                "movement_failed",
                json!({
                    "proposal_id": proposal.id,
                    "results": tally.results,
                }),
            ));
            return Err(error);
        }

        self.finish(proposal, ProposalStatus::Completed).await?;
        let time_updates = self.charge_turns(proposal).await;
        let outcome = MovementOutcome {
            proposal_id: proposal.id.clone(),
            new_location_id: proposal.target_location_id.clone(),
            members_moved: tally.total(),
            turns_advanced: time_updates.len() as u32,
            time_updates,
        };

        info!(
            "Party moved to {} ({} members, {} turns)",
            outcome.new_location_id, outcome.members_moved, outcome.turns_advanced
        );
        self.core.logger.log(DecisionEvent::new(
            "movement_completed",
            json!({
                "proposal_id": proposal.id,
                "new_location_id": outcome.new_location_id,
                "members_moved": outcome.members_moved,
                "turns_advanced": outcome.turns_advanced,
            }),
        ));
        Ok(outcome)
    }

    /// Move every party member concurrently and collect the results
    async fn move_party(&self, proposal: &MovementProposal) -> Result<MoveTally, ConsensusError> {
        let members = self.core.roster.party_members(&proposal.session_id).await?;
        let moves = members.iter().map(|member| async move {
            let request = MoveRequest {
                character_id: member.character_id.clone(),
                to_location_id: proposal.target_location_id.clone(),
                method: proposal.movement_method,
                estimated_duration: proposal.estimated_time,
            };
            match self.locations.move_character(&request).await {
                Ok(()) => MemberMoveResult {
                    character_id: request.character_id,
                    success: true,
                    error: None,
                },
                Err(e) => MemberMoveResult {
                    character_id: request.character_id,
                    success: false,
                    error: Some(e.to_string()),
                },
            }
        });

        let mut tally = MoveTally::default();
        for result in join_all(moves).await {
            tally.push(result);
        }
        Ok(tally)
    }

    async fn finish(
        &self,
        proposal: &MovementProposal,
        status: ProposalStatus,
    ) -> Result<(), ConsensusError> {
        self.core
            .transition(
                &proposal.id,
                StatusTransition::new(ProposalStatus::Executing, status),
            )
            .await
    }

    /// Advance the campaign clock once per action point.
    ///
    /// The move already succeeded, so failures here stop charging and are
    /// reported through the number of advances returned.
    async fn charge_turns(&self, proposal: &MovementProposal) -> Vec<TimeAdvance> {
        let settings = match self.core.settings.get(&proposal.session_id).await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Cannot read settings of {}: {}", proposal.session_id, e);
                return Vec::new();
            }
        };
        if !settings.turn_based_movement_cost {
            return Vec::new();
        }

        let campaign_id = match self.core.roster.campaign_id(&proposal.session_id).await {
            Ok(id) => id,
            Err(e) => {
                warn!("No campaign for session {}: {}", proposal.session_id, e);
                return Vec::new();
            }
        };

        // Stored proposals may predate the cap
        let turns = proposal.estimated_cost.action_points.min(MAX_ACTION_POINTS);
        let mut updates = Vec::new();
        for _ in 0..turns {
            match self.time.advance_time(&campaign_id).await {
                Ok(advance) => updates.push(advance),
                Err(e) => {
                    warn!(
                        "Time advance stopped after {}/{} turns: {}",
                        updates.len(),
                        turns,
                        e
                    );
                    break;
                }
            }
        }
        updates
    }
}
