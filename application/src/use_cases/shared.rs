//! Shared voting core used across use cases.
//!
//! Holds the per-proposal serialization point and the
//! "record vote → recompute → conditionally transition" path used by both
//! the synchronous vote cast and the background AI voter scheduler.

use crate::error::ConsensusError;
use crate::ports::collaborators::RosterProvider;
use crate::ports::decision_logger::{DecisionEvent, DecisionLogger};
use crate::ports::progress::VotingProgressNotifier;
use crate::ports::proposal_store::{ProposalStore, StatusTransition, TransitionResult};
use crate::use_cases::consensus_settings::ConsensusSettingsRegistry;
use consensus_domain::core::string::truncate;
use consensus_domain::{
    CharacterId, ConsensusOutcome, ConsensusSettings, DomainError, MovementProposal, PartyMember,
    ProposalId, ProposalStatus, Vote, VoteChoice, VoterType, VotingSummary, summarize,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Reasons longer than this are cut in decision logs
const LOGGED_REASON_LEN: usize = 200;

/// Per-proposal async mutexes
#[derive(Default)]
pub(crate) struct ProposalLocks {
    inner: Mutex<HashMap<ProposalId, Arc<AsyncMutex<()>>>>,
}

impl ProposalLocks {
    /// Wait for exclusive access to `proposal_id`
    pub(crate) async fn acquire(&self, proposal_id: &ProposalId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(map.entry(proposal_id.clone()).or_default())
        };
        lock.lock_owned().await
    }

    /// Drop the entry of a proposal nobody is holding or waiting on
    pub(crate) fn prune(&self, proposal_id: &ProposalId) {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if map
            .get(proposal_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            map.remove(proposal_id);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// A vote about to be recorded
#[derive(Debug, Clone)]
pub(crate) struct VoteRequest {
    pub proposal_id: ProposalId,
    pub voter_id: CharacterId,
    pub choice: VoteChoice,
    pub reason: String,
    /// Who cast it; only human abstentions are subject to `allow_abstention`
    pub origin: VoterType,
}

/// State and collaborators shared by every use case
pub(crate) struct VotingCore {
    pub proposals: Arc<dyn ProposalStore>,
    pub settings: Arc<ConsensusSettingsRegistry>,
    pub roster: Arc<dyn RosterProvider>,
    pub progress: Arc<dyn VotingProgressNotifier>,
    pub logger: Arc<dyn DecisionLogger>,
    pub locks: ProposalLocks,
}

impl VotingCore {
    pub(crate) fn new(
        proposals: Arc<dyn ProposalStore>,
        settings: Arc<ConsensusSettingsRegistry>,
        roster: Arc<dyn RosterProvider>,
        progress: Arc<dyn VotingProgressNotifier>,
        logger: Arc<dyn DecisionLogger>,
    ) -> Self {
        Self {
            proposals,
            settings,
            roster,
            progress,
            logger,
            locks: ProposalLocks::default(),
        }
    }

    pub(crate) async fn load_proposal(
        &self,
        proposal_id: &ProposalId,
    ) -> Result<MovementProposal, ConsensusError> {
        self.proposals
            .get_proposal(proposal_id)
            .await?
            .ok_or_else(|| ConsensusError::ProposalNotFound(proposal_id.clone()))
    }

    /// Recompute the summary of `proposal` from stored votes
    pub(crate) async fn summary(
        &self,
        proposal: &MovementProposal,
    ) -> Result<VotingSummary, ConsensusError> {
        let roster = self.roster.party_members(&proposal.session_id).await?;
        let settings = self.settings.get(&proposal.session_id).await?;
        let votes = self.proposals.list_votes(&proposal.id).await?;
        Ok(summarize(proposal, &votes, &roster, &settings))
    }

    /// Store a vote, then resolve the proposal if the outcome is decided
    pub(crate) async fn record_vote(
        &self,
        request: VoteRequest,
    ) -> Result<VotingSummary, ConsensusError> {
        let proposal_id = request.proposal_id.clone();
        let guard = self.locks.acquire(&proposal_id).await;
        let result = self.record_vote_locked(request).await;
        drop(guard);
        self.release_if_settled(&proposal_id, &result);
        result
    }

    async fn record_vote_locked(
        &self,
        request: VoteRequest,
    ) -> Result<VotingSummary, ConsensusError> {
        let proposal = self.load_proposal(&request.proposal_id).await?;
        if proposal.status != ProposalStatus::Voting {
            return Err(ConsensusError::VotingClosed {
                proposal_id: proposal.id,
                status: proposal.status,
            });
        }

        let roster = self.roster.party_members(&proposal.session_id).await?;
        if !roster
            .iter()
            .any(|m| m.character_id == request.voter_id && m.is_eligible_voter())
        {
            return Err(ConsensusError::NotEligible {
                voter_id: request.voter_id,
            });
        }

        let settings = self.settings.get(&proposal.session_id).await?;
        if request.choice == VoteChoice::Abstain
            && request.origin == VoterType::Human
            && !settings.allow_abstention
        {
            return Err(ConsensusError::AbstentionNotAllowed);
        }

        let vote = Vote::new(
            proposal.id.clone(),
            request.voter_id,
            request.origin,
            request.choice,
        )
        .with_reason(request.reason);
        self.proposals.upsert_vote(vote.clone()).await?;

        info!(
            "Vote recorded on {}: {} -> {}",
            proposal.id, vote.voter_id, vote.choice
        );
        self.logger.log(DecisionEvent::new(
            "vote_recorded",
            json!({
                "proposal_id": proposal.id,
                "voter_id": vote.voter_id,
                "voter_type": vote.voter_type,
                "choice": vote.choice,
                "reason": truncate(&vote.reason, LOGGED_REASON_LEN),
            }),
        ));

        let summary = self.reevaluate_locked(&proposal, &roster, &settings).await?;
        self.progress.on_vote_recorded(&vote, &summary);
        Ok(summary)
    }

    /// Lock the proposal and re-run the decision procedure
    pub(crate) async fn reevaluate(
        &self,
        proposal_id: &ProposalId,
    ) -> Result<VotingSummary, ConsensusError> {
        let guard = self.locks.acquire(proposal_id).await;
        let result = self.reload_and_reevaluate(proposal_id).await;
        drop(guard);
        self.release_if_settled(proposal_id, &result);
        result
    }

    async fn reload_and_reevaluate(
        &self,
        proposal_id: &ProposalId,
    ) -> Result<VotingSummary, ConsensusError> {
        let proposal = self.load_proposal(proposal_id).await?;
        let roster = self.roster.party_members(&proposal.session_id).await?;
        let settings = self.settings.get(&proposal.session_id).await?;
        self.reevaluate_locked(&proposal, &roster, &settings).await
    }

    /// Forget the lock of a proposal that no longer takes votes
    fn release_if_settled(
        &self,
        proposal_id: &ProposalId,
        result: &Result<VotingSummary, ConsensusError>,
    ) {
        let settled = match result {
            Ok(summary) => summary.status != ProposalStatus::Voting,
            Err(ConsensusError::VotingClosed { .. } | ConsensusError::ProposalNotFound(_)) => true,
            Err(_) => false,
        };
        if settled {
            self.locks.prune(proposal_id);
        }
    }

    /// Decision procedure; the caller holds the proposal lock
    pub(crate) async fn reevaluate_locked(
        &self,
        proposal: &MovementProposal,
        roster: &[PartyMember],
        settings: &ConsensusSettings,
    ) -> Result<VotingSummary, ConsensusError> {
        let votes = self.proposals.list_votes(&proposal.id).await?;
        let mut summary = summarize(proposal, &votes, roster, settings);
        if proposal.status != ProposalStatus::Voting {
            return Ok(summary);
        }

        let outcome = ConsensusOutcome::evaluate(&summary);
        if outcome.is_voting() {
            debug!(
                "Proposal {} still voting ({}/{} voted)",
                proposal.id,
                summary.voted_count(),
                summary.total_eligible_voters
            );
            return Ok(summary);
        }

        let next = outcome.status();
        match self
            .transition(
                &proposal.id,
                StatusTransition::new(ProposalStatus::Voting, next),
            )
            .await
        {
            Ok(()) => {
                info!("Proposal {} resolved: {}", proposal.id, outcome);
                summary.status = next;
            }
            Err(ConsensusError::StatusConflict { actual, .. }) => {
                debug!(
                    "Proposal {} already left voting (now {}), keeping stored status",
                    proposal.id, actual
                );
                summary.status = actual;
            }
            Err(e) => return Err(e),
        }
        Ok(summary)
    }

    /// Compare-and-set a status change and announce it
    pub(crate) async fn transition(
        &self,
        proposal_id: &ProposalId,
        transition: StatusTransition,
    ) -> Result<(), ConsensusError> {
        let from = transition.expected;
        let to = transition.next;
        if !from.can_transition_to(to) {
            return Err(DomainError::InvalidTransition { from, to }.into());
        }

        match self
            .proposals
            .transition_status(proposal_id, &transition)
            .await?
        {
            TransitionResult::Applied => {
                debug!("Proposal {}: {} -> {}", proposal_id, from, to);
                self.progress.on_status_changed(proposal_id, from, to);
                self.logger.log(DecisionEvent::new(
                    "status_changed",
                    json!({
                        "proposal_id": proposal_id,
                        "from": from,
                        "to": to,
                        "note": transition.note,
                    }),
                ));
                Ok(())
            }
            TransitionResult::Conflict(actual) => Err(ConsensusError::StatusConflict {
                proposal_id: proposal_id.clone(),
                expected: from,
                actual,
            }),
        }
    }
}

/// Sleep for `duration` unless `token` fires first.
///
/// Returns `false` when cancelled.
pub(crate) async fn sleep_or_cancel(duration: Duration, token: &CancellationToken) -> bool {
    if token.is_cancelled() {
        return false;
    }
    if duration.is_zero() {
        return true;
    }
    tokio::select! {
        _ = token.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}
