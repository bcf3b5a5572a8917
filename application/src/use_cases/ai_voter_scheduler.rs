//! AI voter scheduler
//!
//! Once a proposal opens for voting, the AI-controlled party members cast
//! their votes in the background: one randomized "thinking" delay, then one
//! voter at a time with a randomized gap between them. Every scheduled batch
//! is a tokio task tracked by proposal id with its own cancellation token,
//! so withdrawing a proposal stops the pending votes instead of letting them
//! fire into a dead proposal.

use crate::config::AiVoterConfig;
use crate::error::ConsensusError;
use crate::ports::collaborators::CharacterDataProvider;
use crate::ports::decision_logger::DecisionEvent;
use crate::use_cases::shared::{VoteRequest, VotingCore, sleep_or_cancel};
use consensus_domain::{
    AiDecision, AiVoteContext, AiVotePolicy, MovementProposal, PartyMember, ProposalId,
    ProposalStatus, SessionId, VoterType, VotingSummary,
};
use rand::rngs::StdRng;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

struct ScheduledVoting {
    token: CancellationToken,
    handle: JoinHandle<usize>,
}

/// Background actor casting votes for AI-controlled party members
pub struct AiVoterScheduler {
    core: Arc<VotingCore>,
    characters: Arc<dyn CharacterDataProvider>,
    policy: Arc<dyn AiVotePolicy>,
    config: AiVoterConfig,
    tasks: Mutex<HashMap<ProposalId, ScheduledVoting>>,
}

impl AiVoterScheduler {
    pub(crate) fn new(
        core: Arc<VotingCore>,
        characters: Arc<dyn CharacterDataProvider>,
        policy: Arc<dyn AiVotePolicy>,
        config: AiVoterConfig,
    ) -> Self {
        Self {
            core,
            characters,
            policy,
            config,
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Start the AI voting batch of a proposal without waiting for it.
    ///
    /// Scheduling a proposal whose batch is still running is a no-op.
    pub fn schedule_voting(self: &Arc<Self>, proposal_id: ProposalId, session_id: SessionId) {
        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        tasks.retain(|_, task| !task.handle.is_finished());
        if tasks.contains_key(&proposal_id) {
            debug!("AI voting for {} is already scheduled", proposal_id);
            return;
        }

        let token = CancellationToken::new();
        let this = Arc::clone(self);
        let task_id = proposal_id.clone();
        let task_token = token.clone();
        let handle =
            tokio::spawn(async move { this.run_batch(task_id, session_id, task_token).await });

        debug!("AI voting scheduled for {}", proposal_id);
        tasks.insert(proposal_id, ScheduledVoting { token, handle });
    }

    /// Whether a batch for `proposal_id` is still running
    pub fn is_scheduled(&self, proposal_id: &ProposalId) -> bool {
        self.tasks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(proposal_id)
            .is_some_and(|task| !task.handle.is_finished())
    }

    /// Cancel the pending AI votes of a proposal.
    ///
    /// Returns `false` when nothing was scheduled.
    pub fn cancel(&self, proposal_id: &ProposalId) -> bool {
        let tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        match tasks.get(proposal_id) {
            Some(task) => {
                task.token.cancel();
                info!("AI voting cancelled for {}", proposal_id);
                true
            }
            None => false,
        }
    }

    /// Wait for the batch of `proposal_id` and return how many votes it cast
    pub async fn join(&self, proposal_id: &ProposalId) -> Option<usize> {
        let task = self
            .tasks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(proposal_id)?;
        match task.handle.await {
            Ok(cast) => Some(cast),
            Err(e) => {
                warn!("AI voting task for {} failed: {}", proposal_id, e);
                None
            }
        }
    }

    async fn run_batch(
        self: Arc<Self>,
        proposal_id: ProposalId,
        session_id: SessionId,
        token: CancellationToken,
    ) -> usize {
        let voters = match self.pending_ai_voters(&proposal_id, &session_id).await {
            Ok(voters) => voters,
            Err(e) => {
                warn!("Cannot list AI voters of {}: {}", proposal_id, e);
                return 0;
            }
        };
        if voters.is_empty() {
            debug!("No AI voters pending on {}", proposal_id);
            return 0;
        }

        let progress = &self.core.progress;
        progress.on_ai_voting_started(&proposal_id, voters.len());
        info!(
            "{} AI voter(s) deliberating on {}",
            voters.len(),
            proposal_id
        );

        let mut rng = self.config.rng();
        let mut cast = 0;
        let mut delay = self.config.initial_delay.sample(&mut rng);

        for voter in &voters {
            if !sleep_or_cancel(delay, &token).await {
                info!("AI voting on {} stopped by cancellation", proposal_id);
                progress.on_ai_voting_finished(&proposal_id, cast);
                return cast;
            }
            delay = self.config.vote_gap.sample(&mut rng);

            match self.cast_ai_vote(&proposal_id, voter, &mut rng).await {
                Ok(_) => cast += 1,
                Err(ConsensusError::VotingClosed { status, .. }) => {
                    debug!(
                        "Proposal {} resolved ({}), skipping remaining AI voters",
                        proposal_id, status
                    );
                    break;
                }
                Err(e) => warn!(
                    "AI vote of {} on {} was not recorded: {}",
                    voter.character_id, proposal_id, e
                ),
            }
        }

        if !token.is_cancelled()
            && let Err(e) = self.core.reevaluate(&proposal_id).await
        {
            warn!("Final recount of {} failed: {}", proposal_id, e);
        }
        progress.on_ai_voting_finished(&proposal_id, cast);
        cast
    }

    /// Eligible AI-controlled members without an effective vote
    async fn pending_ai_voters(
        &self,
        proposal_id: &ProposalId,
        session_id: &SessionId,
    ) -> Result<Vec<PartyMember>, ConsensusError> {
        let roster = self.core.roster.party_members(session_id).await?;
        let voted: HashSet<_> = self
            .core
            .proposals
            .list_votes(proposal_id)
            .await?
            .into_iter()
            .map(|v| v.voter_id)
            .collect();

        Ok(roster
            .into_iter()
            .filter(|m| m.is_eligible_voter() && m.is_ai_controlled)
            .filter(|m| !voted.contains(&m.character_id))
            .collect())
    }

    async fn cast_ai_vote(
        &self,
        proposal_id: &ProposalId,
        voter: &PartyMember,
        rng: &mut StdRng,
    ) -> Result<VotingSummary, ConsensusError> {
        let proposal = self.core.load_proposal(proposal_id).await?;
        if proposal.status != ProposalStatus::Voting {
            return Err(ConsensusError::VotingClosed {
                proposal_id: proposal.id,
                status: proposal.status,
            });
        }

        let settings = self.core.settings.get(&proposal.session_id).await?;
        let decision = match self
            .decide(&proposal, voter, settings.allow_abstention, rng)
            .await
        {
            Ok(decision) => decision,
            Err(e) => {
                warn!("{}; {} abstains", e, voter.character_id);
                AiDecision::abstain_after_error(&e)
            }
        };

        info!(
            "AI voter {} chose {} ({})",
            voter.character_name, decision.choice, decision.reason
        );
        self.core.logger.log(DecisionEvent::new(
            "ai_vote_decision",
            json!({
                "proposal_id": proposal.id,
                "voter_id": voter.character_id,
                "choice": decision.choice,
                "reason": decision.reason,
                "confidence": decision.confidence,
                "urgency": proposal.urgency,
                "difficulty": proposal.difficulty,
            }),
        ));

        self.core
            .record_vote(VoteRequest {
                proposal_id: proposal.id,
                voter_id: voter.character_id.clone(),
                choice: decision.choice,
                reason: decision.reason,
                origin: VoterType::AiAgent,
            })
            .await
    }

    async fn decide(
        &self,
        proposal: &MovementProposal,
        voter: &PartyMember,
        allow_abstention: bool,
        rng: &mut StdRng,
    ) -> Result<AiDecision, ConsensusError> {
        let character = self
            .characters
            .character_profile(&voter.character_id)
            .await
            .map_err(|e| ConsensusError::AiVoteGeneration(e.to_string()))?;

        let context = AiVoteContext {
            proposal,
            character: &character,
            allow_abstention,
        };
        let policy = &self.policy;
        match panic::catch_unwind(AssertUnwindSafe(|| policy.decide(&context, rng))) {
            Ok(result) => result.map_err(|e| ConsensusError::AiVoteGeneration(e.to_string())),
            Err(_) => Err(ConsensusError::AiVoteGeneration(
                "decision policy panicked".to_string(),
            )),
        }
    }
}
