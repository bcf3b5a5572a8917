//! Movement consensus service
//!
//! The engine's single entry point. It is an ordinary value built from
//! injected ports, so tests and binaries can run as many isolated
//! instances as they like. Every operation answers with an
//! [`ApiResponse`] envelope instead of an error.

use crate::config::AiVoterConfig;
use crate::error::ConsensusError;
use crate::ports::collaborators::{
    CharacterDataProvider, LocationService, RosterProvider, TimeService,
};
use crate::ports::decision_logger::{DecisionLogger, NoDecisionLogger};
use crate::ports::progress::{NoProgress, VotingProgressNotifier};
use crate::ports::proposal_store::ProposalStore;
use crate::ports::settings_store::SettingsStore;
use crate::response::ApiResponse;
use crate::use_cases::ai_voter_scheduler::AiVoterScheduler;
use crate::use_cases::cancel_proposal::CancelProposalUseCase;
use crate::use_cases::cast_vote::{CastVoteInput, CastVoteUseCase};
use crate::use_cases::consensus_settings::ConsensusSettingsRegistry;
use crate::use_cases::create_proposal::CreateProposalUseCase;
use crate::use_cases::execute_movement::{ExecuteMovementInput, ExecuteMovementUseCase};
use crate::use_cases::get_voting_summary::GetVotingSummaryUseCase;
use crate::use_cases::shared::VotingCore;
use consensus_domain::{
    AiVotePolicy, ConsensusSettings, ConsensusSettingsPatch, MovementOutcome, MovementProposal,
    ProposalDraft, ProposalId, SessionId, UrgencyBiasedPolicy, VotingSummary,
};
use std::sync::Arc;
use tracing::warn;

/// Storage and collaborator adapters the engine runs against
#[derive(Clone)]
pub struct ConsensusPorts {
    pub proposals: Arc<dyn ProposalStore>,
    pub settings: Arc<dyn SettingsStore>,
    pub roster: Arc<dyn RosterProvider>,
    pub characters: Arc<dyn CharacterDataProvider>,
    pub locations: Arc<dyn LocationService>,
    pub time: Arc<dyn TimeService>,
}

/// Builder for [`MovementConsensusService`]
pub struct MovementConsensusServiceBuilder {
    ports: ConsensusPorts,
    progress: Arc<dyn VotingProgressNotifier>,
    logger: Arc<dyn DecisionLogger>,
    policy: Arc<dyn AiVotePolicy>,
    ai_config: AiVoterConfig,
    default_settings: ConsensusSettings,
}

impl MovementConsensusServiceBuilder {
    pub fn with_progress(mut self, progress: Arc<dyn VotingProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_decision_logger(mut self, logger: Arc<dyn DecisionLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_ai_policy(mut self, policy: Arc<dyn AiVotePolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_ai_config(mut self, config: AiVoterConfig) -> Self {
        self.ai_config = config;
        self
    }

    /// Settings given to sessions that have none stored yet
    pub fn with_default_settings(mut self, settings: ConsensusSettings) -> Self {
        self.default_settings = settings;
        self
    }

    pub fn build(self) -> MovementConsensusService {
        let ports = self.ports;
        let registry = Arc::new(ConsensusSettingsRegistry::with_defaults(
            ports.settings,
            self.default_settings,
        ));
        let core = Arc::new(VotingCore::new(
            ports.proposals,
            Arc::clone(&registry),
            ports.roster,
            self.progress,
            self.logger,
        ));
        let scheduler = Arc::new(AiVoterScheduler::new(
            Arc::clone(&core),
            ports.characters,
            self.policy,
            self.ai_config,
        ));

        MovementConsensusService {
            create: CreateProposalUseCase::new(Arc::clone(&core), Arc::clone(&scheduler)),
            cast: CastVoteUseCase::new(Arc::clone(&core)),
            summary: GetVotingSummaryUseCase::new(Arc::clone(&core)),
            execute: ExecuteMovementUseCase::new(Arc::clone(&core), ports.locations, ports.time),
            cancel: CancelProposalUseCase::new(Arc::clone(&core), Arc::clone(&scheduler)),
            settings: registry,
            scheduler,
            core,
        }
    }
}

/// Party movement consensus engine
pub struct MovementConsensusService {
    create: CreateProposalUseCase,
    cast: CastVoteUseCase,
    summary: GetVotingSummaryUseCase,
    execute: ExecuteMovementUseCase,
    cancel: CancelProposalUseCase,
    settings: Arc<ConsensusSettingsRegistry>,
    scheduler: Arc<AiVoterScheduler>,
    core: Arc<VotingCore>,
}

impl MovementConsensusService {
    pub fn builder(ports: ConsensusPorts) -> MovementConsensusServiceBuilder {
        MovementConsensusServiceBuilder {
            ports,
            progress: Arc::new(NoProgress),
            logger: Arc::new(NoDecisionLogger),
            policy: Arc::new(UrgencyBiasedPolicy::default()),
            ai_config: AiVoterConfig::default(),
            default_settings: ConsensusSettings::default(),
        }
    }

    /// The background AI voter scheduler
    pub fn scheduler(&self) -> &Arc<AiVoterScheduler> {
        &self.scheduler
    }

    pub async fn create_proposal(&self, draft: ProposalDraft) -> ApiResponse<MovementProposal> {
        respond("createProposal", self.create.execute(draft).await)
    }

    pub async fn cast_vote(&self, input: CastVoteInput) -> ApiResponse<VotingSummary> {
        respond("castVote", self.cast.execute(input).await)
    }

    pub async fn get_voting_summary(&self, proposal_id: &ProposalId) -> ApiResponse<VotingSummary> {
        respond(
            "getVotingSummary",
            self.summary.execute(proposal_id).await,
        )
    }

    /// The session's pending or voting proposal
    pub async fn get_active_proposal(
        &self,
        session_id: &SessionId,
    ) -> ApiResponse<Option<MovementProposal>> {
        let result = self
            .core
            .proposals
            .get_active_proposal(session_id)
            .await
            .map_err(ConsensusError::from);
        respond("getActiveProposal", result)
    }

    pub async fn execute_movement(
        &self,
        input: ExecuteMovementInput,
    ) -> ApiResponse<MovementOutcome> {
        let proposal_id = input.proposal_id.clone();
        let forced = input.force_execute;
        let result = self.execute.execute(input).await;
        if forced {
            self.scheduler.cancel(&proposal_id);
        }
        respond("executeMovement", result)
    }

    pub async fn get_consensus_settings(
        &self,
        session_id: &SessionId,
    ) -> ApiResponse<ConsensusSettings> {
        respond(
            "getConsensusSettings",
            self.settings.get(session_id).await,
        )
    }

    pub async fn update_consensus_settings(
        &self,
        session_id: &SessionId,
        patch: &ConsensusSettingsPatch,
    ) -> ApiResponse<ConsensusSettings> {
        respond(
            "updateConsensusSettings",
            self.settings.update(session_id, patch).await,
        )
    }

    pub async fn cancel_proposal(
        &self,
        proposal_id: &ProposalId,
        reason: Option<String>,
    ) -> ApiResponse<()> {
        respond(
            "cancelProposal",
            self.cancel.execute(proposal_id, reason).await,
        )
    }
}

fn respond<T>(operation: &str, result: Result<T, ConsensusError>) -> ApiResponse<T> {
    if let Err(e) = &result {
        warn!("{} failed [{}]: {}", operation, e.code(), e);
    }
    result.into()
}
