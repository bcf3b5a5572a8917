//! Hand-written port doubles shared by the use case tests

use crate::ports::collaborators::{
    CharacterDataProvider, CollaboratorError, LocationService, RosterProvider, TimeService,
};
use crate::ports::decision_logger::{DecisionEvent, DecisionLogger, NoDecisionLogger};
use crate::ports::progress::NoProgress;
use crate::ports::proposal_store::{ProposalStore, StatusTransition, StoreError, TransitionResult};
use crate::ports::settings_store::SettingsStore;
use crate::service::ConsensusPorts;
use crate::use_cases::consensus_settings::ConsensusSettingsRegistry;
use crate::use_cases::shared::VotingCore;
use async_trait::async_trait;
use chrono::Utc;
use consensus_domain::{
    CampaignId, CharacterId, CharacterProfile, ConsensusSettings, ConsensusSettingsPatch,
    MoveRequest, MovementProposal, PartyMember, ProposalDraft, ProposalId, ProposalStatus,
    SessionId, TimeAdvance, Vote, VoteChoice, VoterType,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub(crate) const SESSION: &str = "session-1";

// ==================== Store ====================

#[derive(Default)]
struct StoreState {
    proposals: HashMap<ProposalId, MovementProposal>,
    votes: Vec<Vote>,
    settings: HashMap<SessionId, ConsensusSettings>,
    transitions: Vec<(ProposalId, ProposalStatus, ProposalStatus)>,
}

#[derive(Default)]
pub(crate) struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    pub(crate) fn status_changes(&self, id: &ProposalId) -> Vec<(ProposalStatus, ProposalStatus)> {
        self.state
            .lock()
            .unwrap()
            .transitions
            .iter()
            .filter(|(p, _, _)| p == id)
            .map(|(_, from, to)| (*from, *to))
            .collect()
    }

    pub(crate) fn votes_of(&self, id: &ProposalId) -> Vec<Vote> {
        self.state
            .lock()
            .unwrap()
            .votes
            .iter()
            .filter(|v| &v.proposal_id == id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ProposalStore for MemoryStore {
    async fn create_proposal(
        &self,
        proposal: MovementProposal,
        proposer_vote: Vote,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if let Some(active) = state
            .proposals
            .values()
            .find(|p| p.session_id == proposal.session_id && p.status.is_active())
        {
            return Err(StoreError::ActiveProposalExists {
                proposal_id: active.id.clone(),
            });
        }
        state.proposals.insert(proposal.id.clone(), proposal);
        state.votes.push(proposer_vote);
        Ok(())
    }

    async fn get_active_proposal(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<MovementProposal>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .proposals
            .values()
            .find(|p| &p.session_id == session_id && p.status.is_active())
            .cloned())
    }

    async fn get_proposal(&self, id: &ProposalId) -> Result<Option<MovementProposal>, StoreError> {
        Ok(self.state.lock().unwrap().proposals.get(id).cloned())
    }

    async fn upsert_vote(&self, vote: Vote) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state
            .votes
            .retain(|v| !(v.proposal_id == vote.proposal_id && v.voter_id == vote.voter_id));
        state.votes.push(vote);
        Ok(())
    }

    async fn list_votes(&self, proposal_id: &ProposalId) -> Result<Vec<Vote>, StoreError> {
        Ok(self.votes_of(proposal_id))
    }

    async fn set_status(&self, id: &ProposalId, status: ProposalStatus) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        let proposal = state
            .proposals
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        proposal.status = status;
        Ok(())
    }

    async fn transition_status(
        &self,
        id: &ProposalId,
        transition: &StatusTransition,
    ) -> Result<TransitionResult, StoreError> {
        let mut state = self.state.lock().unwrap();
        let proposal = state
            .proposals
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if proposal.status != transition.expected {
            return Ok(TransitionResult::Conflict(proposal.status));
        }
        proposal.status = transition.next;
        if let Some(note) = &transition.note {
            proposal.cancellation_reason = Some(note.clone());
        }
        state
            .transitions
            .push((id.clone(), transition.expected, transition.next));
        Ok(TransitionResult::Applied)
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn load_settings(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<ConsensusSettings>, StoreError> {
        Ok(self.state.lock().unwrap().settings.get(session_id).cloned())
    }

    async fn save_settings(
        &self,
        session_id: &SessionId,
        settings: &ConsensusSettings,
    ) -> Result<(), StoreError> {
        self.state
            .lock()
            .unwrap()
            .settings
            .insert(session_id.clone(), settings.clone());
        Ok(())
    }
}

// ==================== Collaborators ====================

/// Roster builder: `party_of(3)` is three human PCs `pc-1..pc-3`
pub(crate) struct Party {
    pub members: Vec<PartyMember>,
}

pub(crate) fn party_of(humans: usize) -> Party {
    Party {
        members: (1..=humans)
            .map(|i| PartyMember::player(format!("pc-{i}"), format!("Player {i}")))
            .collect(),
    }
}

impl Party {
    pub(crate) fn with_ai(mut self, id: &str) -> Self {
        self.members.push(PartyMember::ai_player(id, format!("Companion {id}")));
        self
    }

    pub(crate) fn with_npc(mut self, id: &str) -> Self {
        self.members.push(PartyMember::npc(id, format!("Follower {id}")));
        self
    }
}

pub(crate) struct FakeRoster {
    members: Vec<PartyMember>,
}

#[async_trait]
impl RosterProvider for FakeRoster {
    async fn party_members(
        &self,
        _session_id: &SessionId,
    ) -> Result<Vec<PartyMember>, CollaboratorError> {
        Ok(self.members.clone())
    }

    async fn campaign_id(&self, _session_id: &SessionId) -> Result<CampaignId, CollaboratorError> {
        Ok(CampaignId::new("campaign-1"))
    }
}

/// Character data that can be told to lose specific characters
#[derive(Default)]
pub(crate) struct FakeCharacters {
    missing: Mutex<HashSet<CharacterId>>,
}

impl FakeCharacters {
    pub(crate) fn forget(&self, id: &str) {
        self.missing.lock().unwrap().insert(CharacterId::new(id));
    }
}

#[async_trait]
impl CharacterDataProvider for FakeCharacters {
    async fn character_profile(
        &self,
        character_id: &CharacterId,
    ) -> Result<CharacterProfile, CollaboratorError> {
        if self.missing.lock().unwrap().contains(character_id) {
            return Err(CollaboratorError::NotFound(character_id.to_string()));
        }
        Ok(CharacterProfile {
            character_id: character_id.clone(),
            name: format!("Character {character_id}"),
            description: None,
        })
    }
}

/// Location service recording every move request
#[derive(Default)]
pub(crate) struct RecordingLocations {
    blocked: Mutex<HashSet<CharacterId>>,
    pub moves: Mutex<Vec<MoveRequest>>,
}

impl RecordingLocations {
    pub(crate) fn block(&self, id: &str) {
        self.blocked.lock().unwrap().insert(CharacterId::new(id));
    }

    pub(crate) fn move_count(&self) -> usize {
        self.moves.lock().unwrap().len()
    }
}

#[async_trait]
impl LocationService for RecordingLocations {
    async fn move_character(&self, request: &MoveRequest) -> Result<(), CollaboratorError> {
        self.moves.lock().unwrap().push(request.clone());
        if self.blocked.lock().unwrap().contains(&request.character_id) {
            return Err(CollaboratorError::Rejected(format!(
                "{} cannot reach {}",
                request.character_id, request.to_location_id
            )));
        }
        Ok(())
    }
}

/// Time service counting advances; fails once `fail_after` calls succeeded
#[derive(Default)]
pub(crate) struct CountingClock {
    calls: Mutex<u32>,
    fail_after: Mutex<Option<u32>>,
}

impl CountingClock {
    pub(crate) fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }

    pub(crate) fn fail_after(&self, successes: u32) {
        *self.fail_after.lock().unwrap() = Some(successes);
    }
}

#[async_trait]
impl TimeService for CountingClock {
    async fn advance_time(&self, _campaign_id: &CampaignId) -> Result<TimeAdvance, CollaboratorError> {
        let mut calls = self.calls.lock().unwrap();
        if self.fail_after.lock().unwrap().is_some_and(|limit| *calls >= limit) {
            return Err(CollaboratorError::Unavailable("clock offline".to_string()));
        }
        *calls += 1;
        Ok(TimeAdvance {
            new_period: format!("period-{}", *calls),
            new_day: None,
            message: "Time passes".to_string(),
        })
    }
}

/// Decision logger keeping every event type
#[derive(Default)]
pub(crate) struct RecordingLogger {
    events: Mutex<Vec<(String, serde_json::Value)>>,
}

impl RecordingLogger {
    pub(crate) fn events_of(&self, event_type: &str) -> Vec<serde_json::Value> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == event_type)
            .map(|(_, payload)| payload.clone())
            .collect()
    }
}

impl DecisionLogger for RecordingLogger {
    fn log(&self, event: DecisionEvent) {
        self.events
            .lock()
            .unwrap()
            .push((event.event_type.to_string(), event.payload));
    }
}

// ==================== Fixture ====================

pub(crate) struct Fixture {
    pub store: Arc<MemoryStore>,
    pub roster: Arc<FakeRoster>,
    pub characters: Arc<FakeCharacters>,
    pub locations: Arc<RecordingLocations>,
    pub clock: Arc<CountingClock>,
    pub registry: Arc<ConsensusSettingsRegistry>,
    pub core: Arc<VotingCore>,
}

impl Fixture {
    pub(crate) fn new(party: Party) -> Self {
        Self::with_logger(party, Arc::new(NoDecisionLogger))
    }

    pub(crate) fn with_logger(party: Party, logger: Arc<dyn DecisionLogger>) -> Self {
        let store = Arc::new(MemoryStore::default());
        let roster = Arc::new(FakeRoster {
            members: party.members,
        });
        let registry = Arc::new(ConsensusSettingsRegistry::new(store.clone()));
        let core = Arc::new(VotingCore::new(
            store.clone(),
            Arc::clone(&registry),
            roster.clone(),
            Arc::new(NoProgress),
            logger,
        ));
        Self {
            store,
            roster,
            characters: Arc::new(FakeCharacters::default()),
            locations: Arc::new(RecordingLocations::default()),
            clock: Arc::new(CountingClock::default()),
            registry,
            core,
        }
    }

    /// Ports for a service sharing this fixture's store and collaborators
    pub(crate) fn ports(&self) -> ConsensusPorts {
        ConsensusPorts {
            proposals: self.store.clone(),
            settings: self.store.clone(),
            roster: self.roster.clone(),
            characters: self.characters.clone(),
            locations: self.locations.clone(),
            time: self.clock.clone(),
        }
    }

    pub(crate) async fn patch_settings(&self, patch: ConsensusSettingsPatch) {
        self.registry
            .update(&SessionId::new(SESSION), &patch)
            .await
            .unwrap();
    }

    pub(crate) async fn disallow_abstention(&self) {
        self.patch_settings(ConsensusSettingsPatch {
            allow_abstention: Some(false),
            ..Default::default()
        })
        .await;
    }

    /// Store a pending proposal with its proposer vote
    pub(crate) async fn insert_pending(&self, draft: ProposalDraft) -> MovementProposal {
        let proposal = MovementProposal::from_draft(
            draft,
            ProposalId::generate(),
            Utc::now(),
            chrono::Duration::seconds(300),
        );
        let vote = Vote::new(
            proposal.id.clone(),
            proposal.proposer_id.clone(),
            VoterType::Human,
            VoteChoice::Approve,
        );
        self.store
            .create_proposal(proposal.clone(), vote)
            .await
            .unwrap();
        proposal
    }

    /// Store a proposal from `proposer` and open it for voting
    pub(crate) async fn voting_proposal(&self, proposer: &str) -> MovementProposal {
        let draft = ProposalDraft::new(SESSION, proposer, "harbor");
        let mut proposal = self.insert_pending(draft).await;
        self.store
            .transition_status(
                &proposal.id,
                &StatusTransition::new(ProposalStatus::Pending, ProposalStatus::Voting),
            )
            .await
            .unwrap();
        proposal.status = ProposalStatus::Voting;
        proposal
    }

    /// Force a stored status, bypassing the state machine
    pub(crate) async fn force_status(&self, id: &ProposalId, status: ProposalStatus) {
        self.store.set_status(id, status).await.unwrap();
    }
}
