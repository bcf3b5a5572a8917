//! In-memory proposal and settings store

use super::tables::ConsensusTables;
use async_trait::async_trait;
use consensus_application::{
    ProposalStore, SettingsStore, StatusTransition, StoreError, TransitionResult,
};
use consensus_domain::{
    ConsensusSettings, MovementProposal, ProposalId, ProposalStatus, SessionId, Vote,
};
use std::sync::{Mutex, MutexGuard};

/// Store whose rows live for the lifetime of the process
#[derive(Default)]
pub struct InMemoryConsensusStore {
    tables: Mutex<ConsensusTables>,
}

impl InMemoryConsensusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current rows, e.g. for exporting a session
    pub fn snapshot(&self) -> Result<ConsensusTables, StoreError> {
        Ok(self.tables()?.clone())
    }

    fn tables(&self) -> Result<MutexGuard<'_, ConsensusTables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Storage("store lock poisoned".to_string()))
    }
}

#[async_trait]
impl ProposalStore for InMemoryConsensusStore {
    async fn create_proposal(
        &self,
        proposal: MovementProposal,
        proposer_vote: Vote,
    ) -> Result<(), StoreError> {
        self.tables()?.create_proposal(&proposal, &proposer_vote)
    }

    async fn get_active_proposal(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<MovementProposal>, StoreError> {
        self.tables()?.active_proposal(session_id)
    }

    async fn get_proposal(&self, id: &ProposalId) -> Result<Option<MovementProposal>, StoreError> {
        self.tables()?.proposal(id)
    }

    async fn upsert_vote(&self, vote: Vote) -> Result<(), StoreError> {
        self.tables()?.upsert_vote(&vote);
        Ok(())
    }

    async fn list_votes(&self, proposal_id: &ProposalId) -> Result<Vec<Vote>, StoreError> {
        self.tables()?.votes(proposal_id)
    }

    async fn set_status(&self, id: &ProposalId, status: ProposalStatus) -> Result<(), StoreError> {
        self.tables()?.set_status(id, status)
    }

    async fn transition_status(
        &self,
        id: &ProposalId,
        transition: &StatusTransition,
    ) -> Result<TransitionResult, StoreError> {
        self.tables()?.transition(id, transition)
    }
}

#[async_trait]
impl SettingsStore for InMemoryConsensusStore {
    async fn load_settings(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<ConsensusSettings>, StoreError> {
        self.tables()?.settings(session_id)
    }

    async fn save_settings(
        &self,
        session_id: &SessionId,
        settings: &ConsensusSettings,
    ) -> Result<(), StoreError> {
        self.tables()?.save_settings(session_id, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use consensus_domain::{ProposalDraft, VoteChoice, VoterType};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_concurrent_creates_admit_one() {
        let store = Arc::new(InMemoryConsensusStore::new());

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let draft = ProposalDraft::new("s-1", format!("pc-{i}"), "harbor");
                let proposal = MovementProposal::from_draft(
                    draft,
                    ProposalId::generate(),
                    Utc::now(),
                    Duration::seconds(60),
                );
                let vote = Vote::new(
                    proposal.id.clone(),
                    format!("pc-{i}"),
                    VoterType::Human,
                    VoteChoice::Approve,
                );
                store.create_proposal(proposal, vote).await
            }));
        }

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => created += 1,
                Err(StoreError::ActiveProposalExists { .. }) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(store.snapshot().unwrap().movement_proposals.len(), 1);
        assert_eq!(store.snapshot().unwrap().proposal_votes.len(), 1);
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let store = InMemoryConsensusStore::new();
        let session: SessionId = "s-1".into();
        assert!(store.load_settings(&session).await.unwrap().is_none());

        store
            .save_settings(&session, &ConsensusSettings::default())
            .await
            .unwrap();
        assert_eq!(
            store.load_settings(&session).await.unwrap(),
            Some(ConsensusSettings::default())
        );
    }
}
