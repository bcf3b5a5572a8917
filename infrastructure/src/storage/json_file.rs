//! JSON snapshot file store
//!
//! All rows are kept in memory and the whole snapshot is rewritten after
//! every change. Writes go to a sibling temp file that is then renamed
//! over the snapshot, so a crash never leaves a half-written file.

use super::tables::ConsensusTables;
use async_trait::async_trait;
use consensus_application::{
    ProposalStore, SettingsStore, StatusTransition, StoreError, TransitionResult,
};
use consensus_domain::{
    ConsensusSettings, MovementProposal, ProposalId, ProposalStatus, SessionId, Vote,
};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

pub struct JsonFileConsensusStore {
    path: PathBuf,
    tables: Mutex<ConsensusTables>,
}

impl JsonFileConsensusStore {
    /// Open the snapshot at `path`, starting empty if it does not exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let tables = match tokio::fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => ConsensusTables::default(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                StoreError::Serialization(format!("{}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ConsensusTables::default(),
            Err(e) => {
                return Err(StoreError::Storage(format!(
                    "could not read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        info!(
            "Opened consensus store {} ({} proposals)",
            path.display(),
            tables.movement_proposals.len()
        );

        Ok(Self {
            path,
            tables: Mutex::new(tables),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read<T>(
        &self,
        f: impl FnOnce(&ConsensusTables) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let tables = self.tables.lock().await;
        f(&tables)
    }

    /// Apply `f` to a copy of the tables and keep it only once persisted.
    async fn mutate<T>(
        &self,
        f: impl FnOnce(&mut ConsensusTables) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut tables = self.tables.lock().await;
        let mut next = tables.clone();
        let value = f(&mut next)?;
        self.persist(&next).await?;
        *tables = next;
        Ok(value)
    }

    async fn persist(&self, tables: &ConsensusTables) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(tables)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.storage_error("create directory for", e))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| self.storage_error("write", e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.storage_error("replace", e))?;

        debug!("Persisted {} bytes to {}", json.len(), self.path.display());
        Ok(())
    }

    fn storage_error(&self, action: &str, e: std::io::Error) -> StoreError {
        StoreError::Storage(format!("could not {} {}: {}", action, self.path.display(), e))
    }
}

#[async_trait]
impl ProposalStore for JsonFileConsensusStore {
    async fn create_proposal(
        &self,
        proposal: MovementProposal,
        proposer_vote: Vote,
    ) -> Result<(), StoreError> {
        self.mutate(|t| t.create_proposal(&proposal, &proposer_vote))
            .await
    }

    async fn get_active_proposal(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<MovementProposal>, StoreError> {
        self.read(|t| t.active_proposal(session_id)).await
    }

    async fn get_proposal(&self, id: &ProposalId) -> Result<Option<MovementProposal>, StoreError> {
        self.read(|t| t.proposal(id)).await
    }

    async fn upsert_vote(&self, vote: Vote) -> Result<(), StoreError> {
        self.mutate(|t| {
            t.upsert_vote(&vote);
            Ok(())
        })
        .await
    }

    async fn list_votes(&self, proposal_id: &ProposalId) -> Result<Vec<Vote>, StoreError> {
        self.read(|t| t.votes(proposal_id)).await
    }

    async fn set_status(&self, id: &ProposalId, status: ProposalStatus) -> Result<(), StoreError> {
        self.mutate(|t| t.set_status(id, status)).await
    }

    async fn transition_status(
        &self,
        id: &ProposalId,
        transition: &StatusTransition,
    ) -> Result<TransitionResult, StoreError> {
        self.mutate(|t| t.transition(id, transition)).await
    }
}

#[async_trait]
impl SettingsStore for JsonFileConsensusStore {
    async fn load_settings(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<ConsensusSettings>, StoreError> {
        self.read(|t| t.settings(session_id)).await
    }

    async fn save_settings(
        &self,
        session_id: &SessionId,
        settings: &ConsensusSettings,
    ) -> Result<(), StoreError> {
        self.mutate(|t| t.save_settings(session_id, settings)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use consensus_domain::{ProposalDraft, VoteChoice, VoterType};
    use tempfile::TempDir;

    fn proposal() -> MovementProposal {
        let draft = ProposalDraft::new("s-1", "pc-1", "harbor").with_reason("Restock supplies");
        MovementProposal::from_draft(draft, ProposalId::generate(), Utc::now(), Duration::seconds(60))
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state").join("consensus.json");
        let p = proposal();

        {
            let store = JsonFileConsensusStore::open(&path).await.unwrap();
            let vote = Vote::new(p.id.clone(), "pc-1", VoterType::Human, VoteChoice::Approve);
            store.create_proposal(p.clone(), vote).await.unwrap();
            let transition = StatusTransition::new(ProposalStatus::Pending, ProposalStatus::Voting);
            store.transition_status(&p.id, &transition).await.unwrap();
            store
                .save_settings(&"s-1".into(), &ConsensusSettings::default())
                .await
                .unwrap();
        }

        let store = JsonFileConsensusStore::open(&path).await.unwrap();
        let active = store.get_active_proposal(&"s-1".into()).await.unwrap().unwrap();
        assert_eq!(active.id, p.id);
        assert_eq!(active.status, ProposalStatus::Voting);
        assert_eq!(active.reason, "Restock supplies");
        assert_eq!(store.list_votes(&p.id).await.unwrap().len(), 1);
        assert!(store.load_settings(&"s-1".into()).await.unwrap().is_some());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_rejected_change_is_not_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("consensus.json");
        let store = JsonFileConsensusStore::open(&path).await.unwrap();

        let result = store
            .set_status(&ProposalId::generate(), ProposalStatus::Failed)
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("consensus.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        assert!(matches!(
            JsonFileConsensusStore::open(&path).await,
            Err(StoreError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("consensus.json");
        tokio::fs::write(&path, "").await.unwrap();

        let store = JsonFileConsensusStore::open(&path).await.unwrap();
        assert!(store.get_active_proposal(&"s-1".into()).await.unwrap().is_none());
    }
}
