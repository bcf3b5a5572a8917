//! Consensus settings persistence port

use super::proposal_store::StoreError;
use async_trait::async_trait;
use consensus_domain::{ConsensusSettings, SessionId};

/// Per-session settings storage
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load_settings(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<ConsensusSettings>, StoreError>;

    async fn save_settings(
        &self,
        session_id: &SessionId,
        settings: &ConsensusSettings,
    ) -> Result<(), StoreError>;
}
