//! Consensus settings registry
//!
//! Per-session quorum parameters. Defaults are created and persisted on
//! first read; updates merge a patch into the stored value.

use crate::error::ConsensusError;
use crate::ports::settings_store::SettingsStore;
use consensus_domain::{ConsensusSettings, ConsensusSettingsPatch, SessionId};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub struct ConsensusSettingsRegistry {
    store: Arc<dyn SettingsStore>,
    defaults: ConsensusSettings,
    /// Serializes read-modify-write on stored settings
    write_lock: Mutex<()>,
}

impl ConsensusSettingsRegistry {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self::with_defaults(store, ConsensusSettings::default())
    }

    /// Use `defaults` for sessions without stored settings
    pub fn with_defaults(store: Arc<dyn SettingsStore>, defaults: ConsensusSettings) -> Self {
        Self {
            store,
            defaults,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn get(&self, session_id: &SessionId) -> Result<ConsensusSettings, ConsensusError> {
        if let Some(settings) = self.store.load_settings(session_id).await? {
            return Ok(settings);
        }

        let _guard = self.write_lock.lock().await;
        if let Some(settings) = self.store.load_settings(session_id).await? {
            return Ok(settings);
        }
        debug!("Creating default consensus settings for session {}", session_id);
        self.store.save_settings(session_id, &self.defaults).await?;
        Ok(self.defaults.clone())
    }

    pub async fn update(
        &self,
        session_id: &SessionId,
        patch: &ConsensusSettingsPatch,
    ) -> Result<ConsensusSettings, ConsensusError> {
        let _guard = self.write_lock.lock().await;
        let current = self
            .store
            .load_settings(session_id)
            .await?
            .unwrap_or_else(|| self.defaults.clone());
        if patch.is_empty() {
            return Ok(current);
        }

        let updated = current.merged(patch);
        self.store.save_settings(session_id, &updated).await?;
        info!(
            "Consensus settings updated for session {} ({})",
            session_id, updated.voting_system
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::MemoryStore;
    use consensus_domain::VotingSystem;

    #[tokio::test]
    async fn test_get_persists_defaults_lazily() {
        let store = Arc::new(MemoryStore::default());
        let registry = ConsensusSettingsRegistry::new(store.clone());
        let session = SessionId::new("s-1");

        assert!(store.load_settings(&session).await.unwrap().is_none());
        let settings = registry.get(&session).await.unwrap();
        assert_eq!(settings, ConsensusSettings::default());
        assert_eq!(store.load_settings(&session).await.unwrap(), Some(settings));
    }

    #[tokio::test]
    async fn test_update_merges_patch() {
        let store = Arc::new(MemoryStore::default());
        let registry = ConsensusSettingsRegistry::new(store);
        let session = SessionId::new("s-1");

        let patch = ConsensusSettingsPatch {
            voting_system: Some(VotingSystem::Unanimous),
            ..Default::default()
        };
        let updated = registry.update(&session, &patch).await.unwrap();
        assert_eq!(updated.voting_system, VotingSystem::Unanimous);
        assert!(updated.allow_abstention);

        let patch = ConsensusSettingsPatch {
            allow_abstention: Some(false),
            ..Default::default()
        };
        let updated = registry.update(&session, &patch).await.unwrap();
        assert_eq!(updated.voting_system, VotingSystem::Unanimous);
        assert!(!updated.allow_abstention);
        assert_eq!(registry.get(&session).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_custom_defaults() {
        let defaults = ConsensusSettings {
            turn_based_movement_cost: false,
            ..Default::default()
        };
        let registry =
            ConsensusSettingsRegistry::with_defaults(Arc::new(MemoryStore::default()), defaults);
        let settings = registry.get(&SessionId::new("s-2")).await.unwrap();
        assert!(!settings.turn_based_movement_cost);
    }

    #[tokio::test]
    async fn test_settings_are_per_session() {
        let registry = ConsensusSettingsRegistry::new(Arc::new(MemoryStore::default()));
        let patch = ConsensusSettingsPatch {
            voting_time_limit: Some(30),
            ..Default::default()
        };
        registry
            .update(&SessionId::new("a"), &patch)
            .await
            .unwrap();

        let other = registry.get(&SessionId::new("b")).await.unwrap();
        assert_eq!(other.voting_time_limit, 300);
    }
}
