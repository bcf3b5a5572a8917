//! Fixed party roster and character sheets

use crate::config::FileSimulationConfig;
use async_trait::async_trait;
use consensus_application::{CharacterDataProvider, CollaboratorError, RosterProvider};
use consensus_domain::{CampaignId, CharacterId, CharacterProfile, ConfigIssue, PartyMember, SessionId};
use std::collections::HashMap;

/// The same party for every session
pub struct StaticRoster {
    campaign_id: CampaignId,
    members: Vec<PartyMember>,
    profiles: HashMap<CharacterId, CharacterProfile>,
}

impl StaticRoster {
    pub fn new(
        campaign_id: impl Into<CampaignId>,
        members: Vec<PartyMember>,
        profiles: Vec<CharacterProfile>,
    ) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            members,
            profiles: profiles
                .into_iter()
                .map(|p| (p.character_id.clone(), p))
                .collect(),
        }
    }

    pub fn from_config(config: &FileSimulationConfig) -> (Self, Vec<ConfigIssue>) {
        let (members, profiles, issues) = config.parse_members();
        (
            Self::new(config.campaign_id.as_str(), members, profiles),
            issues,
        )
    }

    pub fn members(&self) -> &[PartyMember] {
        &self.members
    }
}

#[async_trait]
impl RosterProvider for StaticRoster {
    async fn party_members(
        &self,
        _session_id: &SessionId,
    ) -> Result<Vec<PartyMember>, CollaboratorError> {
        Ok(self.members.clone())
    }

    async fn campaign_id(&self, _session_id: &SessionId) -> Result<CampaignId, CollaboratorError> {
        Ok(self.campaign_id.clone())
    }
}

#[async_trait]
impl CharacterDataProvider for StaticRoster {
    async fn character_profile(
        &self,
        character_id: &CharacterId,
    ) -> Result<CharacterProfile, CollaboratorError> {
        self.profiles
            .get(character_id)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(format!("character {character_id}")))
    }
}
