//! External collaborator ports
//!
//! The party roster, character data, location graph and campaign clock are
//! owned by other services. The engine only sees these interfaces.

use async_trait::async_trait;
use consensus_domain::{
    CampaignId, CharacterId, CharacterProfile, MoveRequest, PartyMember, SessionId, TimeAdvance,
};
use thiserror::Error;

/// Errors reported by an external collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// Session roster
#[async_trait]
pub trait RosterProvider: Send + Sync {
    /// Every party member of the session, in roster order
    async fn party_members(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<PartyMember>, CollaboratorError>;

    /// Campaign whose clock the session runs on
    async fn campaign_id(&self, session_id: &SessionId) -> Result<CampaignId, CollaboratorError>;
}

/// Read-only character narration data
#[async_trait]
pub trait CharacterDataProvider: Send + Sync {
    async fn character_profile(
        &self,
        character_id: &CharacterId,
    ) -> Result<CharacterProfile, CollaboratorError>;
}

/// Location graph and physical movement
#[async_trait]
pub trait LocationService: Send + Sync {
    async fn move_character(&self, request: &MoveRequest) -> Result<(), CollaboratorError>;
}

/// Turn / calendar progression
#[async_trait]
pub trait TimeService: Send + Sync {
    /// Advance the campaign clock by one period
    async fn advance_time(&self, campaign_id: &CampaignId) -> Result<TimeAdvance, CollaboratorError>;
}
