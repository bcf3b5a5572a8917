//! Row shapes of the persisted tables
//!
//! Enums are stored as their lowercase wire words and the nested cost and
//! tag values as embedded JSON text, so a snapshot stays readable and
//! survives enum reordering.

use chrono::{DateTime, Utc};
use consensus_application::StoreError;
use consensus_domain::{
    ConsensusSettings, EstimatedCost, MovementProposal, SessionId, Vote,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

fn parse_column<T>(column: &'static str, value: &str) -> Result<T, StoreError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| StoreError::Serialization(format!("{column}: {e}")))
}

fn to_json_column<T: Serialize>(column: &'static str, value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|e| StoreError::Serialization(format!("{column}: {e}")))
}

fn from_json_column<T: for<'de> Deserialize<'de>>(
    column: &'static str,
    value: &str,
) -> Result<T, StoreError> {
    serde_json::from_str(value).map_err(|e| StoreError::Serialization(format!("{column}: {e}")))
}

/// One row of the `movement_proposals` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalRow {
    pub id: String,
    pub session_id: String,
    pub proposer_id: String,
    pub target_location_id: String,
    pub movement_method: String,
    pub reason: String,
    pub urgency: String,
    pub difficulty: String,
    pub tags_json: String,
    pub estimated_time: u32,
    pub estimated_cost_json: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub voting_deadline: DateTime<Utc>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
}

impl ProposalRow {
    pub fn from_proposal(proposal: &MovementProposal) -> Result<Self, StoreError> {
        Ok(Self {
            id: proposal.id.to_string(),
            session_id: proposal.session_id.to_string(),
            proposer_id: proposal.proposer_id.to_string(),
            target_location_id: proposal.target_location_id.to_string(),
            movement_method: proposal.movement_method.as_str().to_string(),
            reason: proposal.reason.clone(),
            urgency: proposal.urgency.as_str().to_string(),
            difficulty: proposal.difficulty.as_str().to_string(),
            tags_json: to_json_column("tags", &proposal.tags)?,
            estimated_time: proposal.estimated_time,
            estimated_cost_json: to_json_column("estimated_cost", &proposal.estimated_cost)?,
            status: proposal.status.as_str().to_string(),
            created_at: proposal.created_at,
            voting_deadline: proposal.voting_deadline,
            cancellation_reason: proposal.cancellation_reason.clone(),
        })
    }

    pub fn to_proposal(&self) -> Result<MovementProposal, StoreError> {
        let estimated_cost: EstimatedCost =
            from_json_column("estimated_cost", &self.estimated_cost_json)?;
        Ok(MovementProposal {
            id: self.id.as_str().into(),
            session_id: self.session_id.as_str().into(),
            proposer_id: self.proposer_id.as_str().into(),
            target_location_id: self.target_location_id.as_str().into(),
            movement_method: parse_column("movement_method", &self.movement_method)?,
            reason: self.reason.clone(),
            urgency: parse_column("urgency", &self.urgency)?,
            difficulty: parse_column("difficulty", &self.difficulty)?,
            tags: from_json_column("tags", &self.tags_json)?,
            estimated_time: self.estimated_time,
            estimated_cost,
            status: parse_column("status", &self.status)?,
            created_at: self.created_at,
            voting_deadline: self.voting_deadline,
            cancellation_reason: self.cancellation_reason.clone(),
        })
    }
}

/// One row of the `proposal_votes` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteRow {
    pub id: String,
    pub proposal_id: String,
    pub voter_id: String,
    pub voter_type: String,
    pub choice: String,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

impl VoteRow {
    pub fn from_vote(vote: &Vote) -> Self {
        Self {
            id: vote.id.to_string(),
            proposal_id: vote.proposal_id.to_string(),
            voter_id: vote.voter_id.to_string(),
            voter_type: vote.voter_type.as_str().to_string(),
            choice: vote.choice.as_str().to_string(),
            reason: vote.reason.clone(),
            timestamp: vote.timestamp,
        }
    }

    pub fn to_vote(&self) -> Result<Vote, StoreError> {
        Ok(Vote {
            id: self.id.as_str().into(),
            proposal_id: self.proposal_id.as_str().into(),
            voter_id: self.voter_id.as_str().into(),
            voter_type: parse_column("voter_type", &self.voter_type)?,
            choice: parse_column("choice", &self.choice)?,
            reason: self.reason.clone(),
            timestamp: self.timestamp,
        })
    }
}

/// One row of the `consensus_settings` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsRow {
    pub session_id: String,
    pub settings_json: String,
    pub updated_at: DateTime<Utc>,
}

impl SettingsRow {
    pub fn new(session_id: &SessionId, settings: &ConsensusSettings) -> Result<Self, StoreError> {
        Ok(Self {
            session_id: session_id.to_string(),
            settings_json: to_json_column("settings", settings)?,
            updated_at: Utc::now(),
        })
    }

    pub fn to_settings(&self) -> Result<ConsensusSettings, StoreError> {
        from_json_column("settings", &self.settings_json)
    }
}
