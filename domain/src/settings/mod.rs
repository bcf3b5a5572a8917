//! Per-session consensus settings
//!
//! Settings are owned by the session and change only through an explicit
//! update. Updates carry a [`ConsensusSettingsPatch`] whose `Some` fields
//! overwrite the stored values.

use crate::quorum::VotingSystem;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Upper bound applied when turning `voting_time_limit` into a deadline
const MAX_VOTING_WINDOW_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Quorum parameters of one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsensusSettings {
    pub voting_system: VotingSystem,
    /// Stored for callers; the decision policy derives thresholds from
    /// `voting_system` alone
    pub required_approval_percentage: u8,
    /// Seconds a proposal stays open, used to default `votingDeadline`
    pub voting_time_limit: u64,
    pub allow_abstention: bool,
    pub leader_can_override: bool,
    pub leader_vote_weight: u32,
    pub auto_approve_if_no_response: bool,
    /// Seconds
    pub auto_approve_time_limit: u64,
    /// Charge action points to the campaign clock on a completed move
    pub turn_based_movement_cost: bool,
}

impl Default for ConsensusSettings {
    fn default() -> Self {
        Self {
            voting_system: VotingSystem::Majority,
            required_approval_percentage: 50,
            voting_time_limit: 300,
            allow_abstention: true,
            leader_can_override: false,
            leader_vote_weight: 1,
            auto_approve_if_no_response: false,
            auto_approve_time_limit: 60,
            turn_based_movement_cost: true,
        }
    }
}

impl ConsensusSettings {
    pub fn voting_window(&self) -> Duration {
        Duration::seconds(self.voting_time_limit.min(MAX_VOTING_WINDOW_SECS) as i64)
    }

    /// Return a copy with every `Some` field of `patch` applied
    pub fn merged(&self, patch: &ConsensusSettingsPatch) -> Self {
        Self {
            voting_system: patch.voting_system.unwrap_or(self.voting_system),
            required_approval_percentage: patch
                .required_approval_percentage
                .unwrap_or(self.required_approval_percentage),
            voting_time_limit: patch.voting_time_limit.unwrap_or(self.voting_time_limit),
            allow_abstention: patch.allow_abstention.unwrap_or(self.allow_abstention),
            leader_can_override: patch.leader_can_override.unwrap_or(self.leader_can_override),
            leader_vote_weight: patch.leader_vote_weight.unwrap_or(self.leader_vote_weight),
            auto_approve_if_no_response: patch
                .auto_approve_if_no_response
                .unwrap_or(self.auto_approve_if_no_response),
            auto_approve_time_limit: patch
                .auto_approve_time_limit
                .unwrap_or(self.auto_approve_time_limit),
            turn_based_movement_cost: patch
                .turn_based_movement_cost
                .unwrap_or(self.turn_based_movement_cost),
        }
    }
}

/// Partial settings update
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsensusSettingsPatch {
    pub voting_system: Option<VotingSystem>,
    pub required_approval_percentage: Option<u8>,
    pub voting_time_limit: Option<u64>,
    pub allow_abstention: Option<bool>,
    pub leader_can_override: Option<bool>,
    pub leader_vote_weight: Option<u32>,
    pub auto_approve_if_no_response: Option<bool>,
    pub auto_approve_time_limit: Option<u64>,
    pub turn_based_movement_cost: Option<bool>,
}

impl ConsensusSettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
