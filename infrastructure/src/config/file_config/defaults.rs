//! Session settings defaults from TOML (`[defaults]` section)
//!
//! Used when a session's consensus settings are created lazily.

use consensus_domain::{ConfigIssue, ConfigIssueCode, ConsensusSettings, VotingSystem};
use serde::{Deserialize, Serialize};

/// Raw consensus settings defaults from TOML
///
/// # Example
///
/// ```toml
/// [defaults]
/// voting_system = "majority"        # or "unanimous"
/// voting_time_limit = 300           # seconds
/// allow_abstention = true
/// turn_based_movement_cost = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDefaultsConfig {
    pub voting_system: String,
    pub required_approval_percentage: u8,
    pub voting_time_limit: u64,
    pub allow_abstention: bool,
    pub leader_can_override: bool,
    pub leader_vote_weight: u32,
    pub auto_approve_if_no_response: bool,
    pub auto_approve_time_limit: u64,
    pub turn_based_movement_cost: bool,
}

impl Default for FileDefaultsConfig {
    fn default() -> Self {
        let settings = ConsensusSettings::default();
        Self {
            voting_system: settings.voting_system.as_str().to_string(),
            required_approval_percentage: settings.required_approval_percentage,
            voting_time_limit: settings.voting_time_limit,
            allow_abstention: settings.allow_abstention,
            leader_can_override: settings.leader_can_override,
            leader_vote_weight: settings.leader_vote_weight,
            auto_approve_if_no_response: settings.auto_approve_if_no_response,
            auto_approve_time_limit: settings.auto_approve_time_limit,
            turn_based_movement_cost: settings.turn_based_movement_cost,
        }
    }
}

impl FileDefaultsConfig {
    /// Parse voting_system string into VotingSystem enum, returning warnings on failure.
    pub fn parse_voting_system(&self) -> (VotingSystem, Vec<ConfigIssue>) {
        match self.voting_system.parse::<VotingSystem>() {
            Ok(system) => (system, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "defaults.voting_system".to_string(),
                        value: self.voting_system.clone(),
                        valid_values: vec!["majority".to_string(), "unanimous".to_string()],
                    },
                    format!(
                        "defaults.voting_system: unknown value '{}', falling back to 'majority'",
                        self.voting_system
                    ),
                );
                (VotingSystem::default(), vec![issue])
            }
        }
    }

    /// Build session settings, returning warnings for unusable values.
    pub fn to_settings(&self) -> (ConsensusSettings, Vec<ConfigIssue>) {
        let (voting_system, mut issues) = self.parse_voting_system();

        if self.required_approval_percentage > 100 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "defaults.required_approval_percentage".to_string(),
                },
                format!(
                    "defaults.required_approval_percentage: {} exceeds 100",
                    self.required_approval_percentage
                ),
            ));
        }
        if self.voting_time_limit == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "defaults.voting_time_limit".to_string(),
                },
                "defaults.voting_time_limit: 0 makes every voting deadline the creation time",
            ));
        }

        let settings = ConsensusSettings {
            voting_system,
            required_approval_percentage: self.required_approval_percentage,
            voting_time_limit: self.voting_time_limit,
            allow_abstention: self.allow_abstention,
            leader_can_override: self.leader_can_override,
            leader_vote_weight: self.leader_vote_weight,
            auto_approve_if_no_response: self.auto_approve_if_no_response,
            auto_approve_time_limit: self.auto_approve_time_limit,
            turn_based_movement_cost: self.turn_based_movement_cost,
        };
        (settings, issues)
    }
}
