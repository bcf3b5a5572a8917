//! Raw TOML configuration data types
//!
//! These structs mirror the config file layout. Each section turns itself
//! into engine types and reports what it could not use as [`ConfigIssue`]s.

mod ai_voters;
mod defaults;
mod simulation;
mod storage;

pub use ai_voters::FileAiVotersConfig;
pub use defaults::FileDefaultsConfig;
pub use simulation::{FileMemberConfig, FileSimulationConfig};
pub use storage::{FileLoggingConfig, FileStorageConfig, StorageBackend};

use consensus_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// AI voter pacing and decision heuristic
    pub ai_voters: FileAiVotersConfig,
    /// Session settings used when a session has none stored yet
    pub defaults: FileDefaultsConfig,
    /// Proposal and settings persistence
    pub storage: FileStorageConfig,
    /// Decision log output
    pub logging: FileLoggingConfig,
    /// Demo party for the bundled binary
    pub simulation: FileSimulationConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Every section falls back to a usable value, so issues never make
    /// the configuration unusable.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.ai_voters.validate());
        issues.extend(self.defaults.to_settings().1);
        issues.extend(self.storage.parse_backend().1);
        issues.extend(self.simulation.parse_members().2);

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_domain::{ConfigIssueCode, Severity, VotingSystem};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[ai_voters]
initial_delay_ms = [100, 200]
vote_gap_ms = [50, 60]
seed = 3

[defaults]
voting_system = "unanimous"
voting_time_limit = 120

[storage]
backend = "json"
path = "state.json"

[logging]
decision_log = "decisions.jsonl"

[simulation]
campaign_id = "westmarch"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ai_voters.seed, Some(3));
        assert_eq!(
            config.defaults.to_settings().0.voting_system,
            VotingSystem::Unanimous
        );
        assert_eq!(config.storage.backend, "json");
        assert!(config.logging.decision_log.is_some());
        assert_eq!(config.simulation.campaign_id, "westmarch");
        assert_eq!(config.simulation.members.len(), 4);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[defaults]
allow_abstention = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(!config.defaults.allow_abstention);
        assert_eq!(config.defaults.voting_system, "majority");
        assert_eq!(config.ai_voters, FileAiVotersConfig::default());
        assert_eq!(config.storage, FileStorageConfig::default());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_every_section() {
        let toml_str = r#"
[ai_voters]
initial_delay_ms = [9000, 1000]

[defaults]
voting_system = "dictator"

[storage]
backend = "postgres"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(|i| i.severity == Severity::Warning));
        assert!(issues.iter().any(|i| matches!(
            &i.code,
            ConfigIssueCode::InvalidEnumValue { field, .. } if field == "defaults.voting_system"
        )));
    }
}
