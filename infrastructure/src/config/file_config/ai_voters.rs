//! AI voter configuration from TOML (`[ai_voters]` section)

use consensus_application::{AiVoterConfig, DelayRange};
use consensus_domain::{ConfigIssue, ConfigIssueCode, UrgencyBiasedPolicy, clamp_probability};
use serde::{Deserialize, Serialize};

/// Raw AI voter configuration from TOML
///
/// # Example
///
/// ```toml
/// [ai_voters]
/// initial_delay_ms = [3000, 8000]   # thinking time before the first AI vote
/// vote_gap_ms = [1000, 3000]        # pause between consecutive AI voters
/// reject_probability = 0.1
/// low_urgency_abstain_probability = 0.4
/// seed = 42                         # optional, for reproducible runs
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAiVotersConfig {
    pub initial_delay_ms: [u64; 2],
    pub vote_gap_ms: [u64; 2],
    pub reject_probability: f64,
    pub low_urgency_abstain_probability: f64,
    pub seed: Option<u64>,
}

impl Default for FileAiVotersConfig {
    fn default() -> Self {
        let policy = UrgencyBiasedPolicy::default();
        Self {
            initial_delay_ms: [3_000, 8_000],
            vote_gap_ms: [1_000, 3_000],
            reject_probability: policy.reject_probability,
            low_urgency_abstain_probability: policy.low_urgency_abstain_probability,
            seed: None,
        }
    }
}

impl FileAiVotersConfig {
    pub fn to_scheduler_config(&self) -> AiVoterConfig {
        let [delay_min, delay_max] = self.initial_delay_ms;
        let [gap_min, gap_max] = self.vote_gap_ms;
        let config = AiVoterConfig::default()
            .with_initial_delay(DelayRange::from_millis(delay_min, delay_max))
            .with_vote_gap(DelayRange::from_millis(gap_min, gap_max));
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }

    /// Decision policy with probabilities clamped into `0.0..=1.0`
    pub fn to_policy(&self) -> UrgencyBiasedPolicy {
        UrgencyBiasedPolicy {
            reject_probability: clamp_probability(self.reject_probability),
            low_urgency_abstain_probability: clamp_probability(
                self.low_urgency_abstain_probability,
            ),
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        for (field, [min, max]) in [
            ("ai_voters.initial_delay_ms", self.initial_delay_ms),
            ("ai_voters.vote_gap_ms", self.vote_gap_ms),
        ] {
            if min > max {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::InvertedRange {
                        field: field.to_string(),
                    },
                    format!("{field}: [{min}, {max}] is inverted, using {min} ms"),
                ));
            }
        }

        for (field, value) in [
            ("ai_voters.reject_probability", self.reject_probability),
            (
                "ai_voters.low_urgency_abstain_probability",
                self.low_urgency_abstain_probability,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::OutOfRange {
                        field: field.to_string(),
                    },
                    format!("{field}: {value} is outside 0.0..=1.0, clamping"),
                ));
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults_match_scheduler_defaults() {
        let config = FileAiVotersConfig::default().to_scheduler_config();
        let defaults = AiVoterConfig::default();
        assert_eq!(config.initial_delay, defaults.initial_delay);
        assert_eq!(config.vote_gap, defaults.vote_gap);
        assert!(FileAiVotersConfig::default().validate().is_empty());
    }

    #[test]
    fn test_deserialize_section() {
        let toml_str = r#"
[ai_voters]
initial_delay_ms = [0, 0]
vote_gap_ms = [10, 20]
reject_probability = 0.25
seed = 7
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let scheduler = config.ai_voters.to_scheduler_config();
        assert_eq!(scheduler.initial_delay, DelayRange::zero());
        assert_eq!(scheduler.vote_gap.max, Duration::from_millis(20));
        assert_eq!(scheduler.seed, Some(7));
        assert_eq!(config.ai_voters.to_policy().reject_probability, 0.25);
        assert_eq!(config.ai_voters.low_urgency_abstain_probability, 0.4);
    }

    #[test]
    fn test_validate_reports_bad_values() {
        let config = FileAiVotersConfig {
            vote_gap_ms: [3_000, 1_000],
            reject_probability: 1.5,
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| matches!(
            &i.code,
            ConfigIssueCode::InvertedRange { field } if field == "ai_voters.vote_gap_ms"
        )));
        assert_eq!(config.to_policy().reject_probability, 1.0);
    }
}
