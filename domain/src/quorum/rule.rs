//! Quorum rules for party consensus
//!
//! This module defines how many approvals a proposal needs to pass.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Rule for determining party consensus
///
/// - `Majority`: at least half of the eligible voters must approve (default)
/// - `Unanimous`: every eligible voter must approve
///
/// # Example
///
/// ```
/// use consensus_domain::quorum::VotingSystem;
///
/// let rule = VotingSystem::Majority;
/// assert_eq!(rule.required_approvals(4), 2);
/// assert_eq!(rule.required_approvals(5), 3);
///
/// let strict = VotingSystem::Unanimous;
/// assert_eq!(strict.required_approvals(4), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VotingSystem {
    /// ceil(n / 2) approvals
    #[default]
    Majority,

    /// n approvals
    Unanimous,
}

impl VotingSystem {
    /// Approvals needed for `total_eligible` voters
    pub fn required_approvals(&self, total_eligible: usize) -> usize {
        match self {
            VotingSystem::Majority => total_eligible.div_ceil(2),
            VotingSystem::Unanimous => total_eligible,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VotingSystem::Majority => "majority",
            VotingSystem::Unanimous => "unanimous",
        }
    }

    /// Get a human-readable description of this rule
    pub fn description(&self) -> &'static str {
        match self {
            VotingSystem::Majority => "majority (at least half approve)",
            VotingSystem::Unanimous => "unanimous (all must approve)",
        }
    }
}

impl std::fmt::Display for VotingSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for VotingSystem {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "majority" => Ok(VotingSystem::Majority),
            "unanimous" => Ok(VotingSystem::Unanimous),
            other => Err(DomainError::unknown("voting system", other)),
        }
    }
}
