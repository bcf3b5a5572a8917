//! Movement execution value objects

use crate::core::ids::{CharacterId, LocationId, ProposalId};
use crate::proposal::MovementMethod;
use serde::{Deserialize, Serialize};

/// One relocation handed to the location service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub character_id: CharacterId,
    pub to_location_id: LocationId,
    pub method: MovementMethod,
    /// Minutes
    pub estimated_duration: u32,
}

/// Per-member result of a party move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberMoveResult {
    pub character_id: CharacterId,
    pub success: bool,
    pub error: Option<String>,
}

/// Reply of the time service to one advance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeAdvance {
    pub new_period: String,
    pub new_day: Option<u32>,
    pub message: String,
}

/// Result of a fully successful party move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementOutcome {
    pub proposal_id: ProposalId,
    pub new_location_id: LocationId,
    pub members_moved: usize,
    /// Turns actually charged; lower than the action point cost only if the
    /// time service failed part way
    pub turns_advanced: u32,
    pub time_updates: Vec<TimeAdvance>,
}

/// Aggregate of per-member move results
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MoveTally {
    pub results: Vec<MemberMoveResult>,
}

impl MoveTally {
    pub fn push(&mut self, result: MemberMoveResult) {
        self.results.push(result);
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }

    pub fn failed_members(&self) -> Vec<CharacterId> {
        self.results
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.character_id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, success: bool) -> MemberMoveResult {
        MemberMoveResult {
            character_id: CharacterId::new(id),
            success,
            error: (!success).then(|| "blocked".to_string()),
        }
    }

    #[test]
    fn test_tally_ratio() {
        let mut tally = MoveTally::default();
        tally.push(result("a", true));
        tally.push(result("b", false));
        tally.push(result("c", true));

        assert_eq!(tally.total(), 3);
        assert_eq!(tally.succeeded(), 2);
        assert!(!tally.all_succeeded());
        assert_eq!(tally.failed_members(), vec![CharacterId::new("b")]);
    }

    #[test]
    fn test_empty_tally_counts_as_success() {
        assert!(MoveTally::default().all_succeeded());
    }
}
