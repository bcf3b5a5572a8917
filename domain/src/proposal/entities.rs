//! Movement proposal entities

use super::estimate::MovementEstimate;
use crate::core::error::DomainError;
use crate::core::ids::{CharacterId, LocationId, ProposalId, SessionId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Generates `as_str`, `Display` and `FromStr` for a unit-only enum whose
/// wire form is a lowercase word.
macro_rules! wire_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            pub fn all() -> &'static [$name] {
                &[$($name::$variant,)+]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(DomainError::unknown($kind, other)),
                }
            }
        }
    };
}

/// How the party intends to travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MovementMethod {
    #[default]
    Walk,
    Run,
    Ride,
    Fly,
    Teleport,
    Vehicle,
}

wire_enum!(MovementMethod, "movement method", {
    Walk => "walk",
    Run => "run",
    Ride => "ride",
    Fly => "fly",
    Teleport => "teleport",
    Vehicle => "vehicle",
});

/// How pressing the proposer considers the move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Normal,
    High,
}

wire_enum!(Urgency, "urgency", {
    Low => "low",
    Normal => "normal",
    High => "high",
});

/// Expected hardship of the route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Dangerous,
}

wire_enum!(Difficulty, "difficulty", {
    Easy => "easy",
    Normal => "normal",
    Hard => "hard",
    Dangerous => "dangerous",
});

/// Lifecycle status of a proposal
///
/// ```text
/// pending ──▶ voting ──▶ approved ──▶ executing ──▶ completed
///    │          │           │             │
///    └──────────┴───▶ rejected            └──▶ failed
/// ```
///
/// `forceExecute` additionally allows `pending`, `voting` and `rejected`
/// to jump straight to `executing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Pending,
    Voting,
    Approved,
    Rejected,
    Executing,
    Completed,
    Failed,
}

wire_enum!(ProposalStatus, "proposal status", {
    Pending => "pending",
    Voting => "voting",
    Approved => "approved",
    Rejected => "rejected",
    Executing => "executing",
    Completed => "completed",
    Failed => "failed",
});

impl ProposalStatus {
    /// Pending or voting; at most one such proposal exists per session
    pub fn is_active(&self) -> bool {
        matches!(self, ProposalStatus::Pending | ProposalStatus::Voting)
    }

    /// No further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProposalStatus::Completed | ProposalStatus::Failed)
    }

    /// Whether `self -> next` is an edge of the lifecycle graph
    pub fn can_transition_to(&self, next: ProposalStatus) -> bool {
        use ProposalStatus::*;
        matches!(
            (self, next),
            (Pending, Voting)
                | (Pending, Rejected)
                | (Pending, Executing)
                | (Voting, Approved)
                | (Voting, Rejected)
                | (Voting, Executing)
                | (Approved, Executing)
                | (Approved, Rejected)
                | (Rejected, Executing)
                | (Executing, Completed)
                | (Executing, Failed)
        )
    }
}

/// Resource cost charged when the move completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedCost {
    /// Turn units handed to the time service, one advance per point
    pub action_points: u32,
}

/// Caller-supplied request for a new proposal
#[derive(Debug, Clone)]
pub struct ProposalDraft {
    pub session_id: SessionId,
    pub proposer_id: CharacterId,
    pub target_location_id: LocationId,
    pub movement_method: MovementMethod,
    pub reason: String,
    pub urgency: Urgency,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    /// Overrides the method/difficulty estimate when set (minutes)
    pub estimated_time: Option<u32>,
    /// Defaults to creation time plus the session's voting time limit
    pub voting_deadline: Option<DateTime<Utc>>,
}

impl ProposalDraft {
    pub fn new(
        session_id: impl Into<SessionId>,
        proposer_id: impl Into<CharacterId>,
        target_location_id: impl Into<LocationId>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            proposer_id: proposer_id.into(),
            target_location_id: target_location_id.into(),
            movement_method: MovementMethod::default(),
            reason: String::new(),
            urgency: Urgency::default(),
            difficulty: Difficulty::default(),
            tags: Vec::new(),
            estimated_time: None,
            voting_deadline: None,
        }
    }

    pub fn with_method(mut self, method: MovementMethod) -> Self {
        self.movement_method = method;
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_estimated_time(mut self, minutes: u32) -> Self {
        self.estimated_time = Some(minutes);
        self
    }

    pub fn with_voting_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.voting_deadline = Some(deadline);
        self
    }
}

/// A request to move the whole party, subject to vote (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementProposal {
    pub id: ProposalId,
    pub session_id: SessionId,
    pub proposer_id: CharacterId,
    pub target_location_id: LocationId,
    pub movement_method: MovementMethod,
    pub reason: String,
    pub urgency: Urgency,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    /// Minutes of in-world travel
    pub estimated_time: u32,
    pub estimated_cost: EstimatedCost,
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
    pub voting_deadline: DateTime<Utc>,
    /// Set when the proposal was withdrawn rather than voted down
    pub cancellation_reason: Option<String>,
}

impl MovementProposal {
    /// Build a `pending` proposal from a draft
    pub fn from_draft(
        draft: ProposalDraft,
        id: ProposalId,
        created_at: DateTime<Utc>,
        voting_window: Duration,
    ) -> Self {
        let estimate = match draft.estimated_time {
            Some(minutes) => MovementEstimate::from_minutes(draft.movement_method, minutes),
            None => MovementEstimate::for_route(draft.movement_method, draft.difficulty),
        };

        Self {
            id,
            session_id: draft.session_id,
            proposer_id: draft.proposer_id,
            target_location_id: draft.target_location_id,
            movement_method: draft.movement_method,
            reason: draft.reason,
            urgency: draft.urgency,
            difficulty: draft.difficulty,
            tags: draft.tags,
            estimated_time: estimate.minutes,
            estimated_cost: EstimatedCost {
                action_points: estimate.action_points,
            },
            status: ProposalStatus::Pending,
            created_at,
            voting_deadline: draft
                .voting_deadline
                .unwrap_or(created_at + voting_window),
            cancellation_reason: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_statuses() {
        let active: Vec<_> = ProposalStatus::all()
            .iter()
            .filter(|s| s.is_active())
            .collect();
        assert_eq!(active, vec![&ProposalStatus::Pending, &ProposalStatus::Voting]);
    }

    #[test]
    fn test_terminal_statuses_have_no_exits() {
        for from in [ProposalStatus::Completed, ProposalStatus::Failed] {
            assert!(from.is_terminal());
            for to in ProposalStatus::all() {
                assert!(!from.can_transition_to(*to));
            }
        }
    }

    #[test]
    fn test_executing_only_resolves_forward() {
        let exits: Vec<_> = ProposalStatus::all()
            .iter()
            .filter(|to| ProposalStatus::Executing.can_transition_to(**to))
            .collect();
        assert_eq!(
            exits,
            vec![&ProposalStatus::Completed, &ProposalStatus::Failed]
        );
    }

    #[test]
    fn test_voting_cannot_go_back_to_pending() {
        assert!(!ProposalStatus::Voting.can_transition_to(ProposalStatus::Pending));
        assert!(!ProposalStatus::Approved.can_transition_to(ProposalStatus::Voting));
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("Ride".parse::<MovementMethod>().unwrap(), MovementMethod::Ride);
        assert_eq!("high".parse::<Urgency>().unwrap(), Urgency::High);
        assert_eq!(
            "dangerous".parse::<Difficulty>().unwrap(),
            Difficulty::Dangerous
        );
        assert!("crawl".parse::<MovementMethod>().is_err());
    }

    #[test]
    fn test_from_draft_defaults_deadline_and_estimate() {
        let created = Utc::now();
        let draft = ProposalDraft::new("s-1", "pc-1", "tavern").with_method(MovementMethod::Walk);
        let proposal =
            MovementProposal::from_draft(draft, ProposalId::new("p-1"), created, Duration::seconds(300));

        assert_eq!(proposal.status, ProposalStatus::Pending);
        assert_eq!(proposal.voting_deadline, created + Duration::seconds(300));
        assert_eq!(proposal.estimated_time, 60);
        assert_eq!(proposal.estimated_cost.action_points, 1);
    }

    #[test]
    fn test_from_draft_keeps_explicit_values() {
        let created = Utc::now();
        let deadline = created + Duration::minutes(1);
        let draft = ProposalDraft::new("s-1", "pc-1", "keep")
            .with_estimated_time(150)
            .with_voting_deadline(deadline);
        let proposal =
            MovementProposal::from_draft(draft, ProposalId::new("p-1"), created, Duration::seconds(300));

        assert_eq!(proposal.voting_deadline, deadline);
        assert_eq!(proposal.estimated_time, 150);
        assert_eq!(proposal.estimated_cost.action_points, 3);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ProposalStatus::Executing).unwrap(),
            "\"executing\""
        );
    }
}
