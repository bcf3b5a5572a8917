//! Vote types for movement proposals

use crate::core::error::DomainError;
use crate::core::ids::{CharacterId, ProposalId, VoteId};
use crate::party::VoterType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A voter's choice on a proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    Approve,
    Reject,
    Abstain,
}

impl VoteChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteChoice::Approve => "approve",
            VoteChoice::Reject => "reject",
            VoteChoice::Abstain => "abstain",
        }
    }
}

impl std::fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VoteChoice {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "approve" | "yes" => Ok(VoteChoice::Approve),
            "reject" | "no" => Ok(VoteChoice::Reject),
            "abstain" => Ok(VoteChoice::Abstain),
            other => Err(DomainError::unknown("vote choice", other)),
        }
    }
}

/// A single vote on a movement proposal
///
/// At most one vote per `(proposal_id, voter_id)` is effective; a later
/// vote from the same voter replaces the earlier one.
///
/// # Example
///
/// ```
/// use consensus_domain::{Vote, VoteChoice, VoterType};
///
/// let vote = Vote::new("p-1", "pc-2", VoterType::Human, VoteChoice::Approve)
///     .with_reason("The road is safe this time of year");
/// assert_eq!(vote.choice, VoteChoice::Approve);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: VoteId,
    pub proposal_id: ProposalId,
    pub voter_id: CharacterId,
    pub voter_type: VoterType,
    pub choice: VoteChoice,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

impl Vote {
    pub fn new(
        proposal_id: impl Into<ProposalId>,
        voter_id: impl Into<CharacterId>,
        voter_type: VoterType,
        choice: VoteChoice,
    ) -> Self {
        Self {
            id: VoteId::generate(),
            proposal_id: proposal_id.into(),
            voter_id: voter_id.into(),
            voter_type,
            choice,
            reason: String::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn is_approval(&self) -> bool {
        self.choice == VoteChoice::Approve
    }
}
