//! Consensus decision policy
//!
//! Evaluated after every vote. A proposal resolves as soon as its outcome is
//! certain, without waiting for the remaining voters.

use super::summary::VotingSummary;
use crate::proposal::ProposalStatus;
use serde::{Deserialize, Serialize};

/// Why a proposal was rejected before or after everyone voted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Every eligible voter voted and the approvals fell short
    AllVotedWithoutConsensus,
    /// More than half of the eligible voters rejected
    MajorityRejected,
    /// Even if every remaining voter approved, the threshold is out of reach
    ApprovalUnreachable,
}

impl RejectionReason {
    pub fn description(&self) -> &'static str {
        match self {
            RejectionReason::AllVotedWithoutConsensus => "all voters responded without consensus",
            RejectionReason::MajorityRejected => "a majority rejected the proposal",
            RejectionReason::ApprovalUnreachable => "required approvals can no longer be reached",
        }
    }
}

/// Outcome of evaluating a summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsensusOutcome {
    /// No decision yet
    Voting,
    /// Consensus reached: approved
    Approved,
    /// Consensus reached: rejected
    Rejected(RejectionReason),
}

impl ConsensusOutcome {
    /// Decide the outcome of a tally
    ///
    /// 1. approve once `approve >= required`
    /// 2. reject when everyone voted, when `reject > floor(total / 2)`, or
    ///    when `approve + remaining < required`
    /// 3. otherwise keep voting
    ///
    /// # Example
    ///
    /// ```
    /// use consensus_domain::quorum::{ConsensusOutcome, VotingSummary};
    /// # fn check(summary: &VotingSummary) {
    /// let outcome = ConsensusOutcome::evaluate(summary);
    /// if outcome.is_approved() {
    ///     // hand off to execution
    /// }
    /// # }
    /// ```
    pub fn evaluate(summary: &VotingSummary) -> Self {
        let total = summary.total_eligible_voters;
        let approve = summary.votes.approve;
        let reject = summary.votes.reject;
        let required = summary.required_approvals;
        let remaining = summary.remaining_voters();

        if summary.consensus_reached {
            return ConsensusOutcome::Approved;
        }

        if summary.all_voted() {
            return ConsensusOutcome::Rejected(RejectionReason::AllVotedWithoutConsensus);
        }

        if reject > total / 2 {
            return ConsensusOutcome::Rejected(RejectionReason::MajorityRejected);
        }

        if approve + remaining < required {
            return ConsensusOutcome::Rejected(RejectionReason::ApprovalUnreachable);
        }

        ConsensusOutcome::Voting
    }

    /// Check if the outcome is approved
    pub fn is_approved(&self) -> bool {
        matches!(self, ConsensusOutcome::Approved)
    }

    /// Check if the outcome is rejected
    pub fn is_rejected(&self) -> bool {
        matches!(self, ConsensusOutcome::Rejected(_))
    }

    /// Check if voting continues
    pub fn is_voting(&self) -> bool {
        matches!(self, ConsensusOutcome::Voting)
    }

    /// Proposal status this outcome maps to
    pub fn status(&self) -> ProposalStatus {
        match self {
            ConsensusOutcome::Voting => ProposalStatus::Voting,
            ConsensusOutcome::Approved => ProposalStatus::Approved,
            ConsensusOutcome::Rejected(_) => ProposalStatus::Rejected,
        }
    }
}

impl std::fmt::Display for ConsensusOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsensusOutcome::Voting => write!(f, "Voting"),
            ConsensusOutcome::Approved => write!(f, "Approved"),
            ConsensusOutcome::Rejected(reason) => write!(f, "Rejected ({})", reason.description()),
        }
    }
}
