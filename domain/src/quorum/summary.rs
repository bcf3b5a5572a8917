//! Voting summary calculator
//!
//! The summary is derived data: it is recomputed in full from the stored
//! votes and the current roster on every call and never cached. Repeated
//! calls over the same inputs return identical summaries, and out-of-order
//! vote arrival cannot skew the tally.

use crate::core::ids::{CharacterId, ProposalId};
use crate::party::{PartyMember, VoterType};
use crate::proposal::{MovementProposal, ProposalStatus, Vote, VoteChoice};
use crate::quorum::rule::VotingSystem;
use crate::settings::ConsensusSettings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How consensus was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusType {
    Unanimous,
    Majority,
    None,
}

/// Per-choice vote counts among eligible voters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoteCounts {
    pub approve: usize,
    pub reject: usize,
    pub abstain: usize,
}

impl VoteCounts {
    pub fn total(&self) -> usize {
        self.approve + self.reject + self.abstain
    }

    fn record(&mut self, choice: VoteChoice) {
        match choice {
            VoteChoice::Approve => self.approve += 1,
            VoteChoice::Reject => self.reject += 1,
            VoteChoice::Abstain => self.abstain += 1,
        }
    }
}

/// Voting state of one eligible voter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterDetail {
    pub voter_id: CharacterId,
    pub voter_name: String,
    pub has_voted: bool,
    pub choice: Option<VoteChoice>,
    pub reason: Option<String>,
    pub is_proposer: bool,
    pub voter_type: VoterType,
}

/// Aggregate tally of a proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingSummary {
    pub proposal_id: ProposalId,
    /// Status of the proposal when the summary was taken
    pub status: ProposalStatus,
    pub voting_system: VotingSystem,
    pub total_eligible_voters: usize,
    pub votes: VoteCounts,
    pub voter_details: Vec<VoterDetail>,
    pub required_approvals: usize,
    pub consensus_reached: bool,
    pub consensus_type: ConsensusType,
}

impl VotingSummary {
    /// Eligible voters that have cast a vote (abstentions included)
    pub fn voted_count(&self) -> usize {
        self.votes.total()
    }

    /// Eligible voters yet to vote
    pub fn remaining_voters(&self) -> usize {
        self.total_eligible_voters.saturating_sub(self.voted_count())
    }

    pub fn all_voted(&self) -> bool {
        self.remaining_voters() == 0
    }

    /// Generate a visual vote summary (e.g., "[●●○·]")
    ///
    /// `●` approve, `○` reject, `-` abstain, `·` not yet voted.
    pub fn vote_bar(&self) -> String {
        let mut bar = String::from("[");
        for detail in &self.voter_details {
            bar.push(match detail.choice {
                Some(VoteChoice::Approve) => '●',
                Some(VoteChoice::Reject) => '○',
                Some(VoteChoice::Abstain) => '-',
                None => '·',
            });
        }
        bar.push(']');
        bar
    }
}

/// Compute the summary of `proposal` from its votes and the session roster
///
/// Only PC-type roster members count. Votes from anyone else are ignored.
/// Should the vote list hold several rows for one voter, the latest
/// timestamp wins (ties go to the later row).
pub fn summarize(
    proposal: &MovementProposal,
    votes: &[Vote],
    roster: &[PartyMember],
    settings: &ConsensusSettings,
) -> VotingSummary {
    let mut effective: HashMap<&CharacterId, &Vote> = HashMap::new();
    for vote in votes.iter().filter(|v| v.proposal_id == proposal.id) {
        let is_latest = effective
            .get(&vote.voter_id)
            .is_none_or(|existing| existing.timestamp <= vote.timestamp);
        if is_latest {
            effective.insert(&vote.voter_id, vote);
        }
    }

    let mut counts = VoteCounts::default();
    let mut voter_details = Vec::new();

    for member in crate::party::eligible_voters(roster) {
        let vote = effective.get(&member.character_id);
        if let Some(vote) = vote {
            counts.record(vote.choice);
        }
        voter_details.push(VoterDetail {
            voter_id: member.character_id.clone(),
            voter_name: member.character_name.clone(),
            has_voted: vote.is_some(),
            choice: vote.map(|v| v.choice),
            reason: vote.map(|v| v.reason.clone()).filter(|r| !r.is_empty()),
            is_proposer: member.character_id == proposal.proposer_id,
            voter_type: vote.map(|v| v.voter_type).unwrap_or(member.voter_type()),
        });
    }

    let total_eligible_voters = voter_details.len();
    let voting_system = settings.voting_system;
    let required_approvals = voting_system.required_approvals(total_eligible_voters);
    let consensus_reached = total_eligible_voters > 0 && counts.approve >= required_approvals;
    let consensus_type = if !consensus_reached {
        ConsensusType::None
    } else if counts.approve == total_eligible_voters {
        ConsensusType::Unanimous
    } else {
        ConsensusType::Majority
    };

    VotingSummary {
        proposal_id: proposal.id.clone(),
        status: proposal.status,
        voting_system,
        total_eligible_voters,
        votes: counts,
        voter_details,
        required_approvals,
        consensus_reached,
        consensus_type,
    }
}
