//! Progress notification port
//!
//! Defines the interface for reporting voting progress while AI voters
//! deliberate in the background.

use consensus_domain::{MovementProposal, ProposalId, ProposalStatus, Vote, VotingSummary};

/// Callback for progress updates during a vote
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait VotingProgressNotifier: Send + Sync {
    /// Called once a proposal and its proposer vote are stored
    fn on_proposal_created(&self, _proposal: &MovementProposal) {}

    /// Called after a vote is stored and the tally recomputed
    fn on_vote_recorded(&self, vote: &Vote, summary: &VotingSummary);

    /// Called after a status transition is committed
    fn on_status_changed(&self, proposal_id: &ProposalId, from: ProposalStatus, to: ProposalStatus);

    /// Called when the AI voter batch starts deliberating
    fn on_ai_voting_started(&self, _proposal_id: &ProposalId, _voters: usize) {}

    /// Called when the AI voter batch is done (or stopped early)
    fn on_ai_voting_finished(&self, _proposal_id: &ProposalId, _votes_cast: usize) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl VotingProgressNotifier for NoProgress {
    fn on_vote_recorded(&self, _vote: &Vote, _summary: &VotingSummary) {}
    fn on_status_changed(
        &self,
        _proposal_id: &ProposalId,
        _from: ProposalStatus,
        _to: ProposalStatus,
    ) {
    }
}
