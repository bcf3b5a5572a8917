//! Cast Vote use case

use crate::error::ConsensusError;
use crate::use_cases::shared::{VoteRequest, VotingCore};
use consensus_domain::{CharacterId, ProposalId, VoteChoice, VoterType, VotingSummary};
use std::sync::Arc;

/// Input for the CastVote use case
#[derive(Debug, Clone)]
pub struct CastVoteInput {
    pub proposal_id: ProposalId,
    pub voter_id: CharacterId,
    pub choice: VoteChoice,
    pub reason: String,
}

impl CastVoteInput {
    pub fn new(
        proposal_id: impl Into<ProposalId>,
        voter_id: impl Into<CharacterId>,
        choice: VoteChoice,
    ) -> Self {
        Self {
            proposal_id: proposal_id.into(),
            voter_id: voter_id.into(),
            choice,
            reason: String::new(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }
}

/// Records a human vote; a repeat vote replaces the earlier one
pub struct CastVoteUseCase {
    core: Arc<VotingCore>,
}

impl CastVoteUseCase {
    pub(crate) fn new(core: Arc<VotingCore>) -> Self {
        Self { core }
    }

    pub async fn execute(&self, input: CastVoteInput) -> Result<VotingSummary, ConsensusError> {
        self.core
            .record_vote(VoteRequest {
                proposal_id: input.proposal_id,
                voter_id: input.voter_id,
                choice: input.choice,
                reason: input.reason,
                origin: VoterType::Human,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{Fixture, party_of};
    use consensus_domain::{ConsensusType, ProposalStatus};

    #[tokio::test]
    async fn test_early_approval_without_stragglers() {
        let fixture = Fixture::new(party_of(4));
        let proposal = fixture.voting_proposal("pc-1").await;
        let use_case = CastVoteUseCase::new(Arc::clone(&fixture.core));

        let summary = use_case
            .execute(CastVoteInput::new(proposal.id.clone(), "pc-2", VoteChoice::Approve))
            .await
            .unwrap();

        assert_eq!(summary.required_approvals, 2);
        assert_eq!(summary.remaining_voters(), 2);
        assert!(summary.consensus_reached);
        assert_eq!(summary.consensus_type, ConsensusType::Majority);
        assert_eq!(summary.status, ProposalStatus::Approved);
    }

    #[tokio::test]
    async fn test_early_rejection_when_approval_unreachable() {
        let fixture = Fixture::new(party_of(5));
        let proposal = fixture.voting_proposal("pc-1").await;
        let use_case = CastVoteUseCase::new(Arc::clone(&fixture.core));

        for voter in ["pc-2", "pc-3"] {
            let summary = use_case
                .execute(CastVoteInput::new(proposal.id.clone(), voter, VoteChoice::Reject))
                .await
                .unwrap();
            assert_eq!(summary.status, ProposalStatus::Voting);
        }
        let summary = use_case
            .execute(CastVoteInput::new(proposal.id.clone(), "pc-4", VoteChoice::Reject))
            .await
            .unwrap();

        assert_eq!(summary.votes.approve, 1);
        assert_eq!(summary.votes.reject, 3);
        assert_eq!(summary.remaining_voters(), 1);
        assert_eq!(summary.status, ProposalStatus::Rejected);
    }

    #[tokio::test]
    async fn test_repeat_vote_replaces_earlier() {
        let fixture = Fixture::new(party_of(5));
        let proposal = fixture.voting_proposal("pc-1").await;
        let use_case = CastVoteUseCase::new(Arc::clone(&fixture.core));

        use_case
            .execute(CastVoteInput::new(proposal.id.clone(), "pc-2", VoteChoice::Reject))
            .await
            .unwrap();
        let summary = use_case
            .execute(
                CastVoteInput::new(proposal.id.clone(), "pc-2", VoteChoice::Abstain)
                    .with_reason("Changed my mind"),
            )
            .await
            .unwrap();

        assert_eq!(summary.votes.reject, 0);
        assert_eq!(summary.votes.abstain, 1);
        assert_eq!(summary.voted_count(), 2);
        let pc2: Vec<_> = fixture
            .store
            .votes_of(&proposal.id)
            .into_iter()
            .filter(|v| v.voter_id.as_str() == "pc-2")
            .collect();
        assert_eq!(pc2.len(), 1);
        assert_eq!(pc2[0].reason, "Changed my mind");
    }

    #[tokio::test]
    async fn test_three_pc_scenario() {
        let fixture = Fixture::new(party_of(3));
        let proposal = fixture.voting_proposal("pc-1").await;
        let use_case = CastVoteUseCase::new(Arc::clone(&fixture.core));

        let summary = use_case
            .execute(CastVoteInput::new(proposal.id.clone(), "pc-2", VoteChoice::Approve))
            .await
            .unwrap();

        assert_eq!(summary.total_eligible_voters, 3);
        assert_eq!(summary.votes.approve, 2);
        assert_eq!(summary.status, ProposalStatus::Approved);
        let pc3 = summary
            .voter_details
            .iter()
            .find(|d| d.voter_id.as_str() == "pc-3")
            .unwrap();
        assert!(!pc3.has_voted);
    }

    #[tokio::test]
    async fn test_unknown_proposal() {
        let fixture = Fixture::new(party_of(2));
        let use_case = CastVoteUseCase::new(Arc::clone(&fixture.core));

        let err = use_case
            .execute(CastVoteInput::new("missing", "pc-1", VoteChoice::Approve))
            .await
            .unwrap_err();
        assert_eq!(err, ConsensusError::ProposalNotFound("missing".into()));
    }
}
