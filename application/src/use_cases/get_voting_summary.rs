//! Get Voting Summary use case
//!
//! Read-only: the summary is recomputed from the stored votes on every call
//! and never changes the proposal's status.

use crate::error::ConsensusError;
use crate::use_cases::shared::VotingCore;
use consensus_domain::{ProposalId, VotingSummary};
use std::sync::Arc;

pub struct GetVotingSummaryUseCase {
    core: Arc<VotingCore>,
}

impl GetVotingSummaryUseCase {
    pub(crate) fn new(core: Arc<VotingCore>) -> Self {
        Self { core }
    }

    pub async fn execute(&self, proposal_id: &ProposalId) -> Result<VotingSummary, ConsensusError> {
        let proposal = self.core.load_proposal(proposal_id).await?;
        self.core.summary(&proposal).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{Fixture, party_of};
    use consensus_domain::{ProposalStatus, VoteChoice, VoterType};

    #[tokio::test]
    async fn test_summary_is_idempotent() {
        let fixture = Fixture::new(party_of(4).with_npc("npc-1"));
        let proposal = fixture.voting_proposal("pc-1").await;
        let use_case = GetVotingSummaryUseCase::new(Arc::clone(&fixture.core));

        let first = use_case.execute(&proposal.id).await.unwrap();
        let second = use_case.execute(&proposal.id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.total_eligible_voters, 4);
        assert_eq!(first.votes.approve, 1);
        assert_eq!(first.status, ProposalStatus::Voting);
        let proposer = first
            .voter_details
            .iter()
            .find(|d| d.is_proposer)
            .unwrap();
        assert_eq!(proposer.voter_id.as_str(), "pc-1");
        assert_eq!(proposer.voter_type, VoterType::Human);
        assert_eq!(proposer.choice, Some(VoteChoice::Approve));
    }

    #[tokio::test]
    async fn test_summary_of_missing_proposal() {
        let fixture = Fixture::new(party_of(2));
        let use_case = GetVotingSummaryUseCase::new(Arc::clone(&fixture.core));

        let err = use_case
            .execute(&ProposalId::new("ghost"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "proposal_not_found");
    }
}
