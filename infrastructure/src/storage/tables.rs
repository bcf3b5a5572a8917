//! Table logic shared by the in-memory and JSON file stores
//!
//! Every store operation is a synchronous function over [`ConsensusTables`];
//! the adapters only decide how the tables are guarded and persisted.

use super::records::{ProposalRow, SettingsRow, VoteRow};
use consensus_application::{StatusTransition, StoreError, TransitionResult};
use consensus_domain::{
    ConsensusSettings, MovementProposal, ProposalId, ProposalStatus, SessionId, Vote,
};
use serde::{Deserialize, Serialize};

/// Snapshot of every persisted row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusTables {
    pub movement_proposals: Vec<ProposalRow>,
    pub proposal_votes: Vec<VoteRow>,
    pub consensus_settings: Vec<SettingsRow>,
}

impl ConsensusTables {
    fn proposal_row(&self, id: &ProposalId) -> Option<&ProposalRow> {
        self.movement_proposals
            .iter()
            .find(|row| row.id == id.as_str())
    }

    fn proposal_row_mut(&mut self, id: &ProposalId) -> Result<&mut ProposalRow, StoreError> {
        self.movement_proposals
            .iter_mut()
            .find(|row| row.id == id.as_str())
            .ok_or_else(|| StoreError::NotFound(format!("proposal {id}")))
    }

    fn stored_status(row: &ProposalRow) -> Result<ProposalStatus, StoreError> {
        row.status
            .parse()
            .map_err(|e| StoreError::Serialization(format!("status: {e}")))
    }

    pub fn create_proposal(
        &mut self,
        proposal: &MovementProposal,
        proposer_vote: &Vote,
    ) -> Result<(), StoreError> {
        if let Some(active) = self.active_proposal(&proposal.session_id)? {
            return Err(StoreError::ActiveProposalExists {
                proposal_id: active.id,
            });
        }
        if self.proposal_row(&proposal.id).is_some() {
            return Err(StoreError::Storage(format!(
                "duplicate proposal id {}",
                proposal.id
            )));
        }

        self.movement_proposals
            .push(ProposalRow::from_proposal(proposal)?);
        self.upsert_vote(proposer_vote);
        Ok(())
    }

    pub fn active_proposal(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<MovementProposal>, StoreError> {
        for row in self
            .movement_proposals
            .iter()
            .filter(|row| row.session_id == session_id.as_str())
        {
            if Self::stored_status(row)?.is_active() {
                return row.to_proposal().map(Some);
            }
        }
        Ok(None)
    }

    pub fn proposal(&self, id: &ProposalId) -> Result<Option<MovementProposal>, StoreError> {
        self.proposal_row(id).map(ProposalRow::to_proposal).transpose()
    }

    /// Replace any earlier vote of the same voter, keeping write order
    pub fn upsert_vote(&mut self, vote: &Vote) {
        self.proposal_votes.retain(|row| {
            !(row.proposal_id == vote.proposal_id.as_str() && row.voter_id == vote.voter_id.as_str())
        });
        self.proposal_votes.push(VoteRow::from_vote(vote));
    }

    pub fn votes(&self, proposal_id: &ProposalId) -> Result<Vec<Vote>, StoreError> {
        self.proposal_votes
            .iter()
            .filter(|row| row.proposal_id == proposal_id.as_str())
            .map(VoteRow::to_vote)
            .collect()
    }

    pub fn set_status(&mut self, id: &ProposalId, status: ProposalStatus) -> Result<(), StoreError> {
        self.proposal_row_mut(id)?.status = status.as_str().to_string();
        Ok(())
    }

    pub fn transition(
        &mut self,
        id: &ProposalId,
        transition: &StatusTransition,
    ) -> Result<TransitionResult, StoreError> {
        let row = self.proposal_row_mut(id)?;
        let current = Self::stored_status(row)?;
        if current != transition.expected {
            return Ok(TransitionResult::Conflict(current));
        }

        row.status = transition.next.as_str().to_string();
        if let Some(note) = &transition.note {
            row.cancellation_reason = Some(note.clone());
        }
        Ok(TransitionResult::Applied)
    }

    pub fn settings(&self, session_id: &SessionId) -> Result<Option<ConsensusSettings>, StoreError> {
        self.consensus_settings
            .iter()
            .find(|row| row.session_id == session_id.as_str())
            .map(SettingsRow::to_settings)
            .transpose()
    }

    pub fn save_settings(
        &mut self,
        session_id: &SessionId,
        settings: &ConsensusSettings,
    ) -> Result<(), StoreError> {
        let row = SettingsRow::new(session_id, settings)?;
        match self
            .consensus_settings
            .iter_mut()
            .find(|existing| existing.session_id == row.session_id)
        {
            Some(existing) => *existing = row,
            None => self.consensus_settings.push(row),
        }
        Ok(())
    }
}
