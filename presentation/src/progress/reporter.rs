//! Progress reporting while a proposal is being voted on

use colored::Colorize;
use consensus_application::VotingProgressNotifier;
use consensus_domain::{
    MovementProposal, ProposalId, ProposalStatus, Vote, VoteChoice, VotingSummary,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Shows the tally of the current proposal as a progress bar
pub struct VotingProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl VotingProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn tally_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(bar) = guard.as_ref()
        {
            f(bar);
        }
    }
}

impl Default for VotingProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl VotingProgressNotifier for VotingProgressReporter {
    fn on_proposal_created(&self, proposal: &MovementProposal) {
        let bar = ProgressBar::new(0);
        bar.set_style(Self::tally_style());
        bar.set_prefix(format!("Vote: {}", proposal.target_location_id));
        bar.set_message("Waiting for votes...");
        bar.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut guard) = self.bar.lock()
            && let Some(previous) = guard.replace(bar)
        {
            previous.finish_and_clear();
        }
    }

    fn on_vote_recorded(&self, vote: &Vote, summary: &VotingSummary) {
        self.with_bar(|bar| {
            bar.set_length(summary.total_eligible_voters as u64);
            bar.set_position(summary.voted_count() as u64);
            let mark = match vote.choice {
                VoteChoice::Approve => "v".green(),
                VoteChoice::Reject => "x".red(),
                VoteChoice::Abstain => "-".normal(),
            };
            bar.set_message(format!("{} {} {}", summary.vote_bar(), mark, vote.voter_id));
        });
    }

    fn on_status_changed(&self, _proposal_id: &ProposalId, _from: ProposalStatus, to: ProposalStatus) {
        let finished = match to {
            ProposalStatus::Approved => format!("{}", "approved!".green()),
            ProposalStatus::Rejected => format!("{}", "rejected".red()),
            _ => return,
        };
        if let Ok(mut guard) = self.bar.lock()
            && let Some(bar) = guard.take()
        {
            bar.finish_with_message(finished);
        }
    }

    fn on_ai_voting_started(&self, _proposal_id: &ProposalId, voters: usize) {
        self.with_bar(|bar| bar.set_message(format!("{voters} AI voter(s) deliberating...")));
    }

    fn on_ai_voting_finished(&self, _proposal_id: &ProposalId, votes_cast: usize) {
        self.with_bar(|bar| bar.println(format!("  {} AI votes cast: {}", "->".cyan(), votes_cast)));
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl VotingProgressNotifier for SimpleProgress {
    fn on_proposal_created(&self, proposal: &MovementProposal) {
        println!(
            "{} {} proposes {}",
            "->".cyan(),
            proposal.proposer_id,
            proposal.target_location_id.as_str().bold()
        );
    }

    fn on_vote_recorded(&self, vote: &Vote, summary: &VotingSummary) {
        println!(
            "  {} {} votes {} ({}/{})",
            summary.vote_bar(),
            vote.voter_id,
            vote.choice,
            summary.voted_count(),
            summary.total_eligible_voters
        );
    }

    fn on_status_changed(&self, proposal_id: &ProposalId, from: ProposalStatus, to: ProposalStatus) {
        println!("  {} {}: {} -> {}", "*".cyan(), proposal_id, from, to.as_str().bold());
    }

    fn on_ai_voting_started(&self, _proposal_id: &ProposalId, voters: usize) {
        println!("  {} {} AI voter(s) deliberating", "..".dimmed(), voters);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use consensus_domain::{
        ConsensusSettings, PartyMember, ProposalDraft, VoterType, summarize,
    };

    #[test]
    fn test_reporter_lifecycle_without_terminal() {
        let reporter = VotingProgressReporter::new();
        let proposal = MovementProposal::from_draft(
            ProposalDraft::new("s-1", "aria", "harbor"),
            ProposalId::new("p-1"),
            Utc::now(),
            chrono::Duration::seconds(60),
        );
        let roster = vec![PartyMember::player("aria", "Aria"), PartyMember::player("cass", "Cass")];
        let vote = Vote::new("p-1", "aria", VoterType::Human, VoteChoice::Approve);
        let summary = summarize(&proposal, &[vote.clone()], &roster, &ConsensusSettings::default());

        reporter.on_proposal_created(&proposal);
        reporter.on_vote_recorded(&vote, &summary);
        {
            let guard = reporter.bar.lock().unwrap();
            let bar = guard.as_ref().unwrap();
            assert_eq!(bar.length(), Some(2));
            assert_eq!(bar.position(), 1);
        }

        reporter.on_status_changed(&proposal.id, ProposalStatus::Voting, ProposalStatus::Approved);
        assert!(reporter.bar.lock().unwrap().is_none());

        // Late notifications after the bar is gone are ignored
        reporter.on_ai_voting_finished(&proposal.id, 1);
    }
}
