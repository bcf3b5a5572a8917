//! Console output formatter for proposals, tallies and movement results

use colored::{ColoredString, Colorize};
use consensus_application::{ApiError, ApiResponse};
use consensus_domain::{
    ConfigIssue, ConsensusSettings, ConsensusType, MovementOutcome, MovementProposal,
    ProposalStatus, Severity, VoteChoice, VotingSummary,
};
use serde::Serialize;

/// Formats engine results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    pub fn format_proposal(proposal: &MovementProposal) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Movement Proposal"));
        output.push('\n');
        output.push_str(&format!(
            "{} {} proposes travelling to {}\n",
            "Proposal:".cyan().bold(),
            proposal.proposer_id.as_str().bold(),
            proposal.target_location_id.as_str().yellow().bold()
        ));
        if !proposal.reason.is_empty() {
            output.push_str(&format!("{} {}\n", "Reason:".cyan().bold(), proposal.reason));
        }
        output.push_str(&format!(
            "{} {} / urgency {} / difficulty {}\n",
            "Route:".cyan().bold(),
            proposal.movement_method,
            proposal.urgency,
            proposal.difficulty
        ));
        output.push_str(&format!(
            "{} {} min, {} action point(s)\n",
            "Estimate:".cyan().bold(),
            proposal.estimated_time,
            proposal.estimated_cost.action_points
        ));
        if !proposal.tags.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Tags:".cyan().bold(),
                proposal.tags.join(", ")
            ));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Voting closes:".dimmed(),
            proposal.voting_deadline.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output
    }

    pub fn format_summary(summary: &VotingSummary) -> String {
        let mut output = String::new();

        output.push_str(&Self::section_header("Voting Summary"));
        output.push_str(&format!(
            "{} {}  {}\n",
            "Status:".cyan().bold(),
            Self::status(summary.status),
            summary.vote_bar()
        ));
        output.push_str(&format!(
            "{} {} (needs {} of {})\n",
            "System:".cyan().bold(),
            summary.voting_system,
            summary.required_approvals,
            summary.total_eligible_voters
        ));
        output.push_str(&format!(
            "{} {} approve, {} reject, {} abstain, {} waiting\n\n",
            "Votes:".cyan().bold(),
            summary.votes.approve.to_string().green(),
            summary.votes.reject.to_string().red(),
            summary.votes.abstain,
            summary.remaining_voters()
        ));

        for detail in &summary.voter_details {
            let choice = match detail.choice {
                Some(choice) => Self::choice(choice),
                None => "waiting".dimmed(),
            };
            let mut line = format!("  {:<12} {:<8}", detail.voter_name, choice);
            if detail.is_proposer {
                line.push_str(&format!(" {}", "(proposer)".dimmed()));
            }
            line.push_str(&format!(" {}", format!("[{}]", detail.voter_type).dimmed()));
            if let Some(reason) = &detail.reason {
                line.push_str(&format!("\n  {:<12} {}", "", reason.italic()));
            }
            output.push_str(&line);
            output.push('\n');
        }

        if summary.consensus_reached {
            let kind = match summary.consensus_type {
                ConsensusType::Unanimous => "unanimous",
                _ => "majority",
            };
            output.push_str(&format!(
                "\n{} {}\n",
                "Consensus reached:".green().bold(),
                kind
            ));
        }

        output
    }

    pub fn format_outcome(outcome: &MovementOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::section_header("Movement"));
        output.push_str(&format!(
            "{} {} member(s) arrived at {}\n",
            "v".green(),
            outcome.members_moved,
            outcome.new_location_id.as_str().yellow().bold()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Turns advanced:".cyan().bold(),
            outcome.turns_advanced
        ));
        for update in &outcome.time_updates {
            output.push_str(&format!("  {} {}\n", "->".cyan(), update.message));
        }
        output.push_str(&Self::footer());

        output
    }

    pub fn format_settings(session: &str, settings: &ConsensusSettings) -> String {
        let mut output = String::new();

        output.push_str(&Self::section_header(&format!("Consensus Settings ({session})")));
        let rows = [
            ("voting system", settings.voting_system.to_string()),
            (
                "required approval %",
                settings.required_approval_percentage.to_string(),
            ),
            ("voting time limit", format!("{}s", settings.voting_time_limit)),
            ("allow abstention", settings.allow_abstention.to_string()),
            ("leader can override", settings.leader_can_override.to_string()),
            ("leader vote weight", settings.leader_vote_weight.to_string()),
            (
                "auto approve if no response",
                settings.auto_approve_if_no_response.to_string(),
            ),
            (
                "auto approve time limit",
                format!("{}s", settings.auto_approve_time_limit),
            ),
            (
                "turn-based movement cost",
                settings.turn_based_movement_cost.to_string(),
            ),
        ];
        for (name, value) in rows {
            output.push_str(&format!("  {:<28} {}\n", name.dimmed(), value));
        }

        output
    }

    pub fn format_error(error: &ApiError) -> String {
        format!(
            "{} {} {}",
            "Error:".red().bold(),
            error.message,
            format!("({})", error.code).dimmed()
        )
    }

    pub fn format_config_issues(issues: &[ConfigIssue]) -> String {
        issues
            .iter()
            .map(|issue| {
                let label = match issue.severity {
                    Severity::Warning => "warning:".yellow().bold(),
                    Severity::Error => "error:".red().bold(),
                };
                format!("{} {}", label, issue.message)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format a response envelope as JSON
    pub fn format_json<T: Serialize>(response: &ApiResponse<T>) -> String {
        serde_json::to_string_pretty(response).unwrap_or_else(|_| "{}".to_string())
    }

    fn status(status: ProposalStatus) -> ColoredString {
        let text = status.as_str().to_uppercase();
        match status {
            ProposalStatus::Approved | ProposalStatus::Completed => text.green().bold(),
            ProposalStatus::Rejected | ProposalStatus::Failed => text.red().bold(),
            ProposalStatus::Pending | ProposalStatus::Voting | ProposalStatus::Executing => {
                text.yellow().bold()
            }
        }
    }

    fn choice(choice: VoteChoice) -> ColoredString {
        match choice {
            VoteChoice::Approve => "approve".green(),
            VoteChoice::Reject => "reject".red(),
            VoteChoice::Abstain => "abstain".normal(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
