//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use consensus_domain::{
    CharacterId, ConsensusSettingsPatch, Difficulty, MovementMethod, Urgency, VoteChoice,
    VotingSystem,
};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for party-consensus
#[derive(Parser, Debug)]
#[command(name = "party-consensus")]
#[command(author, version, about = "Party movement consensus - vote on where the party goes next")]
#[command(long_about = r#"
Party Consensus runs a vote among the player characters of a party before
the whole party travels somewhere new.

1. A member proposes a destination; their own approval is recorded
2. Human players vote; AI-controlled characters deliberate and vote on their own
3. Once the outcome is certain the proposal is approved or rejected
4. An approved proposal moves every party member and advances the campaign clock

Configuration files are loaded from (in priority order):
1. PARTY_CONSENSUS_<SECTION>__<KEY>      Environment variables
2. --config <path>                       Explicit config file
3. ./party-consensus.toml                Project-level config
4. ~/.config/party-consensus/config.toml Global config

Example:
  party-consensus travel --proposer aria --to harbor --vote borin=approve
  party-consensus travel --proposer aria --to ruins --difficulty dangerous --execute
  party-consensus settings --voting-system unanimous
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print raw response envelopes as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Propose a destination, collect votes and optionally travel
    Travel(TravelArgs),
    /// Show or change a session's consensus settings
    Settings(SettingsArgs),
}

#[derive(Args, Debug)]
pub struct TravelArgs {
    /// Session to run the vote in
    #[arg(short, long, default_value = "session-1")]
    pub session: String,

    /// Character proposing the move
    #[arg(short, long, value_name = "CHARACTER")]
    pub proposer: String,

    /// Destination location id
    #[arg(long, value_name = "LOCATION")]
    pub to: String,

    /// walk, run, ride, fly, teleport or vehicle
    #[arg(long, default_value = "walk", value_parser = parse_wire::<MovementMethod>)]
    pub method: MovementMethod,

    /// low, normal or high
    #[arg(long, default_value = "normal", value_parser = parse_wire::<Urgency>)]
    pub urgency: Urgency,

    /// easy, normal, hard or dangerous
    #[arg(long, default_value = "normal", value_parser = parse_wire::<Difficulty>)]
    pub difficulty: Difficulty,

    /// Why the party should go
    #[arg(long, default_value = "")]
    pub reason: String,

    /// Travel time in minutes (derived from method and difficulty if omitted)
    #[arg(long, value_name = "MINUTES")]
    pub estimated_time: Option<u32>,

    /// Free-form tag (can be specified multiple times)
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Human vote as CHARACTER=CHOICE (can be specified multiple times)
    #[arg(long = "vote", value_name = "CHARACTER=CHOICE", value_parser = parse_vote)]
    pub votes: Vec<VoteArg>,

    /// Move the party once the proposal is approved
    #[arg(long)]
    pub execute: bool,

    /// Move the party even if the vote did not approve it
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct SettingsArgs {
    #[arg(short, long, default_value = "session-1")]
    pub session: String,

    /// majority or unanimous
    #[arg(long, value_parser = parse_wire::<VotingSystem>)]
    pub voting_system: Option<VotingSystem>,

    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub required_approval_percentage: Option<u8>,

    /// Seconds a proposal stays open
    #[arg(long)]
    pub voting_time_limit: Option<u64>,

    #[arg(long)]
    pub allow_abstention: Option<bool>,

    #[arg(long)]
    pub leader_can_override: Option<bool>,

    #[arg(long)]
    pub leader_vote_weight: Option<u32>,

    #[arg(long)]
    pub auto_approve_if_no_response: Option<bool>,

    /// Seconds
    #[arg(long)]
    pub auto_approve_time_limit: Option<u64>,

    #[arg(long)]
    pub turn_based_movement_cost: Option<bool>,
}

impl SettingsArgs {
    /// Flags given on the command line; empty when only showing settings
    pub fn patch(&self) -> ConsensusSettingsPatch {
        ConsensusSettingsPatch {
            voting_system: self.voting_system,
            required_approval_percentage: self.required_approval_percentage,
            voting_time_limit: self.voting_time_limit,
            allow_abstention: self.allow_abstention,
            leader_can_override: self.leader_can_override,
            leader_vote_weight: self.leader_vote_weight,
            auto_approve_if_no_response: self.auto_approve_if_no_response,
            auto_approve_time_limit: self.auto_approve_time_limit,
            turn_based_movement_cost: self.turn_based_movement_cost,
        }
    }
}

/// `--vote` argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteArg {
    pub voter_id: CharacterId,
    pub choice: VoteChoice,
}

fn parse_wire<T>(s: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    s.parse().map_err(|e: T::Err| e.to_string())
}

fn parse_vote(s: &str) -> Result<VoteArg, String> {
    let (voter, choice) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CHARACTER=CHOICE, got '{s}'"))?;
    let voter = voter.trim();
    if voter.is_empty() {
        return Err(format!("missing character in '{s}'"));
    }
    Ok(VoteArg {
        voter_id: voter.into(),
        choice: parse_wire(choice.trim())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_travel() {
        let cli = Cli::parse_from([
            "party-consensus",
            "-vv",
            "travel",
            "--proposer",
            "aria",
            "--to",
            "harbor",
            "--method",
            "Ride",
            "--vote",
            "borin=approve",
            "--vote",
            "cass = no",
            "--execute",
        ]);
        assert_eq!(cli.verbose, 2);
        let Some(Command::Travel(args)) = cli.command else {
            panic!("expected travel");
        };
        assert_eq!(args.session, "session-1");
        assert_eq!(args.method, MovementMethod::Ride);
        assert_eq!(args.urgency, Urgency::Normal);
        assert_eq!(
            args.votes,
            vec![
                VoteArg {
                    voter_id: "borin".into(),
                    choice: VoteChoice::Approve
                },
                VoteArg {
                    voter_id: "cass".into(),
                    choice: VoteChoice::Reject
                },
            ]
        );
        assert!(args.execute);
        assert!(!args.force);
    }

    #[test]
    fn test_bad_vote_is_rejected() {
        assert!(parse_vote("borin").is_err());
        assert!(parse_vote("=approve").is_err());
        assert!(parse_vote("borin=maybe").is_err());
    }

    #[test]
    fn test_settings_patch() {
        let cli = Cli::parse_from([
            "party-consensus",
            "settings",
            "--voting-system",
            "unanimous",
            "--allow-abstention",
            "false",
        ]);
        let Some(Command::Settings(args)) = cli.command else {
            panic!("expected settings");
        };
        let patch = args.patch();
        assert_eq!(patch.voting_system, Some(VotingSystem::Unanimous));
        assert_eq!(patch.allow_abstention, Some(false));
        assert!(patch.voting_time_limit.is_none());

        let cli = Cli::parse_from(["party-consensus", "settings"]);
        let Some(Command::Settings(args)) = cli.command else {
            panic!("expected settings");
        };
        assert!(args.patch().is_empty());
    }
}
