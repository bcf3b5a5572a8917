//! CLI entrypoint for Party Consensus
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser};
use consensus_application::{
    ApiResponse, CastVoteInput, ConsensusPorts, DecisionLogger, ExecuteMovementInput,
    MovementConsensusService, NoDecisionLogger, NoProgress, ProposalStore, SettingsStore,
    VotingProgressNotifier,
};
use consensus_domain::{ProposalDraft, SessionId};
use consensus_infrastructure::{
    ConfigLoader, DayPeriodClock, FileConfig, InMemoryConsensusStore, JsonFileConsensusStore,
    JsonlDecisionLogger, SimulatedLocationService, StaticRoster, StorageBackend,
};
use consensus_presentation::{
    Cli, Command, ConsoleFormatter, SettingsArgs, TravelArgs, VotingProgressReporter,
};
use serde::Serialize;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = &cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("failed to load configuration: {e}"))?
    };

    let issues = config.validate();
    if !issues.is_empty() {
        eprintln!("{}", ConsoleFormatter::format_config_issues(&issues));
    }

    info!("Starting Party Consensus");

    // === Dependency Injection ===
    let service = build_service(&config, &cli).await?;

    let ok = match command {
        Command::Travel(args) => run_travel(&service, args, cli.json).await,
        Command::Settings(args) => run_settings(&service, args, cli.json).await,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn build_service(config: &FileConfig, cli: &Cli) -> Result<MovementConsensusService> {
    let (proposals, settings) = open_store(&config.storage.parse_backend().0).await?;

    let (roster, _) = StaticRoster::from_config(&config.simulation);
    let roster = Arc::new(roster);
    let world = SimulatedLocationService::new(config.simulation.starting_location.as_str())
        .with_unreachable(config.simulation.unreachable.iter().map(String::as_str));

    let ports = ConsensusPorts {
        proposals,
        settings,
        roster: roster.clone(),
        characters: roster,
        locations: Arc::new(world),
        time: Arc::new(DayPeriodClock::new()),
    };

    let logger: Arc<dyn DecisionLogger> = match config.logging.decision_log_path() {
        Some(path) => match JsonlDecisionLogger::new(&path) {
            Some(logger) => {
                info!("Decision log: {}", logger.path().display());
                Arc::new(logger)
            }
            None => Arc::new(NoDecisionLogger),
        },
        None => Arc::new(NoDecisionLogger),
    };

    let progress: Arc<dyn VotingProgressNotifier> = if cli.quiet || cli.json {
        Arc::new(NoProgress)
    } else {
        Arc::new(VotingProgressReporter::new())
    };

    Ok(MovementConsensusService::builder(ports)
        .with_progress(progress)
        .with_decision_logger(logger)
        .with_ai_policy(Arc::new(config.ai_voters.to_policy()))
        .with_ai_config(config.ai_voters.to_scheduler_config())
        .with_default_settings(config.defaults.to_settings().0)
        .build())
}

async fn open_store(
    backend: &StorageBackend,
) -> Result<(Arc<dyn ProposalStore>, Arc<dyn SettingsStore>)> {
    match backend {
        StorageBackend::Memory => {
            let store = Arc::new(InMemoryConsensusStore::new());
            let proposals: Arc<dyn ProposalStore> = store.clone();
            let settings: Arc<dyn SettingsStore> = store;
            Ok((proposals, settings))
        }
        StorageBackend::Json(path) => {
            let store = Arc::new(
                JsonFileConsensusStore::open(path)
                    .await
                    .with_context(|| format!("failed to open store {}", path.display()))?,
            );
            let proposals: Arc<dyn ProposalStore> = store.clone();
            let settings: Arc<dyn SettingsStore> = store;
            Ok((proposals, settings))
        }
    }
}

/// Print a response envelope; returns the data on success
fn emit<T: Serialize>(
    response: ApiResponse<T>,
    json: bool,
    render: impl FnOnce(&T) -> String,
) -> Option<T> {
    if json {
        println!("{}", ConsoleFormatter::format_json(&response));
    } else if let Some(data) = &response.data {
        println!("{}", render(data));
    } else if let Some(error) = &response.error {
        eprintln!("{}", ConsoleFormatter::format_error(error));
    }
    response.data
}

async fn run_travel(service: &MovementConsensusService, args: &TravelArgs, json: bool) -> bool {
    let mut draft = ProposalDraft::new(args.session.as_str(), args.proposer.as_str(), args.to.as_str())
        .with_method(args.method)
        .with_urgency(args.urgency)
        .with_difficulty(args.difficulty)
        .with_reason(args.reason.as_str())
        .with_tags(args.tags.clone());
    if let Some(minutes) = args.estimated_time {
        draft = draft.with_estimated_time(minutes);
    }

    let Some(proposal) = emit(
        service.create_proposal(draft).await,
        json,
        ConsoleFormatter::format_proposal,
    ) else {
        return false;
    };

    let mut ok = true;
    for vote in &args.votes {
        let input = CastVoteInput::new(proposal.id.clone(), vote.voter_id.clone(), vote.choice);
        let response = service.cast_vote(input).await;
        ok &= response.success;
        if json || !response.success {
            emit(response, json, |_| String::new());
        }
    }

    // Let the AI voters finish deliberating
    if let Some(votes_cast) = service.scheduler().join(&proposal.id).await {
        info!("AI voters cast {} vote(s)", votes_cast);
    }

    ok &= emit(
        service.get_voting_summary(&proposal.id).await,
        json,
        ConsoleFormatter::format_summary,
    )
    .is_some();

    if args.execute || args.force {
        let mut input = ExecuteMovementInput::new(proposal.id.clone());
        if args.force {
            input = input.forced();
        }
        ok &= emit(
            service.execute_movement(input).await,
            json,
            ConsoleFormatter::format_outcome,
        )
        .is_some();
    }

    ok
}

async fn run_settings(service: &MovementConsensusService, args: &SettingsArgs, json: bool) -> bool {
    let session = SessionId::new(args.session.as_str());
    let patch = args.patch();

    let response = if patch.is_empty() {
        service.get_consensus_settings(&session).await
    } else {
        service.update_consensus_settings(&session, &patch).await
    };
    if !response.success {
        warn!("Settings request for {} failed", session);
    }

    emit(response, json, |settings| {
        ConsoleFormatter::format_settings(session.as_str(), settings)
    })
    .is_some()
}
