use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use tripsync::config::LoggingConfig;
use tripsync::{PlanRequest, PlannerConfig, PlannerError, TripPlanner};

/// Plan a group trip from a JSON request file
#[derive(Debug, Parser)]
#[command(name = "tripsync", version, about)]
struct Cli {
    /// Configuration file, defaults to the user config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the full trip plan
    Plan {
        request: PathBuf,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Show the best and near-miss date windows
    Dates { request: PathBuf },
    /// Rank destinations for the consensus trip length
    Destinations { request: PathBuf },
}

fn main() {
    if let Err(error) = run() {
        if let Some(planner_error) = error.downcast_ref::<PlannerError>() {
            eprintln!("tripsync: {}", planner_error.user_message());
            if planner_error.is_infeasible() {
                std::process::exit(2);
            }
        } else {
            eprintln!("tripsync error: {error:#}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = PlannerConfig::load_from_path(cli.config.clone())?;
    init_tracing(&config.logging, cli.verbose)?;

    let planner = TripPlanner::new(&config);

    match &cli.command {
        Commands::Plan { request, pretty } => {
            let request = read_request(request)?;
            let plan = planner.plan(&request)?;
            info!(
                "Planned {} for {} travelers",
                plan.destination,
                request.travelers.len()
            );
            print_json(&plan, *pretty)
        }
        Commands::Dates { request } => {
            let request = read_request(request)?;
            print_json(&planner.resolve_dates(&request), true)
        }
        Commands::Destinations { request } => {
            let request = read_request(request)?;
            let profile = planner.profile(&request);
            let ranking =
                planner.rank_destinations(&request, &profile, profile.consensus_duration);
            print_json(&ranking, true)
        }
    }
}

fn read_request(path: &Path) -> anyhow::Result<PlanRequest> {
    PlanRequest::from_json_file(path)
        .with_context(|| format!("Failed to load planning request: {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{output}");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { "debug" } else { logging.level.as_str() };

    let filter = tracing_subscriber::EnvFilter::try_from_env("TRIPSYNC_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let result = if logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
    };

    result.map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
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
    fn test_parses_plan_with_global_flags() {
        let cli = Cli::try_parse_from(["tripsync", "plan", "trip.json", "--pretty", "--verbose"])
            .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Plan { pretty: true, .. }));
    }
}
