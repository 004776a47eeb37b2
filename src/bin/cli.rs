//! Schedule provider CLI
//!
//! Local entry point: seeds the data directory, runs one-shot update
//! cycles, or starts the long-running background checker. The network
//! read API lives in a separate routing layer consuming this crate.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use sched_provider::{
    checker::Checker,
    error::{AppError, Result},
    models::{Config, ScheduleFilter, ScheduleMeta},
    provider::{Provider, UpdateOutcome},
    storage::LocalStore,
};

/// sched-provider - cached lesson schedule with background refresh
#[derive(Parser, Debug)]
#[command(name = "sched-provider", version)]
struct Cli {
    /// Path to the data directory holding config and persisted state
    #[arg(short, long, default_value = "sp_data")]
    data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Seed the data directory with initial metadata and an empty schedule
    Init {
        /// Base URL of the remote export
        #[arg(long)]
        url: String,

        /// Source label stored in the metadata
        #[arg(long, default_value = "google sheets")]
        source: String,

        /// Overwrite existing state
        #[arg(long)]
        force: bool,
    },

    /// Run the provider with the background checker until interrupted
    Run,

    /// Perform a single update cycle and report the outcome
    Update,

    /// Print provider and schedule status
    Status,

    /// List all known class identifiers
    Classes,

    /// Print the schedule, optionally filtered
    Schedule {
        /// Restrict to these class identifiers
        #[arg(long)]
        cl: Vec<String>,

        /// Restrict to these weekday indices (0 = Monday)
        #[arg(long)]
        day: Vec<usize>,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

async fn connected_provider(config: Config, data_dir: &PathBuf) -> Result<Provider> {
    let provider = Provider::new(config, Box::new(LocalStore::new(data_dir)));
    provider.connect().await?;
    Ok(provider)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.data_dir.join("config.toml");
    let config = Config::load_or_default(&config_path);
    config.validate()?;

    match cli.command {
        Command::Init { url, source, force } => {
            let store = LocalStore::new(&cli.data_dir);
            if store.is_seeded() && !force {
                log::error!(
                    "Data directory {} is already seeded. Use --force to overwrite.",
                    cli.data_dir.display()
                );
                return Err(AppError::config("data directory already seeded"));
            }

            let meta = ScheduleMeta {
                source,
                url,
                hash: None,
                check_at: None,
                update_at: None,
                next_check: None,
            };
            store.seed(&meta).await?;
            log::info!("Seeded provider state in {}", cli.data_dir.display());
        }

        Command::Run => {
            let interval = Duration::from_secs(config.checker.interval_secs);
            let provider = Arc::new(connected_provider(config, &cli.data_dir).await?);

            let mut checker = Checker::new(Arc::clone(&provider), interval);
            checker.run();
            log::info!(
                "Provider running, checking every {} s. Press Ctrl-C to stop.",
                interval.as_secs()
            );

            tokio::signal::ctrl_c().await?;
            log::info!("Stop requested");

            // Forced cancellation keeps shutdown latency bounded; the
            // graceful flag alone would wait out the current sleep.
            checker.stop();
            checker.cancel();
            provider.close().await?;
            log::info!("Provider stopped");
        }

        Command::Update => {
            let provider = connected_provider(config, &cli.data_dir).await?;
            match provider.update().await? {
                UpdateOutcome::Throttled => log::info!("Check not due yet, nothing done"),
                UpdateOutcome::Unchanged => log::info!("Schedule is up to date"),
                UpdateOutcome::Updated => log::info!("Schedule updated"),
            }
            provider.close().await?;
        }

        Command::Status => {
            let provider = connected_provider(config, &cli.data_dir).await?;
            let status = provider.status().await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }

        Command::Classes => {
            let provider = connected_provider(config, &cli.data_dir).await?;
            for class in provider.classes().await? {
                println!("{class}");
            }
        }

        Command::Schedule { cl, day } => {
            let provider = connected_provider(config, &cli.data_dir).await?;
            let filter = if cl.is_empty() && day.is_empty() {
                None
            } else {
                Some(ScheduleFilter {
                    days: (!day.is_empty()).then_some(day),
                    cl: (!cl.is_empty()).then_some(cl),
                })
            };
            let schedule = provider.schedule(filter.as_ref()).await?;
            println!("{}", serde_json::to_string_pretty(schedule.as_ref())?);
        }
    }

    Ok(())
}
