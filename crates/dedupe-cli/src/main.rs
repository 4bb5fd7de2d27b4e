//! dedupe - duplicate account email cleanup
//!
//! An administrative CLI for databases where historical signup paths let
//! several accounts share one email address.
//!
//! # Examples
//!
//! ```bash
//! # Read-only report of duplicate groups
//! dedupe analyze --detailed --show-activity
//!
//! # Clear a blocking account, then apply the migration
//! dedupe resolve update-email 20 bob.real@example.com
//! dedupe migrate
//! ```

mod cli;
mod commands;
mod resolve_commands;

use crate::cli::Cli;
use crate::commands::Commands;
use crate::resolve_commands::ResolveCommands;

use dedupe_cli::report::ReportOptions;
use dedupe_cli::{CliError, RunStatus, handlers, logger};
use dedupe_core::ActivityThresholds;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, info};

// Exit codes: 0 success, 1 operational failure, 2 blocked by the safety gate
const EXIT_BLOCKED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(RunStatus::Success) => ExitCode::SUCCESS,
        Ok(RunStatus::Blocked) => ExitCode::from(EXIT_BLOCKED),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<RunStatus, CliError> {
    // Load and validate configuration
    let config = dedupe_config::Config::load()?;
    config.validate()?;

    // Construct log file path if configured
    let log_file_path: Option<PathBuf> = if let Some(ref filename) = config.logging.file {
        let config_dir = dedupe_config::Config::config_dir()?;
        let log_dir = config_dir.join(&config.logging.dir);

        std::fs::create_dir_all(&log_dir).map_err(|e| CliError::Io {
            path: log_dir.clone(),
            source: e,
        })?;

        Some(log_dir.join(filename))
    } else {
        None
    };

    // Initialize logger (before any other logging); --quiet caps the level
    let level = if cli.quiet {
        dedupe_config::LogLevel(LevelFilter::Warn)
    } else {
        config.logging.level
    };
    logger::initialize(level, log_file_path, config.logging.colored)?;

    info!("Starting dedupe v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    // Open the database
    let database_path = match cli.database {
        Some(path) => path,
        None => config.database_path()?,
    };
    info!("Opening database: {}", database_path.display());

    let pool = dedupe_db::connect(&database_path).await?;

    let thresholds = ActivityThresholds {
        min_issues: config.thresholds.min_issues,
        min_points: config.thresholds.min_points,
        recent_login_days: config.thresholds.recent_login_days,
    };

    match cli.command {
        Commands::Analyze {
            detailed,
            show_activity,
            high_activity_only,
            export_csv,
        } => {
            let opts = ReportOptions {
                detailed,
                show_activity,
                high_activity_only,
            };
            handlers::analyze(&pool, thresholds, &opts, export_csv.as_deref()).await?;
            Ok(RunStatus::Success)
        }

        Commands::Resolve { action } => {
            match action {
                ResolveCommands::List => handlers::resolve_list(&pool, thresholds).await?,
                ResolveCommands::UpdateEmail { id, email } => {
                    handlers::resolve_update_email(&pool, id, &email).await?
                }
                ResolveCommands::MergeUsers { source, target } => {
                    handlers::resolve_merge_users(&pool, source, target).await?
                }
                ResolveCommands::ContactUsers { output } => {
                    handlers::resolve_contact_users(&pool, thresholds, output.as_ref()).await?
                }
            }
            Ok(RunStatus::Success)
        }

        Commands::Migrate { dry_run } => handlers::migrate(&pool, thresholds, dry_run).await,
    }
}
