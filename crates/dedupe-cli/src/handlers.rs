use crate::error::{CliError, Result as CliErrorResult};
use crate::report::{self, ReportOptions};

use std::path::{Path, PathBuf};

use chrono::Utc;
use dedupe_core::{ActivityThresholds, GateReport};
use dedupe_db::{DuplicateScanner, MigrationExecutor, MigrationOutcome, Resolver, UserRepository};
use log::{info, warn};
use sqlx::SqlitePool;

/// Process-level outcome of a command. `Blocked` maps to a distinct exit
/// code so scripts can tell a safety-gate refusal from an operational
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Blocked,
}

/// `analyze`: read-only duplicate report, optional CSV export.
pub async fn analyze(
    pool: &SqlitePool,
    thresholds: ActivityThresholds,
    opts: &ReportOptions,
    export_csv: Option<&Path>,
) -> CliErrorResult<()> {
    let now = Utc::now();

    let total = UserRepository::count(pool).await?;
    let groups = DuplicateScanner::scan(pool).await?;
    info!(
        "Scanned {} account(s), found {} duplicate group(s)",
        total,
        groups.len()
    );

    print!("{}", report::render_groups(&groups, thresholds, now, opts));

    if let Some(path) = export_csv {
        let csv = report::render_csv(&groups, thresholds, now);
        write_file(path, &csv)?;
        info!("Wrote CSV report: {}", path.display());
    }

    Ok(())
}

/// `resolve list`: the decision aid - full member rows with activity
/// scores.
pub async fn resolve_list(pool: &SqlitePool, thresholds: ActivityThresholds) -> CliErrorResult<()> {
    let opts = ReportOptions {
        detailed: true,
        show_activity: true,
        high_activity_only: false,
    };

    analyze(pool, thresholds, &opts, None).await
}

/// `resolve update-email`: give an account its own address.
pub async fn resolve_update_email(
    pool: &SqlitePool,
    user_id: i64,
    email: &str,
) -> CliErrorResult<()> {
    let stored = Resolver::update_email(pool, user_id, email).await?;

    println!("Updated user #{} email to {}", user_id, stored);

    Ok(())
}

/// `resolve merge-users`: fold the source account into the target.
pub async fn resolve_merge_users(
    pool: &SqlitePool,
    source: i64,
    target: i64,
) -> CliErrorResult<()> {
    let summary = Resolver::merge_users(pool, source, target).await?;

    println!(
        "Merged user #{} into #{}: {} issue(s), {} comment(s), {} point award(s) reassigned",
        summary.source_id,
        summary.target_id,
        summary.issues_moved,
        summary.comments_moved,
        summary.point_awards_moved,
    );

    Ok(())
}

/// `resolve contact-users`: contact sheet for every account the gate would
/// refuse to delete.
pub async fn resolve_contact_users(
    pool: &SqlitePool,
    thresholds: ActivityThresholds,
    output: Option<&PathBuf>,
) -> CliErrorResult<()> {
    let now = Utc::now();

    let groups = DuplicateScanner::scan(pool).await?;
    let gate = GateReport::evaluate(&groups, thresholds, now);

    if gate.passed() {
        println!("No high-activity accounts are blocking the migration.");
        return Ok(());
    }

    let sheet = report::render_contact_sheet(&gate);

    match output {
        Some(path) => {
            write_file(path, &sheet)?;
            println!(
                "Wrote contact sheet for {} account(s): {}",
                gate.blocked.len(),
                path.display()
            );
        }
        None => print!("{}", sheet),
    }

    Ok(())
}

/// `migrate`: apply (or preview) the safe migration.
pub async fn migrate(
    pool: &SqlitePool,
    thresholds: ActivityThresholds,
    dry_run: bool,
) -> CliErrorResult<RunStatus> {
    let executor = MigrationExecutor::new(thresholds);

    match executor.run(pool, Utc::now(), dry_run).await? {
        MigrationOutcome::AlreadyApplied => {
            println!("Migration already applied; unique email index is in place.");
            Ok(RunStatus::Success)
        }
        MigrationOutcome::Preview(plan) => {
            print!("{}", report::render_plan(&plan));
            Ok(RunStatus::Success)
        }
        MigrationOutcome::Blocked(gate) => {
            warn!(
                "Safety gate blocked the migration ({} account(s))",
                gate.blocked.len()
            );
            eprint!("{}", report::render_blocked(&gate));
            Ok(RunStatus::Blocked)
        }
        MigrationOutcome::Applied(summary) => {
            info!(
                "Migration applied: {} account(s) deleted",
                summary.accounts_deleted
            );
            print!("{}", report::render_summary(&summary));
            Ok(RunStatus::Success)
        }
    }
}

fn write_file(path: &Path, contents: &str) -> CliErrorResult<()> {
    std::fs::write(path, contents).map_err(|e| CliError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
