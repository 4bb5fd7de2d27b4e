use crate::{
    CommentRepository, DbError, DuplicateScanner, IssueRepository, PointAwardRepository,
    ProfileRepository, UserRepository, error::Result as DbErrorResult,
};

use dedupe_core::{ActivityThresholds, DuplicateGroup, GateReport};

use std::panic::Location;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use sqlx::sqlite::SqliteConnection;
use sqlx::SqlitePool;

/// Name of the partial unique index whose existence marks the migration as
/// applied.
pub const EMAIL_UNIQUE_INDEX: &str = "users_email_unique";

const CREATE_EMAIL_UNIQUE_INDEX: &str = r#"
    CREATE UNIQUE INDEX users_email_unique
    ON users(email)
    WHERE email IS NOT NULL AND email <> ''
"#;

/// The migration is a two-state machine. `Applied` is terminal: the only
/// way back is restoring the database from backup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationState {
    Pending,
    Applied,
}

/// One group's slice of the deletion plan.
#[derive(Debug, Clone)]
pub struct GroupPlan {
    pub email: String,
    pub retained_id: i64,
    pub doomed_ids: Vec<i64>,
}

/// Everything `run` would delete, computed inside the gate-checked
/// transaction and reported without applying.
#[derive(Debug, Clone, Default)]
pub struct MigrationPlan {
    pub groups: Vec<GroupPlan>,
}

impl MigrationPlan {
    fn from_groups(groups: &[DuplicateGroup]) -> Self {
        Self {
            groups: groups
                .iter()
                .map(|group| GroupPlan {
                    email: group.email.clone(),
                    retained_id: group.retained().id,
                    doomed_ids: group.doomed().iter().map(|account| account.id).collect(),
                })
                .collect(),
        }
    }

    pub fn accounts_to_delete(&self) -> usize {
        self.groups.iter().map(|group| group.doomed_ids.len()).sum()
    }
}

/// Row counts from an applied migration.
#[derive(Debug, Clone, Copy, Default)]
pub struct MigrationSummary {
    pub groups_resolved: usize,
    pub accounts_deleted: u64,
    pub issues_deleted: u64,
    pub comments_deleted: u64,
    pub point_awards_deleted: u64,
    pub profiles_deleted: u64,
}

/// What a `run` call did (or refused to do). Gate blocks and previews are
/// ordinary outcomes, not errors - the database is untouched in both.
#[derive(Debug)]
pub enum MigrationOutcome {
    AlreadyApplied,
    Blocked(GateReport),
    Preview(MigrationPlan),
    Applied(MigrationSummary),
}

pub struct MigrationExecutor {
    thresholds: ActivityThresholds,
}

impl MigrationExecutor {
    pub fn new(thresholds: ActivityThresholds) -> Self {
        Self { thresholds }
    }

    pub async fn state(pool: &SqlitePool) -> DbErrorResult<MigrationState> {
        if Self::index_exists(pool).await? {
            Ok(MigrationState::Applied)
        } else {
            Ok(MigrationState::Pending)
        }
    }

    /// Apply (or preview) the deduplication migration.
    ///
    /// The whole pass - scan, gate, explicit cascades, re-scan
    /// verification, index creation - runs in one transaction. Any failure
    /// or refusal drops the transaction and leaves the previous state
    /// intact; `now` is the migration run time the activity scorer
    /// evaluates against.
    pub async fn run(
        &self,
        pool: &SqlitePool,
        now: DateTime<Utc>,
        dry_run: bool,
    ) -> DbErrorResult<MigrationOutcome> {
        let mut tx = pool.begin().await?;

        if Self::index_exists(&mut *tx).await? {
            return Ok(MigrationOutcome::AlreadyApplied);
        }

        let groups = DuplicateScanner::scan(&mut *tx).await?;

        let report = GateReport::evaluate(&groups, self.thresholds, now);
        if !report.passed() {
            return Ok(MigrationOutcome::Blocked(report));
        }

        if dry_run {
            return Ok(MigrationOutcome::Preview(MigrationPlan::from_groups(
                &groups,
            )));
        }

        let mut summary = MigrationSummary::default();

        for group in &groups {
            for doomed in group.doomed() {
                delete_account_cascade(&mut tx, doomed.id, &mut summary).await?;
            }
            summary.groups_resolved += 1;
        }

        // Re-run the detector inside the same transaction; a surviving
        // group means the maintenance-window assumption was violated.
        let remaining = DuplicateScanner::scan(&mut *tx).await?;
        if !remaining.is_empty() {
            return Err(DbError::VerificationFailed {
                remaining_groups: remaining.len(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        sqlx::query(CREATE_EMAIL_UNIQUE_INDEX)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(MigrationOutcome::Applied(summary))
    }

    async fn index_exists<'e, E>(executor: E) -> DbErrorResult<bool>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = ?",
        )
        .bind(EMAIL_UNIQUE_INDEX)
        .fetch_one(executor)
        .await?;

        Ok(count > 0)
    }
}

/// Delete one account and everything it owns, in an order the restricting
/// foreign keys accept:
///
/// 1. comments on the account's issues (any author)
/// 2. comments the account wrote elsewhere
/// 3. the account's point awards
/// 4. the account's issues
/// 5. the account's profile
/// 6. the account row itself
async fn delete_account_cascade(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    user_id: i64,
    summary: &mut MigrationSummary,
) -> DbErrorResult<()> {
    let conn: &mut SqliteConnection = &mut *tx;

    summary.comments_deleted += CommentRepository::delete_by_issue_owner(&mut *conn, user_id).await?;
    summary.comments_deleted += CommentRepository::delete_by_user(&mut *conn, user_id).await?;
    summary.point_awards_deleted += PointAwardRepository::delete_by_user(&mut *conn, user_id).await?;
    summary.issues_deleted += IssueRepository::delete_by_user(&mut *conn, user_id).await?;
    summary.profiles_deleted += ProfileRepository::delete_by_user(&mut *conn, user_id).await?;
    summary.accounts_deleted += UserRepository::delete(&mut *conn, user_id).await?;

    Ok(())
}
