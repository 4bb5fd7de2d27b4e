use crate::{
    CommentRepository, DbError, IssueRepository, PointAwardRepository, ProfileRepository,
    UserRepository, error::Result as DbErrorResult,
};

use dedupe_core::validate_email;

use std::panic::Location;

use error_location::ErrorLocation;
use sqlx::SqlitePool;

/// What a merge moved, for operator feedback.
#[derive(Debug, Clone)]
pub struct MergeSummary {
    pub source_id: i64,
    pub target_id: i64,
    pub issues_moved: u64,
    pub comments_moved: u64,
    pub point_awards_moved: u64,
}

/// Manual remediation operations used to clear safety-gate blocks before
/// the migration runs. Single-shot and operator-invoked: each either
/// commits completely or leaves the database untouched.
pub struct Resolver;

impl Resolver {
    /// Change a user's email, normalizing it first. Fails fast if the id is
    /// unknown or the email already belongs to another account. Returns the
    /// normalized email that was stored.
    pub async fn update_email(
        pool: &SqlitePool,
        user_id: i64,
        new_email: &str,
    ) -> DbErrorResult<String> {
        let email = validate_email(new_email)?;

        let mut tx = pool.begin().await?;

        let user = UserRepository::find_by_id(&mut *tx, user_id)
            .await?
            .ok_or_else(|| DbError::UserNotFound {
                user_id,
                location: ErrorLocation::from(Location::caller()),
            })?;

        if UserRepository::email_in_use_by_other(&mut *tx, &email, user.id).await? {
            return Err(DbError::EmailTaken {
                email,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        UserRepository::set_email(&mut *tx, user_id, &email).await?;

        tx.commit().await?;

        Ok(email)
    }

    /// Fold `source_id` into `target_id`: reassign issues, comments and
    /// point awards, add the source's counters onto the target, keep the
    /// newer last login, then delete the source account and its profile.
    pub async fn merge_users(
        pool: &SqlitePool,
        source_id: i64,
        target_id: i64,
    ) -> DbErrorResult<MergeSummary> {
        if source_id == target_id {
            return Err(DbError::InvalidMerge {
                message: format!("cannot merge user {} into itself", source_id),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut tx = pool.begin().await?;

        let source = UserRepository::find_by_id(&mut *tx, source_id)
            .await?
            .ok_or_else(|| DbError::UserNotFound {
                user_id: source_id,
                location: ErrorLocation::from(Location::caller()),
            })?;

        let target = UserRepository::find_by_id(&mut *tx, target_id)
            .await?
            .ok_or_else(|| DbError::UserNotFound {
                user_id: target_id,
                location: ErrorLocation::from(Location::caller()),
            })?;

        let issues_moved = IssueRepository::reassign_owner(&mut *tx, source_id, target_id).await?;
        let comments_moved =
            CommentRepository::reassign_author(&mut *tx, source_id, target_id).await?;
        let point_awards_moved =
            PointAwardRepository::reassign_recipient(&mut *tx, source_id, target_id).await?;

        // A merge never lowers the target's activity standing
        let last_login = match (target.last_login, source.last_login) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };

        UserRepository::update_activity(
            &mut *tx,
            target_id,
            target.issues_reported + source.issues_reported,
            target.points_total + source.points_total,
            last_login,
        )
        .await?;

        ProfileRepository::delete_by_user(&mut *tx, source_id).await?;
        UserRepository::delete(&mut *tx, source_id).await?;

        tx.commit().await?;

        Ok(MergeSummary {
            source_id,
            target_id,
            issues_moved,
            comments_moved,
            point_awards_moved,
        })
    }
}
