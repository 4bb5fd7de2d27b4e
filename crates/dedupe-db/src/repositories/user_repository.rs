use crate::{DbError, error::Result as DbErrorResult};

use dedupe_core::UserAccount;

use std::panic::Location;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

pub struct UserRepository;

impl UserRepository {
    pub async fn insert<'e, E>(executor: E, user: &UserAccount) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let last_login = user.last_login.map(|dt| dt.timestamp());
        let date_joined = user.date_joined.timestamp();

        sqlx::query(
            r#"
                INSERT INTO users (
                    id, username, email, issues_reported, points_total,
                    last_login, date_joined
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.issues_reported)
        .bind(user.points_total)
        .bind(last_login)
        .bind(date_joined)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> DbErrorResult<Option<UserAccount>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let row = sqlx::query(
            r#"
                SELECT id, username, email, issues_reported, points_total,
                       last_login, date_joined
                FROM users
                WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        row.as_ref().map(map_user).transpose()
    }

    /// Every account, ascending id. The scanner feeds this straight into
    /// duplicate grouping.
    pub async fn find_all<'e, E>(executor: E) -> DbErrorResult<Vec<UserAccount>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let rows = sqlx::query(
            r#"
                SELECT id, username, email, issues_reported, points_total,
                       last_login, date_joined
                FROM users
                ORDER BY id
            "#,
        )
        .fetch_all(executor)
        .await?;

        rows.iter().map(map_user).collect()
    }

    pub async fn count<'e, E>(executor: E) -> DbErrorResult<i64>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    /// Whether any OTHER account already holds this email, compared on the
    /// normalized form so legacy mixed-case rows still conflict.
    pub async fn email_in_use_by_other<'e, E>(
        executor: E,
        email: &str,
        exclude_user_id: i64,
    ) -> DbErrorResult<bool>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let count: i64 = sqlx::query_scalar(
            r#"
                SELECT COUNT(*)
                FROM users
                WHERE id != ?
                  AND email IS NOT NULL
                  AND LOWER(TRIM(email)) = ?
            "#,
        )
        .bind(exclude_user_id)
        .bind(email)
        .fetch_one(executor)
        .await?;

        Ok(count > 0)
    }

    pub async fn set_email<'e, E>(executor: E, id: i64, email: &str) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query("UPDATE users SET email = ? WHERE id = ?")
            .bind(email)
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::UserNotFound {
                user_id: id,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    /// Overwrite the activity columns; used when a merge folds a source
    /// account's history into its target.
    pub async fn update_activity<'e, E>(
        executor: E,
        id: i64,
        issues_reported: i64,
        points_total: i64,
        last_login: Option<DateTime<Utc>>,
    ) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let last_login = last_login.map(|dt| dt.timestamp());

        let result = sqlx::query(
            r#"
                UPDATE users
                SET issues_reported = ?, points_total = ?, last_login = ?
                WHERE id = ?
            "#,
        )
        .bind(issues_reported)
        .bind(points_total)
        .bind(last_login)
        .bind(id)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::UserNotFound {
                user_id: id,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    pub async fn delete<'e, E>(executor: E, id: i64) -> DbErrorResult<u64>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}

fn map_user(row: &SqliteRow) -> DbErrorResult<UserAccount> {
    let last_login: Option<i64> = row.try_get("last_login")?;
    let date_joined: i64 = row.try_get("date_joined")?;

    Ok(UserAccount {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        issues_reported: row.try_get("issues_reported")?,
        points_total: row.try_get("points_total")?,
        last_login: last_login.and_then(|ts| DateTime::from_timestamp(ts, 0)),
        date_joined: DateTime::from_timestamp(date_joined, 0).ok_or_else(|| {
            DbError::Initialization {
                message: "Invalid timestamp in users.date_joined".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?,
    })
}
