use crate::error::Result as DbErrorResult;

use dedupe_core::Issue;

pub struct IssueRepository;

impl IssueRepository {
    pub async fn insert<'e, E>(executor: E, issue: &Issue) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let created_at = issue.created_at.timestamp();

        sqlx::query(
            r#"
                INSERT INTO issues (id, user_id, title, url, description, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(issue.id)
        .bind(issue.user_id)
        .bind(&issue.title)
        .bind(&issue.url)
        .bind(&issue.description)
        .bind(created_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn count_by_user<'e, E>(executor: E, user_id: i64) -> DbErrorResult<i64>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM issues WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    /// Move every issue reported by `from` onto `to`. Returns the number of
    /// rows reassigned.
    pub async fn reassign_owner<'e, E>(executor: E, from: i64, to: i64) -> DbErrorResult<u64>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query("UPDATE issues SET user_id = ? WHERE user_id = ?")
            .bind(to)
            .bind(from)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_by_user<'e, E>(executor: E, user_id: i64) -> DbErrorResult<u64>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query("DELETE FROM issues WHERE user_id = ?")
            .bind(user_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
