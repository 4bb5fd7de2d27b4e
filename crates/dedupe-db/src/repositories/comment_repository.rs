use crate::error::Result as DbErrorResult;

use dedupe_core::Comment;

pub struct CommentRepository;

impl CommentRepository {
    pub async fn insert<'e, E>(executor: E, comment: &Comment) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let created_at = comment.created_at.timestamp();

        sqlx::query(
            r#"
                INSERT INTO comments (id, issue_id, user_id, content, created_at)
                VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(comment.id)
        .bind(comment.issue_id)
        .bind(comment.user_id)
        .bind(&comment.content)
        .bind(created_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn count_by_user<'e, E>(executor: E, user_id: i64) -> DbErrorResult<i64>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    /// Move every comment authored by `from` onto `to`.
    pub async fn reassign_author<'e, E>(executor: E, from: i64, to: i64) -> DbErrorResult<u64>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query("UPDATE comments SET user_id = ? WHERE user_id = ?")
            .bind(to)
            .bind(from)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete comments authored by the user, wherever they sit.
    pub async fn delete_by_user<'e, E>(executor: E, user_id: i64) -> DbErrorResult<u64>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query("DELETE FROM comments WHERE user_id = ?")
            .bind(user_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete every comment hanging off issues the user reported,
    /// regardless of who wrote it. Must run before the issues themselves
    /// are deleted or the FK restriction fires.
    pub async fn delete_by_issue_owner<'e, E>(executor: E, user_id: i64) -> DbErrorResult<u64>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query(
            r#"
                DELETE FROM comments
                WHERE issue_id IN (SELECT id FROM issues WHERE user_id = ?)
            "#,
        )
        .bind(user_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
