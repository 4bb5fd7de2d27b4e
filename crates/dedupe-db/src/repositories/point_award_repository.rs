use crate::error::Result as DbErrorResult;

use dedupe_core::PointAward;

pub struct PointAwardRepository;

impl PointAwardRepository {
    pub async fn insert<'e, E>(executor: E, award: &PointAward) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let awarded_at = award.awarded_at.timestamp();

        sqlx::query(
            r#"
                INSERT INTO point_awards (id, user_id, amount, reason, awarded_at)
                VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(award.id)
        .bind(award.user_id)
        .bind(award.amount)
        .bind(&award.reason)
        .bind(awarded_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn count_by_user<'e, E>(executor: E, user_id: i64) -> DbErrorResult<i64>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM point_awards WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    /// Move every award granted to `from` onto `to`.
    pub async fn reassign_recipient<'e, E>(executor: E, from: i64, to: i64) -> DbErrorResult<u64>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query("UPDATE point_awards SET user_id = ? WHERE user_id = ?")
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
        let result = sqlx::query("DELETE FROM point_awards WHERE user_id = ?")
            .bind(user_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
