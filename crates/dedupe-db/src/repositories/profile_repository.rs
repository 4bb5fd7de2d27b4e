use crate::error::Result as DbErrorResult;

use dedupe_core::UserProfile;

use sqlx::Row;
use sqlx::sqlite::SqliteRow;

pub struct ProfileRepository;

impl ProfileRepository {
    pub async fn insert<'e, E>(executor: E, profile: &UserProfile) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
                INSERT INTO user_profiles (user_id, display_name, bio)
                VALUES (?, ?, ?)
            "#,
        )
        .bind(profile.user_id)
        .bind(&profile.display_name)
        .bind(&profile.bio)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn find_by_user<'e, E>(executor: E, user_id: i64) -> DbErrorResult<Option<UserProfile>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let row = sqlx::query(
            "SELECT user_id, display_name, bio FROM user_profiles WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        row.as_ref().map(map_profile).transpose()
    }

    pub async fn delete_by_user<'e, E>(executor: E, user_id: i64) -> DbErrorResult<u64>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query("DELETE FROM user_profiles WHERE user_id = ?")
            .bind(user_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}

fn map_profile(row: &SqliteRow) -> DbErrorResult<UserProfile> {
    Ok(UserProfile {
        user_id: row.try_get("user_id")?,
        display_name: row.try_get("display_name")?,
        bio: row.try_get("bio")?,
    })
}
