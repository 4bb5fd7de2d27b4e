use crate::UserRepository;
use crate::error::Result as DbErrorResult;

use dedupe_core::{DuplicateGroup, group_duplicates};

/// Read-only duplicate detection over the live users table.
///
/// Groups are a view over current data, recomputed on every call. The
/// executor runs the same scan inside its transaction so analysis and
/// migration always agree on what a duplicate is.
pub struct DuplicateScanner;

impl DuplicateScanner {
    pub async fn scan<'e, E>(executor: E) -> DbErrorResult<Vec<DuplicateGroup>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let accounts = UserRepository::find_all(executor).await?;

        Ok(group_duplicates(accounts))
    }
}
