use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bug report owned by a user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
