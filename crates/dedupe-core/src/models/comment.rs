use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment on an issue. Owned by its author; also removed when the
/// issue it belongs to goes away.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub issue_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
