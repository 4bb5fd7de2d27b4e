use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single points grant (bug accepted, streaks, manual adjustments).
/// The running total lives on the user row; awards are the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointAward {
    pub id: i64,
    pub user_id: i64,
    pub amount: i64,
    pub reason: Option<String>,
    pub awarded_at: DateTime<Utc>,
}
