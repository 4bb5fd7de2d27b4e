use serde::{Deserialize, Serialize};

/// One-to-one profile record for a user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub display_name: Option<String>,
    pub bio: Option<String>,
}
