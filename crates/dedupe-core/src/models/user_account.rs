use crate::duplicates::normalize_email;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user account row.
///
/// `id` is monotonic (assigned at registration), so the highest id in a
/// duplicate group is the newest account. `email` holds the single sentinel
/// for "no email": `None`. Legacy rows written by older signup paths may
/// still carry blank or mixed-case emails in storage; [`normalized_email`]
/// is the grouping key.
///
/// [`normalized_email`]: UserAccount::normalized_email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,

    // Activity counters
    pub issues_reported: i64,
    pub points_total: i64,
    pub last_login: Option<DateTime<Utc>>,

    pub date_joined: DateTime<Utc>,
}

impl UserAccount {
    /// Email as used for duplicate detection: trimmed, lowercased,
    /// blank collapsed to `None`.
    pub fn normalized_email(&self) -> Option<String> {
        self.email.as_deref().and_then(normalize_email)
    }
}
