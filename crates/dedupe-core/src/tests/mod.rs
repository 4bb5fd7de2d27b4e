
use crate::models::user_account::UserAccount;

use chrono::{DateTime, Duration, TimeZone, Utc};

/// Fixed "migration run time" so scorer tests are deterministic.
pub(crate) fn run_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

pub(crate) fn days_before_run(days: i64) -> DateTime<Utc> {
    run_time() - Duration::days(days)
}

pub(crate) fn account(
    id: i64,
    email: Option<&str>,
    issues_reported: i64,
    points_total: i64,
    last_login: Option<DateTime<Utc>>,
) -> UserAccount {
    UserAccount {
        id,
        username: format!("user{}", id),
        email: email.map(str::to_string),
        issues_reported,
        points_total,
        last_login,
        date_joined: days_before_run(365),
    }
}

/// An account with no activity at all: no issues, no points, stale login.
pub(crate) fn dormant_account(id: i64, email: Option<&str>) -> UserAccount {
    account(id, email, 0, 0, Some(days_before_run(200)))
}
