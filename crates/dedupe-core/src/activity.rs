use crate::models::user_account::UserAccount;

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Engagement thresholds that mark an account as high-activity.
///
/// An account crossing ANY of the three is high-activity; there is no
/// weighting or combination beyond the disjunction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActivityThresholds {
    pub min_issues: i64,
    pub min_points: i64,
    pub recent_login_days: i64,
}

impl Default for ActivityThresholds {
    fn default() -> Self {
        Self {
            min_issues: 5,
            min_points: 100,
            recent_login_days: 30,
        }
    }
}

/// Which threshold fired for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityReason {
    IssueCount,
    PointTotal,
    RecentLogin,
}

impl fmt::Display for ActivityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityReason::IssueCount => write!(f, "issue count"),
            ActivityReason::PointTotal => write!(f, "point total"),
            ActivityReason::RecentLogin => write!(f, "recent login"),
        }
    }
}

/// Scorer output for one account: the raw inputs plus every reason that
/// fired. Pure function of the account, the thresholds, and the injected
/// run time. No clock reads in here.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityScore {
    pub user_id: i64,
    pub username: String,
    pub email: Option<String>,
    pub issues_reported: i64,
    pub points_total: i64,
    pub last_login: Option<DateTime<Utc>>,
    pub reasons: Vec<ActivityReason>,
}

impl ActivityScore {
    pub fn evaluate(
        account: &UserAccount,
        thresholds: ActivityThresholds,
        now: DateTime<Utc>,
    ) -> Self {
        let mut reasons = Vec::new();

        if account.issues_reported >= thresholds.min_issues {
            reasons.push(ActivityReason::IssueCount);
        }

        if account.points_total >= thresholds.min_points {
            reasons.push(ActivityReason::PointTotal);
        }

        // A login exactly on the boundary counts as recent, matching the
        // inclusive comparison used for the other two thresholds.
        if let Some(last_login) = account.last_login
            && last_login >= now - Duration::days(thresholds.recent_login_days)
        {
            reasons.push(ActivityReason::RecentLogin);
        }

        Self {
            user_id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            issues_reported: account.issues_reported,
            points_total: account.points_total,
            last_login: account.last_login,
            reasons,
        }
    }

    pub fn is_high_activity(&self) -> bool {
        !self.reasons.is_empty()
    }

    /// Comma-separated firing reasons, empty string when none fired.
    pub fn reasons_summary(&self) -> String {
        self.reasons
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
