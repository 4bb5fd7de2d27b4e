use crate::{DEFAULT_MIN_ISSUES, DEFAULT_MIN_POINTS, DEFAULT_RECENT_LOGIN_DAYS};

use serde::Deserialize;

/// Activity thresholds that gate the destructive migration. An account
/// crossing any of the three is treated as high-activity and will never be
/// deleted automatically.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub min_issues: i64,
    pub min_points: i64,
    pub recent_login_days: i64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            min_issues: DEFAULT_MIN_ISSUES,
            min_points: DEFAULT_MIN_POINTS,
            recent_login_days: DEFAULT_RECENT_LOGIN_DAYS,
        }
    }
}
