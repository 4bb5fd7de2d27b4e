use crate::activity::{ActivityScore, ActivityThresholds};
use crate::duplicates::DuplicateGroup;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A doomed account the safety gate refuses to delete, with the group it
/// belongs to and the account that would have been kept instead.
#[derive(Debug, Clone, Serialize)]
pub struct BlockedAccount {
    pub group_email: String,
    pub retained_id: i64,
    pub score: ActivityScore,
}

/// Safety gate verdict over a full duplicate scan.
///
/// The gate walks every account marked for deletion and scores it; one
/// high-activity doomed account fails the entire run. Retained accounts are
/// never scored; keeping an active account is the point.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GateReport {
    pub blocked: Vec<BlockedAccount>,
}

impl GateReport {
    pub fn evaluate(
        groups: &[DuplicateGroup],
        thresholds: ActivityThresholds,
        now: DateTime<Utc>,
    ) -> Self {
        let mut blocked = Vec::new();

        for group in groups {
            for account in group.doomed() {
                let score = ActivityScore::evaluate(account, thresholds, now);
                if score.is_high_activity() {
                    blocked.push(BlockedAccount {
                        group_email: group.email.clone(),
                        retained_id: group.retained().id,
                        score,
                    });
                }
            }
        }

        Self { blocked }
    }

    pub fn passed(&self) -> bool {
        self.blocked.is_empty()
    }
}
