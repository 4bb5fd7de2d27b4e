#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use dedupe_core::{Comment, Issue, PointAward, UserAccount, UserProfile};

pub fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

/// An account with no activity at all: no issues, no points, stale login.
pub fn dormant_user(id: i64, email: Option<&str>) -> UserAccount {
    UserAccount {
        id,
        username: format!("user{}", id),
        email: email.map(str::to_string),
        issues_reported: 0,
        points_total: 0,
        last_login: Some(days_ago(200)),
        date_joined: days_ago(400),
    }
}

/// An account with explicit activity counters. `last_login_days_ago: None`
/// means the user never logged in.
pub fn active_user(
    id: i64,
    email: Option<&str>,
    issues_reported: i64,
    points_total: i64,
    last_login_days_ago: Option<i64>,
) -> UserAccount {
    UserAccount {
        id,
        username: format!("user{}", id),
        email: email.map(str::to_string),
        issues_reported,
        points_total,
        last_login: last_login_days_ago.map(days_ago),
        date_joined: days_ago(400),
    }
}

pub fn test_issue(id: i64, user_id: i64) -> Issue {
    Issue {
        id,
        user_id,
        title: format!("Test issue {}", id),
        url: Some("https://example.com/bug".to_string()),
        description: Some("Test issue description".to_string()),
        created_at: days_ago(50),
    }
}

pub fn test_comment(id: i64, issue_id: i64, user_id: i64) -> Comment {
    Comment {
        id,
        issue_id,
        user_id,
        content: "Test comment content".to_string(),
        created_at: days_ago(40),
    }
}

pub fn test_point_award(id: i64, user_id: i64, amount: i64) -> PointAward {
    PointAward {
        id,
        user_id,
        amount,
        reason: Some("bug accepted".to_string()),
        awarded_at: days_ago(45),
    }
}

pub fn test_profile(user_id: i64) -> UserProfile {
    UserProfile {
        user_id,
        display_name: Some(format!("User {}", user_id)),
        bio: Some("Test bio".to_string()),
    }
}
