mod common;

use common::{
    active_user, create_test_pool, dormant_user, test_comment, test_issue, test_point_award,
    test_profile,
};

use dedupe_core::ActivityThresholds;
use dedupe_db::{
    CommentRepository, DbError, IssueRepository, MigrationExecutor, MigrationOutcome,
    MigrationState, PointAwardRepository, ProfileRepository, UserRepository,
};

use chrono::Utc;
use googletest::assert_that;
use googletest::prelude::{anything, eq, len, none, some};

fn executor() -> MigrationExecutor {
    MigrationExecutor::new(ActivityThresholds::default())
}

// =========================================================================
// Happy path
// =========================================================================

#[tokio::test]
async fn given_dormant_duplicates_when_migrated_then_only_newest_remains() {
    // Given: ids 5 and 9 share an email, both with no issues, no points,
    // stale logins
    let pool = create_test_pool().await;
    UserRepository::insert(&pool, &dormant_user(5, Some("alice@example.com")))
        .await
        .unwrap();
    UserRepository::insert(&pool, &dormant_user(9, Some("alice@example.com")))
        .await
        .unwrap();

    // When
    let outcome = executor().run(&pool, Utc::now(), false).await.unwrap();

    // Then: account 5 deleted, account 9 retained
    let summary = match outcome {
        MigrationOutcome::Applied(summary) => summary,
        other => panic!("expected Applied, got {:?}", other),
    };
    assert_that!(summary.groups_resolved, eq(1));
    assert_that!(summary.accounts_deleted, eq(1));

    assert_that!(UserRepository::find_by_id(&pool, 5).await.unwrap(), none());
    assert_that!(
        UserRepository::find_by_id(&pool, 9).await.unwrap(),
        some(anything())
    );

    // And the migration is now terminal
    assert_that!(
        MigrationExecutor::state(&pool).await.unwrap(),
        eq(MigrationState::Applied)
    );
}

#[tokio::test]
async fn given_applied_migration_when_inserting_duplicate_email_then_rejected() {
    // Given: a clean database migrated to uniqueness
    let pool = create_test_pool().await;
    UserRepository::insert(&pool, &dormant_user(1, Some("first@example.com")))
        .await
        .unwrap();
    executor().run(&pool, Utc::now(), false).await.unwrap();

    // When: two more accounts try to claim one email
    UserRepository::insert(&pool, &dormant_user(2, Some("new@example.com")))
        .await
        .unwrap();
    let result = UserRepository::insert(&pool, &dormant_user(3, Some("new@example.com"))).await;

    // Then
    assert!(matches!(result, Err(DbError::Sqlx { .. })));
}

#[tokio::test]
async fn given_applied_migration_when_inserting_accounts_without_email_then_allowed() {
    // Given
    let pool = create_test_pool().await;
    executor().run(&pool, Utc::now(), false).await.unwrap();

    // When: NULL and blank emails stay outside the unique index
    UserRepository::insert(&pool, &dormant_user(1, None))
        .await
        .unwrap();
    UserRepository::insert(&pool, &dormant_user(2, None))
        .await
        .unwrap();
    UserRepository::insert(&pool, &dormant_user(3, Some("")))
        .await
        .unwrap();
    let result = UserRepository::insert(&pool, &dormant_user(4, Some(""))).await;

    // Then
    assert_that!(result.is_ok(), eq(true));
}

#[tokio::test]
async fn given_applied_migration_when_run_again_then_already_applied() {
    // Given
    let pool = create_test_pool().await;
    executor().run(&pool, Utc::now(), false).await.unwrap();

    // When
    let outcome = executor().run(&pool, Utc::now(), false).await.unwrap();

    // Then
    assert!(matches!(outcome, MigrationOutcome::AlreadyApplied));
}

// =========================================================================
// Safety gate
// =========================================================================

#[tokio::test]
async fn given_high_activity_doomed_account_when_migrated_then_blocked_and_untouched() {
    // Given: three accounts share an email; id 20 has 150 points and a
    // recent login but id 30 is the newest
    let pool = create_test_pool().await;
    UserRepository::insert(&pool, &active_user(10, Some("bob@example.com"), 0, 5, Some(300)))
        .await
        .unwrap();
    UserRepository::insert(&pool, &active_user(20, Some("bob@example.com"), 0, 150, Some(2)))
        .await
        .unwrap();
    UserRepository::insert(&pool, &active_user(30, Some("bob@example.com"), 0, 0, None))
        .await
        .unwrap();

    // When
    let outcome = executor().run(&pool, Utc::now(), false).await.unwrap();

    // Then: blocked because of account 20, and no data changed
    let report = match outcome {
        MigrationOutcome::Blocked(report) => report,
        other => panic!("expected Blocked, got {:?}", other),
    };
    assert_that!(report.blocked, len(eq(1)));
    assert_that!(report.blocked[0].score.user_id, eq(20));
    assert_that!(report.blocked[0].retained_id, eq(30));

    assert_that!(UserRepository::count(&pool).await.unwrap(), eq(3));
    assert_that!(
        MigrationExecutor::state(&pool).await.unwrap(),
        eq(MigrationState::Pending)
    );
}

#[tokio::test]
async fn given_high_activity_retained_account_when_migrated_then_proceeds() {
    // Given: the active account is the newest, so it is kept, not deleted
    let pool = create_test_pool().await;
    UserRepository::insert(&pool, &dormant_user(1, Some("carol@example.com")))
        .await
        .unwrap();
    UserRepository::insert(
        &pool,
        &active_user(2, Some("carol@example.com"), 40, 900, Some(1)),
    )
    .await
    .unwrap();

    // When
    let outcome = executor().run(&pool, Utc::now(), false).await.unwrap();

    // Then
    assert!(matches!(outcome, MigrationOutcome::Applied(_)));
    assert_that!(
        UserRepository::find_by_id(&pool, 2).await.unwrap(),
        some(anything())
    );
}

// =========================================================================
// Dry run
// =========================================================================

#[tokio::test]
async fn given_duplicates_when_dry_run_then_plan_reported_and_nothing_deleted() {
    // Given
    let pool = create_test_pool().await;
    UserRepository::insert(&pool, &dormant_user(5, Some("alice@example.com")))
        .await
        .unwrap();
    UserRepository::insert(&pool, &dormant_user(9, Some("alice@example.com")))
        .await
        .unwrap();

    // When
    let outcome = executor().run(&pool, Utc::now(), true).await.unwrap();

    // Then
    let plan = match outcome {
        MigrationOutcome::Preview(plan) => plan,
        other => panic!("expected Preview, got {:?}", other),
    };
    assert_that!(plan.groups, len(eq(1)));
    assert_that!(plan.groups[0].retained_id, eq(9));
    assert_that!(plan.groups[0].doomed_ids, eq(&vec![5]));
    assert_that!(plan.accounts_to_delete(), eq(1));

    assert_that!(UserRepository::count(&pool).await.unwrap(), eq(2));
    assert_that!(
        MigrationExecutor::state(&pool).await.unwrap(),
        eq(MigrationState::Pending)
    );
}

// =========================================================================
// Explicit cascade
// =========================================================================

#[tokio::test]
async fn given_doomed_account_with_dependents_when_migrated_then_cascade_is_complete() {
    // Given: doomed id 1 owns an issue (commented on by the survivor),
    // wrote a comment on the survivor's issue, and has awards and a profile
    let pool = create_test_pool().await;
    UserRepository::insert(&pool, &dormant_user(1, Some("dup@example.com")))
        .await
        .unwrap();
    UserRepository::insert(&pool, &dormant_user(2, Some("dup@example.com")))
        .await
        .unwrap();

    IssueRepository::insert(&pool, &test_issue(10, 1)).await.unwrap();
    IssueRepository::insert(&pool, &test_issue(11, 2)).await.unwrap();
    // Survivor's comment on the doomed issue
    CommentRepository::insert(&pool, &test_comment(100, 10, 2))
        .await
        .unwrap();
    // Doomed user's comment on the surviving issue
    CommentRepository::insert(&pool, &test_comment(101, 11, 1))
        .await
        .unwrap();
    PointAwardRepository::insert(&pool, &test_point_award(200, 1, 10))
        .await
        .unwrap();
    ProfileRepository::insert(&pool, &test_profile(1)).await.unwrap();
    ProfileRepository::insert(&pool, &test_profile(2)).await.unwrap();

    // When
    let outcome = executor().run(&pool, Utc::now(), false).await.unwrap();

    // Then: every row tied to account 1 is gone, in both directions
    let summary = match outcome {
        MigrationOutcome::Applied(summary) => summary,
        other => panic!("expected Applied, got {:?}", other),
    };
    assert_that!(summary.accounts_deleted, eq(1));
    assert_that!(summary.issues_deleted, eq(1));
    assert_that!(summary.comments_deleted, eq(2));
    assert_that!(summary.point_awards_deleted, eq(1));
    assert_that!(summary.profiles_deleted, eq(1));

    assert_that!(IssueRepository::count_by_user(&pool, 1).await.unwrap(), eq(0));
    assert_that!(
        CommentRepository::count_by_user(&pool, 1).await.unwrap(),
        eq(0)
    );
    assert_that!(
        CommentRepository::count_by_user(&pool, 2).await.unwrap(),
        eq(0) // the survivor's comment sat on a deleted issue
    );
    assert_that!(
        PointAwardRepository::count_by_user(&pool, 1).await.unwrap(),
        eq(0)
    );
    assert_that!(ProfileRepository::find_by_user(&pool, 1).await.unwrap(), none());

    // Survivor's own records are intact
    assert_that!(IssueRepository::count_by_user(&pool, 2).await.unwrap(), eq(1));
    assert_that!(
        ProfileRepository::find_by_user(&pool, 2).await.unwrap(),
        some(anything())
    );
}

#[tokio::test]
async fn given_no_duplicates_when_migrated_then_constraint_still_installed() {
    // Given: nothing to clean up
    let pool = create_test_pool().await;
    UserRepository::insert(&pool, &dormant_user(1, Some("only@example.com")))
        .await
        .unwrap();

    // When
    let outcome = executor().run(&pool, Utc::now(), false).await.unwrap();

    // Then
    let summary = match outcome {
        MigrationOutcome::Applied(summary) => summary,
        other => panic!("expected Applied, got {:?}", other),
    };
    assert_that!(summary.groups_resolved, eq(0));
    assert_that!(summary.accounts_deleted, eq(0));
    assert_that!(
        MigrationExecutor::state(&pool).await.unwrap(),
        eq(MigrationState::Applied)
    );
}
