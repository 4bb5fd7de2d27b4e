mod common;

use common::{active_user, create_test_pool, dormant_user};

use dedupe_db::{DbError, UserRepository};

use googletest::assert_that;
use googletest::prelude::{anything, eq, len, none, some};

#[tokio::test]
async fn given_valid_user_when_inserted_then_can_be_found_by_id() {
    // Given
    let pool = create_test_pool().await;
    let user = active_user(7, Some("seven@example.com"), 3, 40, Some(10));

    // When
    UserRepository::insert(&pool, &user).await.unwrap();

    // Then
    let result = UserRepository::find_by_id(&pool, 7).await.unwrap();

    assert_that!(result, some(anything()));
    let found = result.unwrap();
    assert_that!(found.id, eq(7));
    assert_that!(found.username, eq("user7"));
    assert_that!(found.email, some(eq("seven@example.com")));
    assert_that!(found.issues_reported, eq(3));
    assert_that!(found.points_total, eq(40));
    assert_that!(found.last_login.is_some(), eq(true));
}

#[tokio::test]
async fn given_empty_database_when_finding_nonexistent_id_then_returns_none() {
    // Given
    let pool = create_test_pool().await;

    // When
    let result = UserRepository::find_by_id(&pool, 999).await.unwrap();

    // Then
    assert_that!(result, none());
}

#[tokio::test]
async fn given_user_without_email_when_round_tripped_then_email_stays_none() {
    // Given
    let pool = create_test_pool().await;
    let user = dormant_user(1, None);

    // When
    UserRepository::insert(&pool, &user).await.unwrap();

    // Then
    let found = UserRepository::find_by_id(&pool, 1).await.unwrap().unwrap();
    assert_that!(found.email, none());
}

#[tokio::test]
async fn given_users_inserted_out_of_order_when_finding_all_then_ascending_id() {
    // Given
    let pool = create_test_pool().await;
    for id in [30, 10, 20] {
        UserRepository::insert(&pool, &dormant_user(id, None))
            .await
            .unwrap();
    }

    // When
    let users = UserRepository::find_all(&pool).await.unwrap();

    // Then
    assert_that!(users, len(eq(3)));
    let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
    assert_that!(ids, eq(&vec![10, 20, 30]));
}

#[tokio::test]
async fn given_unknown_user_when_setting_email_then_user_not_found() {
    // Given
    let pool = create_test_pool().await;

    // When
    let result = UserRepository::set_email(&pool, 42, "nobody@example.com").await;

    // Then
    assert!(matches!(result, Err(DbError::UserNotFound { user_id: 42, .. })));
}

#[tokio::test]
async fn given_mixed_case_stored_email_when_checking_usage_then_conflict_detected() {
    // Given: a legacy row with an un-normalized email
    let pool = create_test_pool().await;
    UserRepository::insert(&pool, &dormant_user(1, Some("Taken@Example.com")))
        .await
        .unwrap();

    // When: another account asks for the normalized form
    let in_use = UserRepository::email_in_use_by_other(&pool, "taken@example.com", 2)
        .await
        .unwrap();

    // Then
    assert_that!(in_use, eq(true));
}

#[tokio::test]
async fn given_own_email_when_checking_usage_excluding_self_then_no_conflict() {
    // Given
    let pool = create_test_pool().await;
    UserRepository::insert(&pool, &dormant_user(1, Some("mine@example.com")))
        .await
        .unwrap();

    // When
    let in_use = UserRepository::email_in_use_by_other(&pool, "mine@example.com", 1)
        .await
        .unwrap();

    // Then
    assert_that!(in_use, eq(false));
}

#[tokio::test]
async fn given_existing_user_when_deleted_then_gone_and_count_drops() {
    // Given
    let pool = create_test_pool().await;
    UserRepository::insert(&pool, &dormant_user(1, None))
        .await
        .unwrap();
    UserRepository::insert(&pool, &dormant_user(2, None))
        .await
        .unwrap();

    // When
    let deleted = UserRepository::delete(&pool, 1).await.unwrap();

    // Then
    assert_that!(deleted, eq(1));
    assert_that!(UserRepository::find_by_id(&pool, 1).await.unwrap(), none());
    assert_that!(UserRepository::count(&pool).await.unwrap(), eq(1));
}

#[tokio::test]
async fn given_stored_last_login_when_read_back_then_second_precision_kept() {
    // Given
    let pool = create_test_pool().await;
    let user = active_user(1, None, 0, 0, Some(5));
    let expected = user.last_login.unwrap().timestamp();

    // When
    UserRepository::insert(&pool, &user).await.unwrap();

    // Then
    let found = UserRepository::find_by_id(&pool, 1).await.unwrap().unwrap();
    assert_that!(found.last_login.unwrap().timestamp(), eq(expected));
}
