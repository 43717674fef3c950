//! Session lifecycle tests against a live database
//!
//! These pin down the transactional contract of the request session:
//! the transaction starts lazily, a healthy close commits, a poisoned
//! close rolls back, and the transaction is released exactly once.

mod common;

use std::sync::Arc;

use hexagon_accounts::service::{self as accounts, SignUp};
use hexagon_context::{with_session, CloseOutcome, ResourceSession};
use sqlx::PgPool;

use crate::common::{unique, TestApp};

async fn setting_value(pool: &PgPool, key: &str) -> Option<String> {
    sqlx::query_scalar("SELECT value FROM site_settings WHERE key = $1")
        .bind(key)
        .fetch_optional(pool)
        .await
        .unwrap()
}

/// Write a scratch row through the ambient session's transaction, the
/// way repository code reaches it.
async fn write_setting(key: &str, value: &str) {
    let session = ResourceSession::current().unwrap();
    let mut tx = session.tx().await.unwrap();
    sqlx::query("INSERT INTO site_settings (key, value) VALUES ($1, $2)")
        .bind(key)
        .bind(value)
        .execute(&mut **tx)
        .await
        .unwrap();
}

#[tokio::test]
#[ignore] // Requires a running Postgres - run with --ignored
async fn test_idle_session_closes_without_a_transaction() {
    let app = TestApp::new().await.unwrap();
    let session = app.session();

    assert!(session.is_healthy());
    assert_eq!(session.close().await, CloseOutcome::Idle);
}

#[tokio::test]
#[ignore] // Requires a running Postgres - run with --ignored
async fn test_healthy_close_commits_the_write() {
    let app = TestApp::new().await.unwrap();
    let key = unique("commit");

    let session = app.session();
    with_session(session.clone(), write_setting(&key, "kept")).await;
    assert_eq!(session.close().await, CloseOutcome::Committed);

    assert_eq!(setting_value(&app.pool, &key).await.as_deref(), Some("kept"));

    sqlx::query("DELETE FROM site_settings WHERE key = $1")
        .bind(&key)
        .execute(&app.pool)
        .await
        .unwrap();
}

#[tokio::test]
#[ignore] // Requires a running Postgres - run with --ignored
async fn test_poisoned_close_rolls_the_write_back() {
    let app = TestApp::new().await.unwrap();
    let key = unique("rollback");

    let session = app.session();
    with_session(session.clone(), write_setting(&key, "dropped")).await;
    session.fail();
    assert!(!session.is_healthy());
    assert_eq!(session.close().await, CloseOutcome::RolledBack);

    assert_eq!(setting_value(&app.pool, &key).await, None);
}

#[tokio::test]
#[ignore] // Requires a running Postgres - run with --ignored
async fn test_close_releases_the_transaction_exactly_once() {
    let app = TestApp::new().await.unwrap();
    let key = unique("once");

    let session = app.session();
    with_session(session.clone(), write_setting(&key, "kept")).await;
    assert_eq!(session.close().await, CloseOutcome::Committed);
    assert_eq!(session.close().await, CloseOutcome::Idle);

    sqlx::query("DELETE FROM site_settings WHERE key = $1")
        .bind(&key)
        .execute(&app.pool)
        .await
        .unwrap();
}

#[tokio::test]
#[ignore] // Requires a running Postgres - run with --ignored
async fn test_failing_after_close_does_not_resurrect_the_transaction() {
    let app = TestApp::new().await.unwrap();
    let key = unique("late_fail");

    let session = app.session();
    with_session(session.clone(), write_setting(&key, "kept")).await;
    assert_eq!(session.close().await, CloseOutcome::Committed);

    // Poisoning after the release changes nothing; the commit stands.
    session.fail();
    assert_eq!(session.close().await, CloseOutcome::Idle);
    assert_eq!(setting_value(&app.pool, &key).await.as_deref(), Some("kept"));

    sqlx::query("DELETE FROM site_settings WHERE key = $1")
        .bind(&key)
        .execute(&app.pool)
        .await
        .unwrap();
}

#[tokio::test]
#[ignore] // Requires a running Postgres - run with --ignored
async fn test_concurrent_sign_ups_create_exactly_one_account() {
    let app = TestApp::new().await.unwrap();
    let subject = unique("racer");

    let sign_up_flow = |bundle: Arc<hexagon_context::ResourceBundle>, subject: String| async move {
        let session = Arc::new(bundle.open());
        let input = SignUp {
            subject,
            email: "racer@hexagon.test".to_string(),
            display_name: "Racer".to_string(),
            login_method: "password".to_string(),
            picture_url: None,
        };
        let result = with_session(session.clone(), accounts::sign_up(input)).await;
        session.close().await;
        result
    };

    let first = tokio::spawn(sign_up_flow(app.bundle.clone(), subject.clone()));
    let second = tokio::spawn(sign_up_flow(app.bundle.clone(), subject.clone()));

    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();
    assert_eq!(first.id, second.id);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE subject = $1")
        .bind(&subject)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}
