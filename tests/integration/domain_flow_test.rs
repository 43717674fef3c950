//! Domain flow tests through live services
//!
//! Each flow opens real sessions against the shared bundle, drives the
//! domain services under the ambient binding and checks what the
//! database holds once the session settles the way the middleware
//! would: commit unless the outcome was a fault.

mod common;

use std::future::Future;
use std::sync::Arc;

use serial_test::serial;
use uuid::Uuid;

use hexagon_accounts::service::{self as accounts, SignUp};
use hexagon_accounts::Account;
use hexagon_catalog::service as catalog;
use hexagon_common::{ServiceError, ServiceResult};
use hexagon_contact::service::{self as contact, InquiryInput};
use hexagon_contact::ADMIN_NOTIFICATION_EMAIL;
use hexagon_context::{with_session, ResourceBundle};
use hexagon_enrollments::service as enrollments;
use hexagon_enrollments::EnrollmentStatus;

use crate::common::{
    create_account, create_course, create_course_file, create_open_class, set_site_setting,
    unique, TestApp,
};

/// Run `fut` inside a fresh session and settle it like the middleware:
/// poison on fault-class errors, then close.
async fn run<F, T>(bundle: &Arc<ResourceBundle>, fut: F) -> ServiceResult<T>
where
    F: Future<Output = ServiceResult<T>>,
{
    let session = Arc::new(bundle.open());
    let result = with_session(session.clone(), fut).await;
    if result.as_ref().is_err_and(ServiceError::is_fault) {
        session.fail();
    }
    session.close().await;
    result
}

fn password_sign_up(subject: &str) -> SignUp {
    SignUp {
        subject: subject.to_string(),
        email: format!("{subject}@hexagon.test"),
        display_name: format!("Test {subject}"),
        login_method: "password".to_string(),
        picture_url: None,
    }
}

#[tokio::test]
#[ignore] // Requires a running Postgres - run with --ignored
async fn test_sign_up_then_sign_in_round_trip() {
    let app = TestApp::new().await.unwrap();
    let subject = unique("signup");

    let created = run(&app.bundle, accounts::sign_up(password_sign_up(&subject)))
        .await
        .unwrap();
    assert!(created.active);
    assert_eq!(created.login_method, "password");

    let signed_in = run(&app.bundle, accounts::sign_in(&subject)).await.unwrap();
    assert_eq!(signed_in.id, created.id);

    // A second sign-up refreshes the existing account instead of
    // creating another row.
    let refreshed = run(&app.bundle, accounts::sign_up(password_sign_up(&subject)))
        .await
        .unwrap();
    assert_eq!(refreshed.id, created.id);
    assert!(refreshed.last_login_at >= created.last_login_at);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE subject = $1")
        .bind(&subject)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore] // Requires a running Postgres - run with --ignored
async fn test_withdrawn_account_cannot_return() {
    let app = TestApp::new().await.unwrap();
    let subject = unique("leaver");

    let account = run(&app.bundle, accounts::sign_up(password_sign_up(&subject)))
        .await
        .unwrap();
    run(&app.bundle, accounts::withdraw(&account)).await.unwrap();

    let denied = run(&app.bundle, accounts::sign_in(&subject)).await;
    assert!(matches!(denied, Err(ServiceError::Unauthorized(_))));

    let denied = run(&app.bundle, accounts::sign_up(password_sign_up(&subject))).await;
    assert!(matches!(denied, Err(ServiceError::Unauthorized(_))));
}

#[tokio::test]
#[ignore] // Requires a running Postgres - run with --ignored
async fn test_enrollment_happy_path() {
    let app = TestApp::new().await.unwrap();
    let account = create_account(&app.pool, &unique("student")).await.unwrap();
    let course_id = create_course(&app.pool, &unique("course")).await.unwrap();
    let code = unique("HEX");
    create_open_class(&app.pool, course_id, &code, 5).await.unwrap();

    let summary = run(
        &app.bundle,
        enrollments::enroll_by_class_code(&account, &code),
    )
    .await
    .unwrap();
    assert_eq!(summary.class_code, code);
    assert_eq!(summary.status, EnrollmentStatus::Pending);

    let (listed, total) = run(
        &app.bundle,
        enrollments::list_enrollments(&account, None, 0, 20),
    )
    .await
    .unwrap();
    assert_eq!(total, 1);
    assert_eq!(listed[0].id, summary.id);

    let fetched = run(
        &app.bundle,
        enrollments::get_enrollment(&account, summary.id),
    )
    .await
    .unwrap();
    assert_eq!(fetched.id, summary.id);
}

#[tokio::test]
#[ignore] // Requires a running Postgres - run with --ignored
async fn test_duplicate_enrollment_is_rejected() {
    let app = TestApp::new().await.unwrap();
    let account = create_account(&app.pool, &unique("student")).await.unwrap();
    let course_id = create_course(&app.pool, &unique("course")).await.unwrap();
    let code = unique("HEX");
    create_open_class(&app.pool, course_id, &code, 5).await.unwrap();

    run(
        &app.bundle,
        enrollments::enroll_by_class_code(&account, &code),
    )
    .await
    .unwrap();
    let denied = run(
        &app.bundle,
        enrollments::enroll_by_class_code(&account, &code),
    )
    .await;
    assert!(matches!(denied, Err(ServiceError::InvalidRequest(_))));
}

#[tokio::test]
#[ignore] // Requires a running Postgres - run with --ignored
async fn test_unknown_class_code_is_not_found() {
    let app = TestApp::new().await.unwrap();
    let account = create_account(&app.pool, &unique("student")).await.unwrap();

    let missing = run(
        &app.bundle,
        enrollments::enroll_by_class_code(&account, &unique("NOPE")),
    )
    .await;
    assert!(matches!(missing, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
#[ignore] // Requires a running Postgres - run with --ignored
async fn test_full_class_rejects_further_enrollments() {
    let app = TestApp::new().await.unwrap();
    let first = create_account(&app.pool, &unique("first")).await.unwrap();
    let second = create_account(&app.pool, &unique("second")).await.unwrap();
    let course_id = create_course(&app.pool, &unique("course")).await.unwrap();
    let code = unique("HEX");
    create_open_class(&app.pool, course_id, &code, 1).await.unwrap();

    run(&app.bundle, enrollments::enroll_by_class_code(&first, &code))
        .await
        .unwrap();
    let denied = run(
        &app.bundle,
        enrollments::enroll_by_class_code(&second, &code),
    )
    .await;
    assert!(matches!(denied, Err(ServiceError::InvalidRequest(_))));
}

#[tokio::test]
#[ignore] // Requires a running Postgres - run with --ignored
async fn test_concurrent_enrollments_fill_one_seat_once() {
    let app = TestApp::new().await.unwrap();
    let first = create_account(&app.pool, &unique("first")).await.unwrap();
    let second = create_account(&app.pool, &unique("second")).await.unwrap();
    let course_id = create_course(&app.pool, &unique("course")).await.unwrap();
    let code = unique("HEX");
    let class_id = create_open_class(&app.pool, course_id, &code, 1).await.unwrap();

    let flow = |bundle: Arc<ResourceBundle>, account: Account, code: String| async move {
        let session = Arc::new(bundle.open());
        let result = with_session(
            session.clone(),
            enrollments::enroll_by_class_code(&account, &code),
        )
        .await;
        if result.as_ref().is_err_and(ServiceError::is_fault) {
            session.fail();
        }
        session.close().await;
        result
    };

    let a = tokio::spawn(flow(app.bundle.clone(), first, code.clone()));
    let b = tokio::spawn(flow(app.bundle.clone(), second, code.clone()));
    let a = a.await.unwrap();
    let b = b.await.unwrap();

    assert_eq!(
        a.is_ok() as u8 + b.is_ok() as u8,
        1,
        "exactly one of two racing enrollments may win the last seat"
    );

    let active: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE class_id = $1 AND active")
            .bind(class_id)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(active, 1);
}

#[tokio::test]
#[serial]
#[ignore] // Requires a running Postgres - run with --ignored
async fn test_contact_inquiry_reaches_the_admin_inbox() {
    let app = TestApp::new().await.unwrap();
    set_site_setting(&app.pool, ADMIN_NOTIFICATION_EMAIL, "staff@hexagon.test")
        .await
        .unwrap();

    let full_name = unique("caller");
    let inquiry = run(
        &app.bundle,
        contact::submit_inquiry(InquiryInput {
            full_name: full_name.clone(),
            phone: "010-1234-5678".to_string(),
            email: Some("caller@hexagon.test".to_string()),
            message: "Please call me back.".to_string(),
            course_id: None,
        }),
    )
    .await
    .unwrap();
    assert_eq!(inquiry.full_name, full_name);

    let stored: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM contact_inquiries WHERE full_name = $1")
            .bind(&full_name)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(stored, 1);
}

#[tokio::test]
#[serial]
#[ignore] // Requires a running Postgres - run with --ignored
async fn test_inquiry_without_admin_inbox_is_still_stored() {
    let app = TestApp::new().await.unwrap();
    sqlx::query("DELETE FROM site_settings WHERE key = $1")
        .bind(ADMIN_NOTIFICATION_EMAIL)
        .execute(&app.pool)
        .await
        .unwrap();

    let full_name = unique("caller");
    let outcome = run(
        &app.bundle,
        contact::submit_inquiry(InquiryInput {
            full_name: full_name.clone(),
            phone: "010-1234-5678".to_string(),
            email: None,
            message: "Please call me back.".to_string(),
            course_id: None,
        }),
    )
    .await;
    assert!(matches!(outcome, Err(ServiceError::Config(_))));

    // The misconfiguration is not a session fault; the inquiry row
    // commits and staff can still find it in the back office.
    let stored: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM contact_inquiries WHERE full_name = $1")
            .bind(&full_name)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(stored, 1);
}

#[tokio::test]
#[ignore] // Requires a running Postgres - run with --ignored
async fn test_inquiry_about_unknown_course_is_not_found() {
    let app = TestApp::new().await.unwrap();

    let full_name = unique("caller");
    let outcome = run(
        &app.bundle,
        contact::submit_inquiry(InquiryInput {
            full_name: full_name.clone(),
            phone: "010-1234-5678".to_string(),
            email: None,
            message: "Asking about a course that does not exist.".to_string(),
            course_id: Some(Uuid::new_v4()),
        }),
    )
    .await;
    assert!(matches!(outcome, Err(ServiceError::NotFound(_))));

    let stored: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM contact_inquiries WHERE full_name = $1")
            .bind(&full_name)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(stored, 0);
}

#[tokio::test]
#[ignore] // Requires a running Postgres - run with --ignored
async fn test_course_catalog_listing_matches_the_database() {
    let app = TestApp::new().await.unwrap();
    let slug = unique("course");
    let course_id = create_course(&app.pool, &slug).await.unwrap();

    let fetched = run(&app.bundle, catalog::get_course(&slug)).await.unwrap();
    assert_eq!(fetched.id, course_id);

    let (_, total) = run(&app.bundle, catalog::list_courses(0, 20)).await.unwrap();
    let db_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE active")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(total, db_count);
}

#[tokio::test]
#[ignore] // Requires a running Postgres - run with --ignored
async fn test_file_download_requires_an_enrollment() {
    let app = TestApp::new().await.unwrap();
    let course_id = create_course(&app.pool, &unique("course")).await.unwrap();
    let object_key = format!("courses/{course_id}/syllabus.pdf");
    app.bundle
        .storage()
        .write(&object_key, b"course material", Some("application/pdf"))
        .await
        .unwrap();
    let file_id = create_course_file(&app.pool, course_id, &object_key, "enrolled")
        .await
        .unwrap();

    let denied = run(&app.bundle, catalog::download_file(file_id, None)).await;
    assert!(matches!(denied, Err(ServiceError::Forbidden(_))));

    let outsider = create_account(&app.pool, &unique("outsider")).await.unwrap();
    let denied = run(&app.bundle, catalog::download_file(file_id, Some(&outsider))).await;
    assert!(matches!(denied, Err(ServiceError::Forbidden(_))));

    let student = create_account(&app.pool, &unique("student")).await.unwrap();
    let code = unique("HEX");
    create_open_class(&app.pool, course_id, &code, 5).await.unwrap();
    run(
        &app.bundle,
        enrollments::enroll_by_class_code(&student, &code),
    )
    .await
    .unwrap();

    let (file, url) = run(&app.bundle, catalog::download_file(file_id, Some(&student)))
        .await
        .unwrap();
    assert_eq!(file.id, file_id);
    assert!(url.contains(&object_key));

    let downloads: i64 =
        sqlx::query_scalar("SELECT download_count FROM course_files WHERE id = $1")
            .bind(file_id)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(downloads, 1);
}

#[tokio::test]
#[ignore] // Requires a running Postgres - run with --ignored
async fn test_public_file_downloads_for_anyone() {
    let app = TestApp::new().await.unwrap();
    let course_id = create_course(&app.pool, &unique("course")).await.unwrap();
    let object_key = format!("courses/{course_id}/brochure.pdf");
    app.bundle
        .storage()
        .write(&object_key, b"brochure", Some("application/pdf"))
        .await
        .unwrap();
    let file_id = create_course_file(&app.pool, course_id, &object_key, "public")
        .await
        .unwrap();

    let (file, url) = run(&app.bundle, catalog::download_file(file_id, None))
        .await
        .unwrap();
    assert_eq!(file.id, file_id);
    assert!(url.contains(&object_key));
}
