//! HTTP surface tests that run without live infrastructure
//!
//! The router is built over a lazily connecting pool, so everything
//! here must be decided before the first database call: probes,
//! routing, bearer-token rejection and request validation.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::common::offline_app;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_probe_answers() {
    let app = offline_app().await;

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = offline_app().await;

    let response = app
        .oneshot(Request::get("/v1/me").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let error = body_json(response).await;
    assert_eq!(error["code"], "UNAUTHORIZED");
    assert!(error["message"].as_str().is_some());
}

#[tokio::test]
async fn test_non_bearer_scheme_is_unauthorized() {
    let app = offline_app().await;

    let response = app
        .oneshot(
            Request::get("/v1/me")
                .header("authorization", "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = offline_app().await;

    let response = app
        .oneshot(
            Request::get("/v1/me")
                .header("authorization", "Bearer not.a.token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = offline_app().await;

    let response = app
        .oneshot(Request::get("/v1/nothing").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_contact_validation_failure_is_flat_error() {
    let app = offline_app().await;

    // Blank name fails validation before any resource is touched.
    let payload = json!({
        "full_name": "",
        "phone": "010-1234-5678",
        "message": "Please call me back."
    });
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/v1/contact")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await;
    assert_eq!(error["code"], "INVALID_REQUEST");
    assert!(error["message"].as_str().unwrap().contains("full_name"));
}

#[tokio::test]
async fn test_contact_malformed_json_is_bad_request() {
    let app = offline_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/v1/contact")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn test_enroll_requires_authentication() {
    let app = offline_app().await;

    let payload = json!({ "class_code": "HEX-101" });
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/v1/enrollments")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}
