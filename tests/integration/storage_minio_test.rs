//! Storage backend tests against a live MinIO
//!
//! These exercise the real S3 protocol path: object round trips,
//! presigned links for private objects and plain links for the public
//! prefix. They need a MinIO with the test bucket already created, so
//! they are ignored by default; point `TEST_MINIO_URL` at yours and run
//! with `--ignored`.

mod common;

use std::env;
use std::time::Duration;

use hexagon_storage::{from_url, Storage, StorageError, UrlOptions, PUBLIC_PREFIX};

use crate::common::unique;

async fn minio_storage() -> std::sync::Arc<dyn Storage> {
    dotenvy::dotenv().ok();
    let url = env::var("TEST_MINIO_URL").unwrap_or_else(|_| {
        "minio://localhost:9000/hexagon-test?access_key=minioadmin&secret_key=minioadmin&secure=false"
            .to_string()
    });
    from_url(&url, None).await.unwrap()
}

#[tokio::test]
#[ignore] // Requires a running MinIO with the test bucket - run with --ignored
async fn test_object_round_trip() {
    let storage = minio_storage().await;
    let path = format!("integration/{}.txt", unique("object"));

    assert!(!storage.exists(&path).await.unwrap());
    storage
        .write(&path, b"round trip payload", Some("text/plain"))
        .await
        .unwrap();
    assert!(storage.exists(&path).await.unwrap());
    assert_eq!(storage.read(&path).await.unwrap(), b"round trip payload");

    storage.delete(&path).await.unwrap();
    assert!(!storage.exists(&path).await.unwrap());
    assert!(matches!(
        storage.read(&path).await,
        Err(StorageError::NotFound(_))
    ));
}

#[tokio::test]
#[ignore] // Requires a running MinIO with the test bucket - run with --ignored
async fn test_private_object_gets_a_signed_link() {
    let storage = minio_storage().await;
    let path = format!("integration/{}.pdf", unique("private"));
    storage
        .write(&path, b"private", Some("application/pdf"))
        .await
        .unwrap();

    let link = storage.url_for(&path, UrlOptions::default()).await.unwrap();
    assert!(link.contains("X-Amz-Signature"), "expected a presigned link: {link}");

    storage.delete(&path).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires a running MinIO with the test bucket - run with --ignored
async fn test_signed_link_expiry_is_configurable() {
    let storage = minio_storage().await;
    let path = format!("integration/{}.pdf", unique("expiry"));
    storage
        .write(&path, b"private", Some("application/pdf"))
        .await
        .unwrap();

    let options = UrlOptions {
        public: None,
        expires_in: Some(Duration::from_secs(60)),
    };
    let link = storage.url_for(&path, options).await.unwrap();
    assert!(link.contains("X-Amz-Expires=60"), "expected a 60s expiry: {link}");

    storage.delete(&path).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires a running MinIO with the test bucket - run with --ignored
async fn test_public_prefix_gets_a_plain_link() {
    let storage = minio_storage().await;
    let path = format!("{PUBLIC_PREFIX}{}.jpg", unique("avatar"));
    storage.write(&path, b"avatar", Some("image/jpeg")).await.unwrap();

    let link = storage.url_for(&path, UrlOptions::default()).await.unwrap();
    assert!(link.ends_with(&path), "expected a plain public link: {link}");
    assert!(!link.contains("X-Amz"), "public links are unsigned: {link}");

    storage.delete(&path).await.unwrap();
}
