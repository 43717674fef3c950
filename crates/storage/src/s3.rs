//! AWS S3 storage backend
//!
//! Accepts both URL shapes seen in deployment configs:
//! `s3://bucket?region=eu-west-1` and the older `s3://region/bucket`.
//! Credentials may ride along as `access_key`/`secret_key` query
//! parameters; otherwise the ambient AWS credential chain applies.

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::config::SharedCredentialsProvider;
use aws_sdk_s3::Client;

use async_trait::async_trait;

use crate::client::BucketClient;
use crate::{is_public, Storage, StorageError, StorageUrl, UrlOptions, SIGNED_URL_TTL};

pub struct S3Storage {
    store: BucketClient,
}

impl S3Storage {
    pub async fn connect(url: &StorageUrl) -> Result<Self, StorageError> {
        let (region, bucket) = if url.path().is_empty() {
            (url.query("region").map(str::to_owned), url.authority())
        } else {
            (
                Some(url.authority().to_owned()),
                url.path().split('/').next().unwrap_or(""),
            )
        };
        if bucket.is_empty() {
            return Err(StorageError::Config(
                "storage URL is missing the bucket name".to_string(),
            ));
        }
        let region = region.unwrap_or_else(|| "us-east-1".to_string());

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region));
        if let (Some(access_key), Some(secret_key)) =
            (url.query("access_key"), url.query("secret_key"))
        {
            let credentials = Credentials::new(access_key, secret_key, None, None, "storage-url");
            loader = loader.credentials_provider(SharedCredentialsProvider::new(credentials));
        }
        let aws_config = loader.load().await;
        let client = Client::new(&aws_config);

        Ok(Self {
            store: BucketClient::new(client, bucket.to_string()),
        })
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        self.store.exists(path).await
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        self.store.read(path).await
    }

    async fn write(
        &self,
        path: &str,
        data: &[u8],
        content_type: Option<&str>,
    ) -> Result<(), StorageError> {
        self.store
            .write(path, data, content_type, is_public(path, None))
            .await
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        self.store.delete(path).await
    }

    async fn url_for(&self, path: &str, options: UrlOptions) -> Result<String, StorageError> {
        if is_public(path, options.public) {
            Ok(format!(
                "https://{}.s3.amazonaws.com/{}",
                self.store.bucket(),
                path
            ))
        } else {
            self.store
                .signed_url(path, options.expires_in.unwrap_or(SIGNED_URL_TTL))
                .await
        }
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}
