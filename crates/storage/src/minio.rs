//! MinIO storage backend
//!
//! MinIO speaks the S3 protocol but lives at its own endpoint and needs
//! explicit credentials, so the URL carries everything:
//! `minio://host:9000/bucket?access_key=..&secret_key=..&secure=false`.

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::config::SharedCredentialsProvider;
use aws_sdk_s3::Client;

use async_trait::async_trait;

use crate::client::BucketClient;
use crate::{is_public, Storage, StorageError, StorageUrl, UrlOptions, SIGNED_URL_TTL};

pub struct MinioStorage {
    store: BucketClient,
    endpoint: String,
    public_base: Option<String>,
}

impl MinioStorage {
    pub async fn connect(
        url: &StorageUrl,
        public_base: Option<&str>,
    ) -> Result<Self, StorageError> {
        let host = url.authority();
        if host.is_empty() {
            return Err(StorageError::Config(
                "minio URL is missing the host".to_string(),
            ));
        }
        let bucket = url.path().split('/').next().unwrap_or("");
        if bucket.is_empty() {
            return Err(StorageError::Config(
                "minio URL is missing the bucket name".to_string(),
            ));
        }
        let access_key = url.query("access_key").ok_or_else(|| {
            StorageError::Config("minio URL is missing the access_key parameter".to_string())
        })?;
        let secret_key = url.query("secret_key").ok_or_else(|| {
            StorageError::Config("minio URL is missing the secret_key parameter".to_string())
        })?;
        let secure = url.query("secure").map(|v| v != "false").unwrap_or(true);
        let endpoint = format!("{}://{}", if secure { "https" } else { "http" }, host);
        let region = url.query("region").unwrap_or("us-east-1").to_owned();

        let credentials = Credentials::new(access_key, secret_key, None, None, "storage-url");
        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region))
            .endpoint_url(&endpoint)
            .credentials_provider(SharedCredentialsProvider::new(credentials))
            .load()
            .await;
        // MinIO serves buckets under the path, not as virtual hosts
        let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
            .force_path_style(true)
            .build();
        let client = Client::from_conf(s3_config);

        Ok(Self {
            store: BucketClient::new(client, bucket.to_string()),
            endpoint,
            public_base: public_base.map(str::to_owned),
        })
    }
}

#[async_trait]
impl Storage for MinioStorage {
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
            let base = self.public_base.as_deref().unwrap_or(&self.endpoint);
            Ok(format!(
                "{}/{}/{}",
                base.trim_end_matches('/'),
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
        "minio"
    }
}
