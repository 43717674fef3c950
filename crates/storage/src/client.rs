//! Shared S3-protocol plumbing for the S3 and MinIO backends
//!
//! Both backends speak the same wire protocol through the AWS SDK; they
//! differ only in how the client is configured and how public URLs look.
//! The object operations live here once.

use std::time::Duration;

use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use tokio::sync::OnceCell;

use crate::StorageError;

pub(crate) struct BucketClient {
    client: Client,
    bucket: String,
    bucket_ready: OnceCell<()>,
}

impl BucketClient {
    pub(crate) fn new(client: Client, bucket: String) -> Self {
        Self {
            client,
            bucket,
            bucket_ready: OnceCell::new(),
        }
    }

    pub(crate) fn bucket(&self) -> &str {
        &self.bucket
    }

    pub(crate) async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                let service = err.into_service_error();
                if service.is_not_found() {
                    Ok(false)
                } else {
                    Err(StorageError::Backend(format!("head {path:?}: {service}")))
                }
            }
        }
    }

    pub(crate) async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                let service = err.into_service_error();
                return Err(if service.is_no_such_key() {
                    StorageError::NotFound(path.to_string())
                } else {
                    StorageError::Backend(format!("get {path:?}: {service}"))
                });
            }
        };
        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(format!("get {path:?}: {e}")))?;
        Ok(bytes.into_bytes().to_vec())
    }

    pub(crate) async fn write(
        &self,
        path: &str,
        data: &[u8],
        content_type: Option<&str>,
        public: bool,
    ) -> Result<(), StorageError> {
        self.ensure_bucket().await?;
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .body(ByteStream::from(data.to_vec()));
        if let Some(content_type) = content_type {
            request = request.content_type(content_type);
        }
        if public {
            request = request.acl(ObjectCannedAcl::PublicRead);
        }
        request
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("put {path:?}: {}", e.into_service_error())))?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| {
                StorageError::Backend(format!("delete {path:?}: {}", e.into_service_error()))
            })?;
        Ok(())
    }

    pub(crate) async fn signed_url(
        &self,
        path: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::Config(format!("invalid signing lifetime: {e}")))?;
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .presigned(presigning)
            .await
            .map_err(|e| {
                StorageError::Backend(format!("sign {path:?}: {}", e.into_service_error()))
            })?;
        Ok(request.uri().to_string())
    }

    /// Create the bucket on first write if it does not exist yet.
    async fn ensure_bucket(&self) -> Result<(), StorageError> {
        self.bucket_ready
            .get_or_try_init(|| async {
                let head = self
                    .client
                    .head_bucket()
                    .bucket(&self.bucket)
                    .send()
                    .await;
                if head.is_ok() {
                    return Ok(());
                }
                match self.client.create_bucket().bucket(&self.bucket).send().await {
                    Ok(_) => {
                        tracing::info!(bucket = %self.bucket, "created storage bucket");
                        Ok(())
                    }
                    Err(err) => {
                        let service = err.into_service_error();
                        if service.is_bucket_already_owned_by_you()
                            || service.is_bucket_already_exists()
                        {
                            Ok(())
                        } else {
                            Err(StorageError::Backend(format!(
                                "create bucket {:?}: {service}",
                                self.bucket
                            )))
                        }
                    }
                }
            })
            .await
            .map(|_| ())
    }
}
