//! Local filesystem storage backend
//!
//! Development and single-host deployments keep objects under a plain
//! directory. URLs are produced by joining the configured public base,
//! so something else (a static file route, nginx) must actually serve
//! the directory.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::{Storage, StorageError, StorageUrl, UrlOptions};

pub struct LocalStorage {
    root: PathBuf,
    public_base: Option<String>,
}

impl LocalStorage {
    pub fn new(url: &StorageUrl, public_base: Option<&str>) -> Self {
        Self::at_root(PathBuf::from(url.location()), public_base)
    }

    /// Construct directly from a root directory, bypassing URL parsing.
    pub fn at_root(root: impl Into<PathBuf>, public_base: Option<&str>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.map(str::to_owned),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        tokio::fs::try_exists(self.resolve(path))
            .await
            .map_err(|e| StorageError::Backend(format!("stat {path:?}: {e}")))
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        match tokio::fs::read(self.resolve(path)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(StorageError::Backend(format!("read {path:?}: {e}"))),
        }
    }

    async fn write(
        &self,
        path: &str,
        data: &[u8],
        _content_type: Option<&str>,
    ) -> Result<(), StorageError> {
        // content type is meaningless on a plain filesystem
        let target = self.resolve(path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Backend(format!("mkdir for {path:?}: {e}")))?;
        }
        tokio::fs::write(&target, data)
            .await
            .map_err(|e| StorageError::Backend(format!("write {path:?}: {e}")))
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.resolve(path)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(StorageError::Backend(format!("delete {path:?}: {e}"))),
        }
    }

    async fn url_for(&self, path: &str, _options: UrlOptions) -> Result<String, StorageError> {
        // the filesystem has no signing story; every URL is the public form
        let base = self.public_base.as_deref().ok_or_else(|| {
            StorageError::Config(
                "STORAGE_PUBLIC_URL is required to produce URLs for locally stored objects"
                    .to_string(),
            )
        })?;
        Ok(format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
