//! Storage abstraction for Hexagon
//!
//! Uploaded objects (course files, profile pictures) live behind the
//! [`Storage`] trait so services never know which backend holds them.
//! The concrete backend is chosen once at startup from a single URL:
//!
//! - `file://./uploads` (or a bare path) → local filesystem
//! - `s3://bucket?region=..` or `s3://region/bucket` → AWS S3
//! - `minio://host:9000/bucket?access_key=..&secret_key=..` → MinIO
//!
//! Selection goes through a small registry scanned in order; adding a
//! backend means adding one [`Registration`] entry and a constructor arm.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

mod client;
mod local;
mod minio;
mod s3;

pub use local::LocalStorage;
pub use minio::MinioStorage;
pub use s3::S3Storage;

/// Objects stored under this prefix are publicly readable and get
/// unsigned URLs.
pub const PUBLIC_PREFIX: &str = "profile_pictures/";

/// Default lifetime for signed download links.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(3600);

/// Errors produced by storage backends
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("storage configuration error: {0}")]
    Config(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Options for [`Storage::url_for`]
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlOptions {
    /// Force the public or signed form instead of inferring it from the
    /// object path
    pub public: Option<bool>,
    /// Lifetime for signed links, defaulting to [`SIGNED_URL_TTL`]
    pub expires_in: Option<Duration>,
}

/// A place where uploaded objects live.
///
/// Paths are forward-slash separated keys relative to the backend's
/// root; backends must treat the same path consistently across all
/// operations.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Whether an object exists at `path`.
    async fn exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Read the full object at `path`.
    ///
    /// A missing object is [`StorageError::NotFound`], which callers
    /// surface as a 404 rather than a fault.
    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Write `data` to `path`, creating or replacing the object.
    async fn write(
        &self,
        path: &str,
        data: &[u8],
        content_type: Option<&str>,
    ) -> Result<(), StorageError>;

    /// Delete the object at `path`.
    async fn delete(&self, path: &str) -> Result<(), StorageError>;

    /// Produce a browser-usable URL for the object at `path`.
    async fn url_for(&self, path: &str, options: UrlOptions) -> Result<String, StorageError>;

    /// Registry name of the backend serving this store.
    fn backend_name(&self) -> &'static str;
}

/// Whether the object at `path` is publicly readable. The public prefix
/// always wins; an explicit flag only widens, never narrows.
pub(crate) fn is_public(path: &str, explicit: Option<bool>) -> bool {
    path.starts_with(PUBLIC_PREFIX) || explicit.unwrap_or(false)
}

/// A parsed storage URL: `scheme://authority/path?key=value&..`
///
/// This is deliberately looser than a full URL parser. Storage URLs
/// carry relative filesystem roots (`file://./uploads`) and bare hosts,
/// neither of which survive strict parsing.
#[derive(Debug, Clone)]
pub struct StorageUrl {
    scheme: String,
    location: String,
    query: Vec<(String, String)>,
}

impl StorageUrl {
    /// Parse `raw` into its parts. Never fails; a missing scheme is the
    /// empty string and missing parts are empty.
    pub fn parse(raw: &str) -> StorageUrl {
        let (scheme, rest) = match raw.split_once("://") {
            Some((scheme, rest)) => (scheme.to_ascii_lowercase(), rest),
            None => (String::new(), raw),
        };
        let (location, query_str) = match rest.split_once('?') {
            Some((location, query)) => (location, query),
            None => (rest, ""),
        };
        let query = url::form_urlencoded::parse(query_str.as_bytes())
            .into_owned()
            .collect();
        StorageUrl {
            scheme,
            location: location.to_string(),
            query,
        }
    }

    /// The lowercased scheme, or `""` when `raw` had none.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Everything between the scheme separator and the query string.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// The location up to the first `/` (host, bucket, or region).
    pub fn authority(&self) -> &str {
        self.location.split('/').next().unwrap_or("")
    }

    /// The location after the first `/`, or `""`.
    pub fn path(&self) -> &str {
        match self.location.split_once('/') {
            Some((_, path)) => path,
            None => "",
        }
    }

    /// First value for `key` in the query string, percent-decoded.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

/// How a registered backend is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackendKind {
    Local,
    S3,
    Minio,
}

/// One registry entry: a name, a scheme predicate, and the constructor
/// selector.
struct Registration {
    name: &'static str,
    accepts: fn(&str) -> bool,
    kind: BackendKind,
}

fn accepts_local(scheme: &str) -> bool {
    scheme.is_empty() || scheme == "file"
}

fn accepts_s3(scheme: &str) -> bool {
    scheme == "s3"
}

fn accepts_minio(scheme: &str) -> bool {
    scheme == "minio"
}

/// Backend registry. Scanned in order; the first match wins.
static REGISTRY: &[Registration] = &[
    Registration {
        name: "local",
        accepts: accepts_local,
        kind: BackendKind::Local,
    },
    Registration {
        name: "s3",
        accepts: accepts_s3,
        kind: BackendKind::S3,
    },
    Registration {
        name: "minio",
        accepts: accepts_minio,
        kind: BackendKind::Minio,
    },
];

fn select(scheme: &str) -> Option<&'static Registration> {
    REGISTRY
        .iter()
        .find(|registration| (registration.accepts)(scheme))
}

/// Name of the backend that would serve `raw`, if any. Useful for
/// diagnostics without constructing a client.
pub fn backend_for(raw: &str) -> Option<&'static str> {
    select(StorageUrl::parse(raw).scheme()).map(|registration| registration.name)
}

/// Construct the storage backend described by `raw`.
///
/// `public_base` is the externally visible base URL for backends that
/// serve public objects themselves (local, MinIO behind a proxy).
pub async fn from_url(
    raw: &str,
    public_base: Option<&str>,
) -> Result<Arc<dyn Storage>, StorageError> {
    let url = StorageUrl::parse(raw);
    let registration = select(url.scheme()).ok_or_else(|| {
        StorageError::Config(format!(
            "no storage backend accepts scheme {:?}",
            url.scheme()
        ))
    })?;
    let storage: Arc<dyn Storage> = match registration.kind {
        BackendKind::Local => Arc::new(LocalStorage::new(&url, public_base)),
        BackendKind::S3 => Arc::new(S3Storage::connect(&url).await?),
        BackendKind::Minio => Arc::new(MinioStorage::connect(&url, public_base).await?),
    };
    tracing::info!(backend = registration.name, "storage backend ready");
    Ok(storage)
}
