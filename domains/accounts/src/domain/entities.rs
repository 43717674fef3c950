//! Domain entities for the accounts domain
//!
//! An account is the platform-side record behind one identity-provider
//! subject. Accounts are soft-deleted: withdrawal flips `active` off and
//! the row stays behind for enrollment history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hexagon_storage::PUBLIC_PREFIX;

/// Sign-in provider value for Google accounts, whose avatars get
/// mirrored into our own storage.
pub const GOOGLE_PROVIDER: &str = "google.com";

/// Extensions a mirrored profile picture may keep from its source URL
const PICTURE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Account entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    /// Identity-provider subject, the stable lookup key
    pub subject: String,
    pub email: String,
    pub display_name: String,
    /// Sign-in provider reported at sign-up (`google.com`, `password`, ...)
    pub login_method: String,
    /// Storage object key, or a plain URL when mirroring was skipped
    pub picture_path: Option<String>,
    pub bio: Option<String>,
    pub active: bool,
    pub joined_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

impl Account {
    /// Create a fresh, active account for a first sign-up.
    pub fn new(subject: String, email: String, display_name: String, login_method: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            subject,
            email,
            display_name,
            login_method,
            picture_path: None,
            bio: None,
            active: true,
            joined_at: now,
            last_login_at: now,
        }
    }

    /// Whether the stored picture is an external URL rather than one of
    /// our storage object keys.
    pub fn picture_is_external(&self) -> bool {
        self.picture_path
            .as_deref()
            .is_some_and(|path| path.starts_with("http"))
    }
}

/// Object key a mirrored profile picture is stored under.
///
/// The extension is taken from the source URL when it looks like a known
/// image extension, otherwise `jpg`. The key sits under the public
/// prefix so the stored picture gets a plain public URL.
pub fn picture_object_key(account_id: Uuid, source_url: &str) -> String {
    let ext = source_url
        .rsplit('.')
        .next()
        .map(str::to_ascii_lowercase)
        .filter(|tail| PICTURE_EXTENSIONS.contains(&tail.as_str()))
        .unwrap_or_else(|| "jpg".to_string());
    format!("{PUBLIC_PREFIX}{account_id}.{ext}")
}
