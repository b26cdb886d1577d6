use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of the free-text profile blurb, in characters.
pub const ABOUT_ME_MAX_CHARS: usize = 140;

/// User entity - identity plus profile data.
///
/// `username` is unique across all users; the uniqueness is owed to a
/// storage-level constraint, not to anything this type enforces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub about_me: String,
    pub last_seen: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            about_me: String::new(),
            last_seen: now,
            created_at: now,
        }
    }
}
