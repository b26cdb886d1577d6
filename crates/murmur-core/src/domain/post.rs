use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a short text update. Immutable after creation; there is no
/// edit or delete operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with generated ID and a server-assigned timestamp.
    pub fn new(author_id: Uuid, body: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            body,
            created_at: Utc::now(),
        }
    }
}
