use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Post, User};
use crate::error::RepoError;

/// User repository. Owns user records and the follow graph.
///
/// `insert` and `update` must be atomic against the store's unique index on
/// `username`, surfacing a violation as [`RepoError::Constraint`] - callers
/// never pre-check availability.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: User) -> Result<User, RepoError>;

    async fn update(&self, user: User) -> Result<User, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Write-through refresh of `last_seen`; a missing user is not an error.
    async fn touch_last_seen(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), RepoError>;

    /// Add a follow edge. Returns `false` when the edge already existed.
    /// Must be a single atomic conflict-tolerant insert.
    async fn add_follow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, RepoError>;

    /// Remove a follow edge. Returns `false` when there was nothing to remove.
    async fn remove_follow(&self, follower_id: Uuid, followed_id: Uuid)
    -> Result<bool, RepoError>;

    /// Ids of every user `follower_id` follows. Never contains `follower_id`.
    async fn following_ids(&self, follower_id: Uuid) -> Result<Vec<Uuid>, RepoError>;

    async fn follower_count(&self, user_id: Uuid) -> Result<u64, RepoError>;

    async fn following_count(&self, user_id: Uuid) -> Result<u64, RepoError>;
}

/// Post repository. Posts are append-only: no update or delete.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    /// One page of posts authored by any of `author_ids`, ordered by
    /// `(created_at DESC, id DESC)`, `limit` rows starting at `offset`.
    /// An empty `author_ids` yields an empty page.
    async fn page_by_authors(
        &self,
        author_ids: &[Uuid],
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;
}
