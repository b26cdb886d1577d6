//! Post ledger - the append-only collection of posts.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{FeedPage, Post, page_window};
use crate::error::DomainError;
use crate::ports::PostRepository;

pub struct PostLedger {
    posts: Arc<dyn PostRepository>,
}

impl PostLedger {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Persist a post with a server-assigned timestamp. Empty or
    /// whitespace-only bodies are rejected.
    pub async fn create_post(&self, author_id: Uuid, body: &str) -> Result<Post, DomainError> {
        if body.trim().is_empty() {
            return Err(DomainError::EmptyBody);
        }

        let post = self.posts.insert(Post::new(author_id, body.to_string())).await?;
        tracing::debug!(post_id = %post.id, author_id = %author_id, "post created");
        Ok(post)
    }

    /// One page of a single author's posts, newest first.
    pub async fn posts_by_author(
        &self,
        author_id: Uuid,
        page: u64,
        page_size: u64,
    ) -> Result<FeedPage, DomainError> {
        let (offset, limit) = page_window(page, page_size);
        let rows = self.posts.page_by_authors(&[author_id], offset, limit).await?;
        Ok(FeedPage::from_rows(rows, page_size))
    }
}
