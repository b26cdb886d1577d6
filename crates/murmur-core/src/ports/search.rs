//! Full-text search port. Indexing and relevance ranking are the search
//! engine's concern; the core only consumes an ordered result sequence.

use async_trait::async_trait;

use crate::domain::Post;

#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Search post bodies, returning at most `limit` posts in the backend's
    /// ranking order.
    async fn search(&self, query: &str, limit: u64) -> Result<Vec<Post>, SearchError>;
}

/// Search backend errors.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Search backend error: {0}")]
    Backend(String),
}
