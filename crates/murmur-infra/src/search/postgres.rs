//! Substring search over post bodies.
//!
//! A stand-in for a dedicated search engine: a `LIKE` scan ordered by
//! recency. The ranking algorithm remains the backend's concern, so callers
//! only see an ordered sequence of posts.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DbConn, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use murmur_core::domain::Post;
use murmur_core::ports::{SearchError, SearchIndex};

use crate::database::entity::post::{self, Entity as PostEntity};

pub struct PostgresSearchIndex {
    db: DbConn,
}

impl PostgresSearchIndex {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SearchIndex for PostgresSearchIndex {
    async fn search(&self, query: &str, limit: u64) -> Result<Vec<Post>, SearchError> {
        let needle = query.trim();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let rows = PostEntity::find()
            .filter(post::Column::Body.contains(needle))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| SearchError::Backend(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
