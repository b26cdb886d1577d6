//! Feed composer - derives personalized timelines from the follow graph and
//! the post ledger.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{FeedPage, page_window};
use crate::error::DomainError;
use crate::ports::{PostRepository, UserRepository};

pub struct FeedComposer {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
}

impl FeedComposer {
    pub fn new(users: Arc<dyn UserRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { users, posts }
    }

    /// The home timeline: posts authored by the users `user_id` follows plus
    /// their own, ordered `(timestamp DESC, id DESC)` and sliced to the
    /// requested page. `has_more` reports whether another page exists.
    ///
    /// The union and sort run inside one store query rather than in memory;
    /// the ordering and slicing contract is identical either way.
    pub async fn home_feed(
        &self,
        user_id: Uuid,
        page: u64,
        page_size: u64,
    ) -> Result<FeedPage, DomainError> {
        let mut authors = self.users.following_ids(user_id).await?;
        // The reader always sees their own posts, followed or not.
        authors.push(user_id);

        let (offset, limit) = page_window(page, page_size);
        let rows = self.posts.page_by_authors(&authors, offset, limit).await?;
        Ok(FeedPage::from_rows(rows, page_size))
    }

    /// A single user's timeline, same ordering and pagination contract as
    /// the home feed.
    pub async fn profile_feed(
        &self,
        target_user_id: Uuid,
        page: u64,
        page_size: u64,
    ) -> Result<FeedPage, DomainError> {
        let (offset, limit) = page_window(page, page_size);
        let rows = self
            .posts
            .page_by_authors(&[target_user_id], offset, limit)
            .await?;
        Ok(FeedPage::from_rows(rows, page_size))
    }
}
