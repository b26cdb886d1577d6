//! In-memory implementations of the storage ports.
//!
//! Used as the fallback when no database is configured, and as fixtures for
//! service-level tests. Data is lost on process restart. The username
//! uniqueness check runs under the same write lock as the insert, mirroring
//! the unique index the relational store enforces.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use murmur_core::domain::{Post, User, feed_ordering};
use murmur_core::error::RepoError;
use murmur_core::ports::{
    AuthError, PostRepository, SearchError, SearchIndex, Session, SessionStore, UserRepository,
};

/// In-memory user repository. Owns the follow graph, like its Postgres
/// counterpart.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
    follows: RwLock<HashSet<(Uuid, Uuid)>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint(
                "duplicate key value violates unique constraint \"users_username_key\""
                    .to_string(),
            ));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        if users
            .values()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(RepoError::Constraint(
                "duplicate key value violates unique constraint \"users_username_key\""
                    .to_string(),
            ));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn touch_last_seen(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), RepoError> {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.last_seen = at;
        }
        Ok(())
    }

    async fn add_follow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, RepoError> {
        Ok(self
            .follows
            .write()
            .await
            .insert((follower_id, followed_id)))
    }

    async fn remove_follow(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
    ) -> Result<bool, RepoError> {
        Ok(self.follows.write().await.remove(&(follower_id, followed_id)))
    }

    async fn following_ids(&self, follower_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        Ok(self
            .follows
            .read()
            .await
            .iter()
            .filter(|(follower, _)| *follower == follower_id)
            .map(|(_, followed)| *followed)
            .collect())
    }

    async fn follower_count(&self, user_id: Uuid) -> Result<u64, RepoError> {
        Ok(self
            .follows
            .read()
            .await
            .iter()
            .filter(|(_, followed)| *followed == user_id)
            .count() as u64)
    }

    async fn following_count(&self, user_id: Uuid) -> Result<u64, RepoError> {
        Ok(self
            .follows
            .read()
            .await
            .iter()
            .filter(|(follower, _)| *follower == user_id)
            .count() as u64)
    }
}

/// In-memory post repository. Doubles as the search index in DB-less mode,
/// scanning the same backing store.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        self.posts.write().await.push(post.clone());
        Ok(post)
    }

    async fn page_by_authors(
        &self,
        author_ids: &[Uuid],
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;
        let mut rows: Vec<Post> = posts
            .iter()
            .filter(|p| author_ids.contains(&p.author_id))
            .cloned()
            .collect();
        rows.sort_by(feed_ordering);

        Ok(rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}

#[async_trait]
impl SearchIndex for InMemoryPostRepository {
    async fn search(&self, query: &str, limit: u64) -> Result<Vec<Post>, SearchError> {
        let needle = query.trim();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let posts = self.posts.read().await;
        let mut rows: Vec<Post> = posts
            .iter()
            .filter(|p| p.body.contains(needle))
            .cloned()
            .collect();
        rows.sort_by(feed_ordering);
        rows.truncate(limit as usize);
        Ok(rows)
    }
}

/// In-memory session store.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn put(&self, entry: Session) -> Result<(), AuthError> {
        self.sessions
            .write()
            .await
            .insert(entry.token.clone(), entry);
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<Session>, AuthError> {
        Ok(self.sessions.read().await.get(token).cloned())
    }

    async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        self.sessions.write().await.remove(token);
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        Ok((before - sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration as StdDuration;

    use chrono::Duration;
    use uuid::Uuid;

    use murmur_core::domain::{FollowOutcome, UnfollowOutcome};
    use murmur_core::error::DomainError;
    use murmur_core::service::{FeedComposer, PostLedger, UserDirectory};

    use crate::auth::Argon2PasswordService;
    use crate::notify::InMemoryNotificationQueue;

    use super::*;

    struct Fixture {
        users: Arc<InMemoryUserRepository>,
        notifications: Arc<InMemoryNotificationQueue>,
        directory: UserDirectory,
        ledger: PostLedger,
        feed: FeedComposer,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUserRepository::new());
        let posts = Arc::new(InMemoryPostRepository::new());
        let notifications = Arc::new(InMemoryNotificationQueue::default());

        let directory = UserDirectory::new(
            users.clone(),
            Arc::new(Argon2PasswordService::new()),
            notifications.clone(),
        );
        let ledger = PostLedger::new(posts.clone());
        let feed = FeedComposer::new(users.clone(), posts.clone());

        Fixture {
            users,
            notifications,
            directory,
            ledger,
            feed,
        }
    }

    async fn register(fx: &Fixture, username: &str) -> User {
        fx.directory
            .register(username, &format!("{username}@example.com"), "letmein")
            .await
            .unwrap()
    }

    // Posts created back-to-back can share a timestamp; a short pause keeps
    // the expected order independent of the id tiebreak.
    async fn pause() {
        tokio::time::sleep(StdDuration::from_millis(5)).await;
    }

    #[tokio::test]
    async fn duplicate_username_cannot_register_twice() {
        let fx = fixture();
        register(&fx, "alice").await;

        let err = fx
            .directory
            .register("alice", "other@example.com", "different")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateUsername(_)));

        // Exactly one alice exists afterward.
        assert_eq!(fx.users.users.read().await.len(), 1);
    }

    #[tokio::test]
    async fn register_validates_input() {
        let fx = fixture();

        for (username, email, password) in [
            ("", "a@x.com", "pw"),
            ("alice", "", "pw"),
            ("alice", "not-an-email", "pw"),
            ("alice", "a@x.com", ""),
        ] {
            let err = fx.directory.register(username, email, password).await.unwrap_err();
            assert!(matches!(err, DomainError::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn authenticate_distinguishes_unknown_user_from_bad_password() {
        let fx = fixture();
        register(&fx, "alice").await;

        let err = fx.directory.authenticate("nobody", "letmein").await.unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound));

        let err = fx.directory.authenticate("alice", "wrong").await.unwrap_err();
        assert!(matches!(err, DomainError::BadCredentials));

        let user = fx.directory.authenticate("alice", "letmein").await.unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn follow_is_idempotent() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;
        let bob = register(&fx, "bob").await;

        let first = fx.directory.follow(alice.id, bob.id).await.unwrap();
        assert_eq!(first, FollowOutcome::Followed);

        let second = fx.directory.follow(alice.id, bob.id).await.unwrap();
        assert_eq!(second, FollowOutcome::AlreadyFollowing);

        // The edge was added exactly once, and only the first follow
        // produced a notification.
        assert_eq!(fx.users.following_ids(alice.id).await.unwrap(), vec![bob.id]);
        assert_eq!(fx.notifications.queued(), 1);
    }

    #[tokio::test]
    async fn cannot_follow_self() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;

        let outcome = fx.directory.follow(alice.id, alice.id).await.unwrap();
        assert_eq!(outcome, FollowOutcome::CannotFollowSelf);
        assert!(fx.users.following_ids(alice.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unfollow_restores_the_pre_follow_state() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;
        let bob = register(&fx, "bob").await;

        let before = fx.users.following_ids(alice.id).await.unwrap();

        fx.directory.follow(alice.id, bob.id).await.unwrap();
        let outcome = fx.directory.unfollow(alice.id, bob.id).await.unwrap();
        assert_eq!(outcome, UnfollowOutcome::Unfollowed);

        let after = fx.users.following_ids(alice.id).await.unwrap();
        assert_eq!(before, after);

        // Unfollowing again is a no-op, not an error.
        let outcome = fx.directory.unfollow(alice.id, bob.id).await.unwrap();
        assert_eq!(outcome, UnfollowOutcome::NotFollowing);
    }

    #[tokio::test]
    async fn cannot_unfollow_self() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;

        let outcome = fx.directory.unfollow(alice.id, alice.id).await.unwrap();
        assert_eq!(outcome, UnfollowOutcome::CannotUnfollowSelf);
    }

    #[tokio::test]
    async fn following_a_missing_user_is_user_not_found() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;

        let err = fx.directory.follow(alice.id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound));
    }

    #[tokio::test]
    async fn home_feed_includes_own_posts_without_follows() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;

        fx.ledger.create_post(alice.id, "first!").await.unwrap();

        let page = fx.feed.home_feed(alice.id, 0, 10).await.unwrap();
        assert_eq!(page.posts.len(), 1);
        assert_eq!(page.posts[0].body, "first!");
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn followed_posts_appear_newest_first() {
        let fx = fixture();
        let alice = fx
            .directory
            .register("alice", "a@x.com", "pw1")
            .await
            .unwrap();
        let bob = fx.directory.register("bob", "b@x.com", "pw2").await.unwrap();

        fx.directory.follow(alice.id, bob.id).await.unwrap();

        fx.ledger.create_post(bob.id, "hello").await.unwrap();
        pause().await;
        fx.ledger.create_post(bob.id, "world").await.unwrap();

        let page = fx.feed.home_feed(alice.id, 0, 10).await.unwrap();
        let bodies: Vec<&str> = page.posts.iter().map(|p| p.body.as_str()).collect();
        assert_eq!(bodies, ["world", "hello"]);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn pagination_concatenates_to_the_full_set() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;
        let bob = register(&fx, "bob").await;
        fx.directory.follow(alice.id, bob.id).await.unwrap();

        let mut created = Vec::new();
        for i in 0..13 {
            let author = if i % 2 == 0 { bob.id } else { alice.id };
            let post = fx
                .ledger
                .create_post(author, &format!("post {i}"))
                .await
                .unwrap();
            created.push(post.id);
            pause().await;
        }

        let mut seen = Vec::new();
        let mut page = 0;
        loop {
            let result = fx.feed.home_feed(alice.id, page, 5).await.unwrap();
            let expect_more = result.has_more;
            seen.extend(result.posts);
            if !expect_more {
                break;
            }
            page += 1;
        }

        // Every post exactly once, in strictly descending timeline order.
        assert_eq!(seen.len(), created.len());
        let mut seen_ids: Vec<Uuid> = seen.iter().map(|p| p.id).collect();
        seen_ids.sort();
        seen_ids.dedup();
        assert_eq!(seen_ids.len(), created.len());
        for pair in seen.windows(2) {
            assert_eq!(feed_ordering(&pair[0], &pair[1]), std::cmp::Ordering::Less);
        }
    }

    #[tokio::test]
    async fn profile_feed_is_restricted_to_one_author() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;
        let bob = register(&fx, "bob").await;

        fx.ledger.create_post(alice.id, "mine").await.unwrap();
        pause().await;
        fx.ledger.create_post(bob.id, "theirs").await.unwrap();

        let page = fx.feed.profile_feed(alice.id, 0, 10).await.unwrap();
        assert_eq!(page.posts.len(), 1);
        assert_eq!(page.posts[0].body, "mine");

        // The ledger's per-author page agrees with the profile feed.
        let ledger_page = fx.ledger.posts_by_author(alice.id, 0, 10).await.unwrap();
        assert_eq!(ledger_page.posts.len(), 1);
        assert_eq!(ledger_page.posts[0].id, page.posts[0].id);
        assert!(!ledger_page.has_more);
    }

    #[tokio::test]
    async fn update_profile_rejects_long_about_me() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;

        let too_long = "x".repeat(141);
        let err = fx
            .directory
            .update_profile(alice.id, "alice", &too_long)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));

        // Stored value unchanged.
        let stored = fx.directory.get(alice.id).await.unwrap();
        assert_eq!(stored.about_me, "");

        let max = "x".repeat(140);
        let updated = fx
            .directory
            .update_profile(alice.id, "alice", &max)
            .await
            .unwrap();
        assert_eq!(updated.about_me, max);
    }

    #[tokio::test]
    async fn update_profile_enforces_username_uniqueness() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;
        register(&fx, "bob").await;

        let err = fx
            .directory
            .update_profile(alice.id, "bob", "")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateUsername(_)));

        // Keeping the current username is a no-op success.
        let same = fx
            .directory
            .update_profile(alice.id, "alice", "hello")
            .await
            .unwrap();
        assert_eq!(same.username, "alice");

        let renamed = fx
            .directory
            .update_profile(alice.id, "alicia", "hello")
            .await
            .unwrap();
        assert_eq!(renamed.username, "alicia");
    }

    #[tokio::test]
    async fn create_post_rejects_blank_bodies() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;

        for body in ["", "   ", "\n\t"] {
            let err = fx.ledger.create_post(alice.id, body).await.unwrap_err();
            assert!(matches!(err, DomainError::EmptyBody));
        }
    }

    #[tokio::test]
    async fn session_store_round_trip() {
        let store = InMemorySessionStore::new();
        let session = Session::issue(Uuid::new_v4(), Duration::hours(1));

        store.put(session.clone()).await.unwrap();
        let found = store.find(&session.token).await.unwrap().unwrap();
        assert_eq!(found.user_id, session.user_id);

        store.revoke(&session.token).await.unwrap();
        assert!(store.find(&session.token).await.unwrap().is_none());

        // Revoking an unknown token is a no-op.
        store.revoke("missing").await.unwrap();
    }

    #[tokio::test]
    async fn purge_removes_only_expired_sessions() {
        let store = InMemorySessionStore::new();
        let live = Session::issue(Uuid::new_v4(), Duration::hours(1));
        let dead = Session::issue(Uuid::new_v4(), Duration::zero());

        store.put(live.clone()).await.unwrap();
        store.put(dead.clone()).await.unwrap();

        let purged = store.purge_expired(Utc::now()).await.unwrap();
        assert_eq!(purged, 1);
        assert!(store.find(&live.token).await.unwrap().is_some());
        assert!(store.find(&dead.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn search_scans_post_bodies_newest_first() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;
        let posts = Arc::new(InMemoryPostRepository::new());
        let ledger = PostLedger::new(posts.clone());

        ledger.create_post(alice.id, "rust is nice").await.unwrap();
        pause().await;
        ledger.create_post(alice.id, "nothing here").await.unwrap();
        pause().await;
        ledger.create_post(alice.id, "more rust").await.unwrap();

        let hits = posts.search("rust", 10).await.unwrap();
        let bodies: Vec<&str> = hits.iter().map(|p| p.body.as_str()).collect();
        assert_eq!(bodies, ["more rust", "rust is nice"]);

        assert!(posts.search("   ", 10).await.unwrap().is_empty());
    }
}
