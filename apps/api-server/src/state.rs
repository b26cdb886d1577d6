//! Application state - shared across all handlers.

use std::sync::Arc;

use murmur_core::ports::{
    NotificationQueue, PasswordService, PostRepository, SearchIndex, SessionStore, UserRepository,
};
use murmur_core::service::{FeedComposer, PostLedger, UserDirectory};
use murmur_infra::{
    Argon2PasswordService, DatabaseConnections, InMemoryNotificationQueue, InMemoryPostRepository,
    InMemorySessionStore, InMemoryUserRepository, PostgresPostRepository, PostgresSearchIndex,
    PostgresSessionStore, PostgresUserRepository,
};

use crate::config::AppConfig;

type Backends = (
    Arc<dyn UserRepository>,
    Arc<dyn PostRepository>,
    Arc<dyn SessionStore>,
    Arc<dyn SearchIndex>,
);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<UserDirectory>,
    pub ledger: Arc<PostLedger>,
    pub feed: Arc<FeedComposer>,
    pub sessions: Arc<dyn SessionStore>,
    pub search: Arc<dyn SearchIndex>,
    pub session_ttl: chrono::Duration,
    pub posts_per_page: u64,
    pub search_max_results: u64,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        let notifications = Arc::new(InMemoryNotificationQueue::default());
        notifications.start_worker();
        let notifications: Arc<dyn NotificationQueue> = notifications;

        let (users, posts, sessions, search) = match &config.database {
            Some(db_config) => match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    let db = connections.main;
                    (
                        Arc::new(PostgresUserRepository::new(db.clone())) as Arc<dyn UserRepository>,
                        Arc::new(PostgresPostRepository::new(db.clone())) as Arc<dyn PostRepository>,
                        Arc::new(PostgresSessionStore::new(db.clone())) as Arc<dyn SessionStore>,
                        Arc::new(PostgresSearchIndex::new(db)) as Arc<dyn SearchIndex>,
                    )
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Self::memory_backends()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::memory_backends()
            }
        };

        let directory = Arc::new(UserDirectory::new(users.clone(), passwords, notifications));
        let ledger = Arc::new(PostLedger::new(posts.clone()));
        let feed = Arc::new(FeedComposer::new(users, posts));

        tracing::info!("Application state initialized");

        Self {
            directory,
            ledger,
            feed,
            sessions,
            search,
            session_ttl: chrono::Duration::hours(config.session_ttl_hours),
            posts_per_page: config.posts_per_page,
            search_max_results: config.search_max_results,
        }
    }

    /// In-memory mode: the post repository doubles as the search index so
    /// both views share one backing store.
    fn memory_backends() -> Backends {
        let posts = Arc::new(InMemoryPostRepository::new());
        (
            Arc::new(InMemoryUserRepository::new()),
            posts.clone(),
            Arc::new(InMemorySessionStore::new()),
            posts,
        )
    }
}
