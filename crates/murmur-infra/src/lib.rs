//! # Murmur Infrastructure
//!
//! Concrete implementations of the ports defined in `murmur-core`:
//! SeaORM/Postgres repositories, the Argon2 password service, session
//! stores, the search adapter, the notification queue, and in-memory
//! fallbacks used when no database is configured (and as test fixtures).

pub mod auth;
pub mod database;
pub mod memory;
pub mod notify;
pub mod search;

pub use auth::Argon2PasswordService;
pub use database::{
    DatabaseConfig, DatabaseConnections, PostgresPostRepository, PostgresSessionStore,
    PostgresUserRepository,
};
pub use memory::{InMemoryPostRepository, InMemorySessionStore, InMemoryUserRepository};
pub use notify::InMemoryNotificationQueue;
pub use search::PostgresSearchIndex;
