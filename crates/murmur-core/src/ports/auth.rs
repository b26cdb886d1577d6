//! Authentication ports: password hashing and the session store.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Password hashing service. The digest is opaque to the rest of the system.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// A server-side session: an opaque token bound to a user id.
/// Created on login, destroyed on logout, dead once `expires_at` passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Issue a fresh session with a random token.
    pub fn issue(user_id: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            token: Uuid::new_v4().to_string(),
            user_id,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Session persistence. `find` returns expired sessions as stored; deciding
/// what an expired session means is the auth gate's job, not the store's.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn put(&self, session: Session) -> Result<(), AuthError>;

    async fn find(&self, token: &str) -> Result<Option<Session>, AuthError>;

    /// Destroy a session. Revoking an unknown token is a no-op.
    async fn revoke(&self, token: &str) -> Result<(), AuthError>;

    /// Delete every session expired as of `now`, returning how many went.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Invalid session token")]
    InvalidSession,

    #[error("Session expired")]
    SessionExpired,

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Session store error: {0}")]
    Store(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_session_expires_after_ttl() {
        let user_id = Uuid::new_v4();
        let session = Session::issue(user_id, Duration::hours(12));
        assert_eq!(session.user_id, user_id);
        assert!(!session.is_expired());
        assert_eq!(session.expires_at - session.created_at, Duration::hours(12));
    }

    #[test]
    fn zero_ttl_session_is_already_expired() {
        let session = Session::issue(Uuid::new_v4(), Duration::zero());
        assert!(session.is_expired());
    }

    #[test]
    fn tokens_are_unique_per_session() {
        let a = Session::issue(Uuid::new_v4(), Duration::hours(1));
        let b = Session::issue(Uuid::new_v4(), Duration::hours(1));
        assert_ne!(a.token, b.token);
    }
}
