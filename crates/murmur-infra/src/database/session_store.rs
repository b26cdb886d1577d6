//! Session store backed by the relational database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, QueryFilter};

use murmur_core::ports::{AuthError, Session, SessionStore};

use super::entity::session::{self, Entity as SessionEntity};

/// PostgreSQL session store. Rows outlive process restarts; a periodic
/// sweep removes what has expired.
pub struct PostgresSessionStore {
    db: DbConn,
}

impl PostgresSessionStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn put(&self, entry: Session) -> Result<(), AuthError> {
        let active: session::ActiveModel = entry.into();
        active
            .insert(&self.db)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<Session>, AuthError> {
        let result = SessionEntity::find_by_id(token.to_string())
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(result.map(Into::into))
    }

    async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        SessionEntity::delete_by_id(token.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError> {
        let result = SessionEntity::delete_many()
            .filter(session::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(result.rows_affected)
    }
}
