//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use murmur_core::domain::{Post, User};
use murmur_core::error::RepoError;
use murmur_core::ports::{PostRepository, UserRepository};

use super::entity::follow::{self, Entity as FollowEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};

/// Map a database error onto the repository taxonomy. Unique-index
/// violations become `Constraint` so callers can surface them as typed
/// domain errors instead of opaque faults.
pub(crate) fn map_db_err(e: DbErr) -> RepoError {
    if matches!(e, DbErr::RecordNotUpdated) {
        return RepoError::NotFound;
    }
    let err_str = e.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Constraint(err_str)
    } else {
        RepoError::Query(err_str)
    }
}

/// PostgreSQL user repository. Also owns the follow-edge table.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, entity: User) -> Result<User, RepoError> {
        let active: user::ActiveModel = entity.into();
        let model = active.insert(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn update(&self, entity: User) -> Result<User, RepoError> {
        let active: user::ActiveModel = entity.into();
        let model = active.update(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username = %username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn touch_last_seen(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), RepoError> {
        UserEntity::update_many()
            .col_expr(user::Column::LastSeen, Expr::value(at))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(())
    }

    async fn add_follow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, RepoError> {
        let edge = follow::ActiveModel {
            follower_id: Set(follower_id),
            followed_id: Set(followed_id),
            created_at: Set(Utc::now().into()),
        };

        // Single conflict-tolerant insert: the affected-row count tells a
        // fresh edge apart from an existing one without a read-then-write.
        let inserted = FollowEntity::insert(edge)
            .on_conflict(
                OnConflict::columns([follow::Column::FollowerId, follow::Column::FollowedId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(inserted > 0)
    }

    async fn remove_follow(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
    ) -> Result<bool, RepoError> {
        let result = FollowEntity::delete_many()
            .filter(follow::Column::FollowerId.eq(follower_id))
            .filter(follow::Column::FollowedId.eq(followed_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn following_ids(&self, follower_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let rows = FollowEntity::find()
            .filter(follow::Column::FollowerId.eq(follower_id))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(|edge| edge.followed_id).collect())
    }

    async fn follower_count(&self, user_id: Uuid) -> Result<u64, RepoError> {
        FollowEntity::find()
            .filter(follow::Column::FollowedId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn following_count(&self, user_id: Uuid) -> Result<u64, RepoError> {
        FollowEntity::find()
            .filter(follow::Column::FollowerId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }
}

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, entity: Post) -> Result<Post, RepoError> {
        let active: post::ActiveModel = entity.into();
        let model = active.insert(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn page_by_authors(
        &self,
        author_ids: &[Uuid],
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = PostEntity::find()
            .filter(post::Column::AuthorId.is_in(author_ids.iter().copied()))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
