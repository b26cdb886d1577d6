//! User directory - registration, authentication, profile edits, and the
//! follow graph.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{ABOUT_ME_MAX_CHARS, FollowOutcome, UnfollowOutcome, User};
use crate::error::{DomainError, RepoError};
use crate::ports::{FollowNotification, NotificationQueue, PasswordService, UserRepository};

/// CRUD over user identity, profile, and follow relationships.
pub struct UserDirectory {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    notifications: Arc<dyn NotificationQueue>,
}

impl UserDirectory {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        notifications: Arc<dyn NotificationQueue>,
    ) -> Self {
        Self {
            users,
            passwords,
            notifications,
        }
    }

    /// Register a new user. The raw password is hashed and dropped; the
    /// store's unique index decides username collisions, so two concurrent
    /// registrations of the same name cannot both succeed.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, DomainError> {
        if username.is_empty() {
            return Err(DomainError::InvalidInput(
                "username must not be empty".to_string(),
            ));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::InvalidInput(
                "a valid email address is required".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(DomainError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }

        let password_hash = self
            .passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = User::new(username.to_string(), email.to_string(), password_hash);

        match self.users.insert(user).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, username = %user.username, "user registered");
                Ok(user)
            }
            Err(RepoError::Constraint(_)) => Err(DomainError::DuplicateUsername(
                username.to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Check credentials. Mutates nothing - session issuance is separate.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if !valid {
            return Err(DomainError::BadCredentials);
        }

        Ok(user)
    }

    /// Change username and/or about_me. Keeping the current username is a
    /// no-op success; colliding with someone else's surfaces from the unique
    /// index as `DuplicateUsername`. An over-long about_me is rejected,
    /// never truncated.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        new_username: &str,
        new_about_me: &str,
    ) -> Result<User, DomainError> {
        if new_username.is_empty() {
            return Err(DomainError::InvalidInput(
                "username must not be empty".to_string(),
            ));
        }
        if new_about_me.chars().count() > ABOUT_ME_MAX_CHARS {
            return Err(DomainError::InvalidInput(format!(
                "about_me must be at most {ABOUT_ME_MAX_CHARS} characters"
            )));
        }

        let mut user = self.get(user_id).await?;
        user.username = new_username.to_string();
        user.about_me = new_about_me.to_string();

        match self.users.update(user).await {
            Ok(user) => Ok(user),
            Err(RepoError::Constraint(_)) => Err(DomainError::DuplicateUsername(
                new_username.to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Follow `target_id`. Idempotent: re-following reports
    /// `AlreadyFollowing` without touching the graph. A successful new edge
    /// queues a notification to the followed user; queue trouble is logged
    /// and never rolls the follow back.
    pub async fn follow(
        &self,
        follower_id: Uuid,
        target_id: Uuid,
    ) -> Result<FollowOutcome, DomainError> {
        if follower_id == target_id {
            return Ok(FollowOutcome::CannotFollowSelf);
        }

        let target = self
            .users
            .find_by_id(target_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        let inserted = self.users.add_follow(follower_id, target_id).await?;
        if !inserted {
            return Ok(FollowOutcome::AlreadyFollowing);
        }

        self.notify_followed(&target, follower_id).await;

        Ok(FollowOutcome::Followed)
    }

    /// Unfollow `target_id`. Removing an absent edge is a no-op reported as
    /// `NotFollowing`.
    pub async fn unfollow(
        &self,
        follower_id: Uuid,
        target_id: Uuid,
    ) -> Result<UnfollowOutcome, DomainError> {
        if follower_id == target_id {
            return Ok(UnfollowOutcome::CannotUnfollowSelf);
        }

        if self.users.find_by_id(target_id).await?.is_none() {
            return Err(DomainError::UserNotFound);
        }

        let removed = self.users.remove_follow(follower_id, target_id).await?;
        if !removed {
            return Ok(UnfollowOutcome::NotFollowing);
        }

        Ok(UnfollowOutcome::Unfollowed)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self.users.find_by_username(username).await?)
    }

    pub async fn get(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound)
    }

    /// Refresh `last_seen` for an authenticated request.
    pub async fn touch_last_seen(&self, user_id: Uuid) -> Result<(), DomainError> {
        Ok(self.users.touch_last_seen(user_id, Utc::now()).await?)
    }

    /// `(followers, following)` counts for a profile page.
    pub async fn follow_stats(&self, user_id: Uuid) -> Result<(u64, u64), DomainError> {
        let followers = self.users.follower_count(user_id).await?;
        let following = self.users.following_count(user_id).await?;
        Ok((followers, following))
    }

    async fn notify_followed(&self, followed: &User, follower_id: Uuid) {
        let follower = match self.users.find_by_id(follower_id).await {
            Ok(Some(user)) => user,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(error = %e, "skipping follower notification");
                return;
            }
        };

        let notification = FollowNotification::new(followed, &follower);
        if let Err(e) = self.notifications.enqueue(notification).await {
            tracing::warn!(error = %e, followed = %followed.id, "failed to queue follower notification");
        }
    }
}
