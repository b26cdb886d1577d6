//! Notification port - fire-and-forget delivery of follower notifications.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::User;

/// A "you have a new follower" notification, queued for delivery to the
/// followed user. Delivery transport (email, push) lives behind the queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowNotification {
    /// Unique notification identifier.
    pub id: String,
    pub follower_id: Uuid,
    pub follower_username: String,
    pub followed_id: Uuid,
    pub followed_email: String,
    /// When the follow happened.
    pub created_at: DateTime<Utc>,
}

impl FollowNotification {
    pub fn new(followed: &User, follower: &User) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            follower_id: follower.id,
            follower_username: follower.username.clone(),
            followed_id: followed.id,
            followed_email: followed.email.clone(),
            created_at: Utc::now(),
        }
    }
}

/// Notification queue. Enqueue failures must never fail or roll back the
/// operation that produced the notification.
#[async_trait]
pub trait NotificationQueue: Send + Sync {
    async fn enqueue(&self, notification: FollowNotification) -> Result<(), NotifyError>;
}

/// Notification queue errors.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Failed to enqueue notification: {0}")]
    Enqueue(String),

    #[error("Queue is full")]
    QueueFull,
}
