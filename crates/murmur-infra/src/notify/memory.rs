//! In-memory notification queue.
//!
//! Notifications are buffered on a channel and drained by a local worker
//! whose "delivery" is a structured log line - the seam where an email or
//! push transport would plug in. Queued notifications are lost on restart.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use murmur_core::ports::{FollowNotification, NotificationQueue, NotifyError};

/// In-memory notification queue configuration.
#[derive(Debug, Clone)]
pub struct NotificationQueueConfig {
    /// Channel capacity; enqueue reports `QueueFull` beyond it.
    pub capacity: usize,
}

impl Default for NotificationQueueConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

/// In-memory notification queue.
pub struct InMemoryNotificationQueue {
    sender: mpsc::Sender<FollowNotification>,
    receiver: Arc<Mutex<mpsc::Receiver<FollowNotification>>>,
    queued: AtomicUsize,
    delivered: Arc<AtomicUsize>,
}

impl InMemoryNotificationQueue {
    pub fn new(config: NotificationQueueConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.capacity.max(1));

        Self {
            sender: tx,
            receiver: Arc::new(Mutex::new(rx)),
            queued: AtomicUsize::new(0),
            delivered: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Spawn the delivery worker. Call once at startup.
    pub fn start_worker(&self) {
        let receiver = self.receiver.clone();
        let delivered = self.delivered.clone();

        tokio::spawn(async move {
            let mut receiver = receiver.lock().await;
            while let Some(notification) = receiver.recv().await {
                tracing::info!(
                    notification_id = %notification.id,
                    follower = %notification.follower_username,
                    followed = %notification.followed_id,
                    "follower notification delivered"
                );
                delivered.fetch_add(1, Ordering::Relaxed);
            }
        });
    }

    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::Relaxed)
    }

    pub fn delivered(&self) -> usize {
        self.delivered.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryNotificationQueue {
    fn default() -> Self {
        Self::new(NotificationQueueConfig::default())
    }
}

#[async_trait]
impl NotificationQueue for InMemoryNotificationQueue {
    async fn enqueue(&self, notification: FollowNotification) -> Result<(), NotifyError> {
        match self.sender.try_send(notification) {
            Ok(()) => {
                self.queued.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(mpsc::error::TrySendError::Full(_)) => Err(NotifyError::QueueFull),
            Err(mpsc::error::TrySendError::Closed(e)) => {
                Err(NotifyError::Enqueue(format!("worker gone: {}", e.id)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use murmur_core::domain::User;

    use super::*;

    fn notification() -> FollowNotification {
        let follower = User::new("f".into(), "f@x.com".into(), "digest".into());
        let followed = User::new("g".into(), "g@x.com".into(), "digest".into());
        FollowNotification::new(&followed, &follower)
    }

    #[tokio::test]
    async fn enqueue_buffers_until_drained() {
        let queue = InMemoryNotificationQueue::new(NotificationQueueConfig { capacity: 4 });
        queue.enqueue(notification()).await.unwrap();
        queue.enqueue(notification()).await.unwrap();
        assert_eq!(queue.queued(), 2);

        let mut receiver = queue.receiver.lock().await;
        assert!(receiver.recv().await.is_some());
        assert!(receiver.recv().await.is_some());
    }

    #[tokio::test]
    async fn worker_drains_the_queue() {
        let queue = InMemoryNotificationQueue::default();
        queue.start_worker();
        queue.enqueue(notification()).await.unwrap();

        for _ in 0..100 {
            if queue.delivered() == 1 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(queue.delivered(), 1);
    }

    #[tokio::test]
    async fn full_queue_reports_queue_full() {
        let queue = InMemoryNotificationQueue::new(NotificationQueueConfig { capacity: 1 });
        queue.enqueue(notification()).await.unwrap();

        let err = queue.enqueue(notification()).await.unwrap_err();
        assert!(matches!(err, NotifyError::QueueFull));
    }
}
