//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod notify;
mod repository;
mod search;

pub use auth::{AuthError, PasswordService, Session, SessionStore};
pub use notify::{FollowNotification, NotificationQueue, NotifyError};
pub use repository::{PostRepository, UserRepository};
pub use search::{SearchError, SearchIndex};
