use serde::{Deserialize, Serialize};

/// Outcome of a follow request. `AlreadyFollowing` and `CannotFollowSelf`
/// are informational, not errors - the caller decides how to present them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowOutcome {
    Followed,
    AlreadyFollowing,
    CannotFollowSelf,
}

/// Outcome of an unfollow request. Unfollowing someone you never followed
/// is a no-op, reported as `NotFollowing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnfollowOutcome {
    Unfollowed,
    NotFollowing,
    CannotUnfollowSelf,
}
