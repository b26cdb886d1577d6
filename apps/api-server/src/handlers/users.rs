//! User profile, profile edit, and follow/unfollow handlers.

use actix_web::{HttpResponse, web};

use murmur_core::domain::{FollowOutcome, UnfollowOutcome, User};
use murmur_shared::dto::{FollowResponse, ProfileResponse, UpdateProfileRequest};

use crate::handlers::{PageParams, feed_response, user_response};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn resolve_username(state: &AppState, username: &str) -> AppResult<User> {
    state
        .directory
        .find_by_username(username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user '{username}' not found")))
}

/// GET /api/users/{username} - Protected route
pub async fn profile(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let user = resolve_username(&state, &path).await?;
    let (followers, following) = state.directory.follow_stats(user.id).await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        id: user.id.to_string(),
        username: user.username,
        about_me: user.about_me,
        last_seen: user.last_seen.to_rfc3339(),
        followers,
        following,
    }))
}

/// GET /api/users/{username}/posts - Protected route
pub async fn posts(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
    query: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let user = resolve_username(&state, &path).await?;
    let (page, page_size) = query.resolve(state.posts_per_page);

    let feed = state.feed.profile_feed(user.id, page, page_size).await?;

    Ok(HttpResponse::Ok().json(feed_response(feed, page, page_size)))
}

/// PUT /api/users/me - Protected route
pub async fn update_profile(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .directory
        .update_profile(identity.user_id, &req.username, &req.about_me)
        .await?;

    Ok(HttpResponse::Ok().json(user_response(&user)))
}

/// POST /api/users/{username}/follow - Protected route
pub async fn follow(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let target = resolve_username(&state, &path).await?;

    let outcome = state.directory.follow(identity.user_id, target.id).await?;

    Ok(HttpResponse::Ok().json(FollowResponse {
        outcome: follow_label(outcome).to_string(),
    }))
}

/// DELETE /api/users/{username}/follow - Protected route
pub async fn unfollow(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let target = resolve_username(&state, &path).await?;

    let outcome = state
        .directory
        .unfollow(identity.user_id, target.id)
        .await?;

    Ok(HttpResponse::Ok().json(FollowResponse {
        outcome: unfollow_label(outcome).to_string(),
    }))
}

fn follow_label(outcome: FollowOutcome) -> &'static str {
    match outcome {
        FollowOutcome::Followed => "followed",
        FollowOutcome::AlreadyFollowing => "already_following",
        FollowOutcome::CannotFollowSelf => "cannot_follow_self",
    }
}

fn unfollow_label(outcome: UnfollowOutcome) -> &'static str {
    match outcome {
        UnfollowOutcome::Unfollowed => "unfollowed",
        UnfollowOutcome::NotFollowing => "not_following",
        UnfollowOutcome::CannotUnfollowSelf => "cannot_unfollow_self",
    }
}
