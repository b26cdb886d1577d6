//! Home timeline handler.

use actix_web::{HttpResponse, web};

use crate::handlers::{PageParams, feed_response};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/feed - Protected route
///
/// The caller's personalized timeline: posts by everyone they follow, plus
/// their own.
pub async fn home(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let (page, page_size) = query.resolve(state.posts_per_page);

    let feed = state
        .feed
        .home_feed(identity.user_id, page, page_size)
        .await?;

    Ok(HttpResponse::Ok().json(feed_response(feed, page, page_size)))
}
