//! HTTP handlers and route configuration.

mod auth;
mod feed;
mod health;
mod posts;
mod search;
mod users;

use actix_web::web;
use serde::Deserialize;

use murmur_core::domain::{FeedPage, Post, User};
use murmur_shared::dto::{FeedResponse, PostResponse, UserResponse};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/logout", web::post().to(auth::logout))
                    .route("/me", web::get().to(auth::me)),
            )
            // Protected application routes
            .route("/feed", web::get().to(feed::home))
            .route("/posts", web::post().to(posts::create))
            .route("/search", web::get().to(search::search))
            .service(
                web::scope("/users")
                    .route("/me", web::put().to(users::update_profile))
                    .route("/{username}", web::get().to(users::profile))
                    .route("/{username}/posts", web::get().to(users::posts))
                    .route("/{username}/follow", web::post().to(users::follow))
                    .route("/{username}/follow", web::delete().to(users::unfollow)),
            ),
    );
}

/// Hard cap on requested page sizes, whatever the configuration says.
pub(crate) const MAX_PAGE_SIZE: u64 = 100;

/// Pagination query parameters shared by the feed endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct PageParams {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl PageParams {
    /// Resolve to `(page, page_size)`, falling back to the configured
    /// default size and clamping what the client asked for.
    pub(crate) fn resolve(&self, default_size: u64) -> (u64, u64) {
        let page = self.page.unwrap_or(0);
        let page_size = self.page_size.unwrap_or(default_size).clamp(1, MAX_PAGE_SIZE);
        (page, page_size)
    }
}

pub(crate) fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        username: user.username.clone(),
        email: user.email.clone(),
        about_me: user.about_me.clone(),
        last_seen: user.last_seen.to_rfc3339(),
        created_at: user.created_at.to_rfc3339(),
    }
}

pub(crate) fn post_response(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        author_id: post.author_id.to_string(),
        body: post.body.clone(),
        created_at: post.created_at.to_rfc3339(),
    }
}

pub(crate) fn feed_response(feed: FeedPage, page: u64, page_size: u64) -> FeedResponse {
    FeedResponse {
        posts: feed.posts.iter().map(post_response).collect(),
        page,
        page_size,
        has_more: feed.has_more,
    }
}
