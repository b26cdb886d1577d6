//! Post search handler.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use murmur_shared::dto::SearchResponse;

use crate::handlers::post_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub limit: Option<u64>,
}

/// GET /api/search?q=... - Protected route
pub async fn search(
    state: web::Data<AppState>,
    _identity: Identity,
    query: web::Query<SearchParams>,
) -> AppResult<HttpResponse> {
    let params = query.into_inner();

    if params.q.trim().is_empty() {
        return Err(AppError::BadRequest(
            "search query must not be empty".to_string(),
        ));
    }

    let limit = params
        .limit
        .unwrap_or(state.search_max_results)
        .min(state.search_max_results);

    let posts = state.search.search(&params.q, limit).await?;

    Ok(HttpResponse::Ok().json(SearchResponse {
        query: params.q,
        posts: posts.iter().map(post_response).collect(),
    }))
}
