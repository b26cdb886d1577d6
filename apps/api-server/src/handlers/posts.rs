//! Post creation handler.

use actix_web::{HttpResponse, web};

use murmur_shared::dto::CreatePostRequest;

use crate::handlers::post_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts - Protected route
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .ledger
        .create_post(identity.user_id, &body.body)
        .await?;

    Ok(HttpResponse::Created().json(post_response(&post)))
}
