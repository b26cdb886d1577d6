//! Authentication handlers: registration, login, logout, and the caller's
//! own account.

use actix_web::{HttpResponse, web};

use murmur_core::ports::Session;
use murmur_shared::dto::{LoginRequest, RegisterRequest, SessionResponse};

use crate::handlers::user_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/auth/register
///
/// Creates the account and returns it. No session is issued here - login is
/// a separate step, matching the authenticate/issue split in the core.
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .directory
        .register(&req.username, &req.email, &req.password)
        .await?;

    Ok(HttpResponse::Created().json(user_response(&user)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .directory
        .authenticate(&req.username, &req.password)
        .await?;

    let session = Session::issue(user.id, state.session_ttl);
    state.sessions.put(session.clone()).await?;

    tracing::info!(user_id = %user.id, "login");

    Ok(HttpResponse::Ok().json(SessionResponse {
        token: session.token,
        token_type: "Bearer".to_string(),
        user_id: user.id.to_string(),
        expires_at: session.expires_at.to_rfc3339(),
    }))
}

/// POST /api/auth/logout - Protected route
///
/// Destroys the session the request authenticated with.
pub async fn logout(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    state.sessions.revoke(&identity.token).await?;

    tracing::info!(user_id = %identity.user_id, "logout");

    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.directory.get(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(user_response(&user)))
}
