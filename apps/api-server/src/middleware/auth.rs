//! Authentication middleware and extractors - the session/auth gate.

use std::future::Future;
use std::pin::Pin;

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};

use murmur_core::ports::AuthError;

use crate::state::AppState;

/// Authenticated caller identity extractor.
///
/// A handler taking `Identity` is a protected operation: it is only ever
/// invoked with a resolved user, and an anonymous request is rejected with
/// 401 before the handler runs - never defaulted to some implicit user.
///
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub username: String,
    /// The session token the request authenticated with (for logout).
    pub token: String,
}

fn bearer_token(req: &HttpRequest) -> Result<String, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let value = value.to_str().map_err(|_| AuthError::InvalidSession)?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidSession)?;

    if token.is_empty() {
        return Err(AuthError::InvalidSession);
    }

    Ok(token.to_string())
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<AuthError> for AuthenticationError {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match &self.0 {
            AuthError::MissingAuth
            | AuthError::InvalidSession
            | AuthError::SessionExpired => actix_web::http::StatusCode::UNAUTHORIZED,
            _ => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        use murmur_shared::ErrorResponse;

        let error = match &self.0 {
            AuthError::MissingAuth => ErrorResponse::new(401, "Authentication Required")
                .with_detail("Provide a Bearer session token in the Authorization header."),
            AuthError::SessionExpired => ErrorResponse::new(401, "Session Expired")
                .with_detail("Your session has expired. Please login again."),
            AuthError::InvalidSession => ErrorResponse::unauthorized(),
            _ => ErrorResponse::internal_error(),
        };

        actix_web::HttpResponse::build(self.status_code()).json(error)
    }
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = bearer_token(req);

        Box::pin(async move {
            let state = match state {
                Some(state) => state,
                None => {
                    tracing::error!("AppState not found in app data");
                    return Err(AuthenticationError(AuthError::Store(
                        "server configuration error".to_string(),
                    )));
                }
            };

            let token = token?;

            let session = state
                .sessions
                .find(&token)
                .await
                .map_err(AuthenticationError)?
                .ok_or(AuthenticationError(AuthError::InvalidSession))?;

            if session.is_expired() {
                return Err(AuthenticationError(AuthError::SessionExpired));
            }

            // A session whose user has vanished authenticates nobody.
            let user = state
                .directory
                .get(session.user_id)
                .await
                .map_err(|_| AuthenticationError(AuthError::InvalidSession))?;

            // Every authenticated request refreshes last_seen.
            if let Err(e) = state.directory.touch_last_seen(user.id).await {
                tracing::warn!(error = %e, user_id = %user.id, "failed to refresh last_seen");
            }

            Ok(Identity {
                user_id: user.id,
                username: user.username,
                token,
            })
        })
    }
}
