//! Authentication middleware for bearer token validation

use auth::claims::SignedTokenClaims;
use axum::{extract::State, http::Request, middleware::Next, response::Response};
use tracing::debug;

use crate::{error::ApiError, state::AppState};

/// Authenticated identity extracted from a verified token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
    pub name: String,
}

impl From<SignedTokenClaims> for AuthUser {
    fn from(claims: SignedTokenClaims) -> Self {
        AuthUser {
            email: claims.email,
            name: claims.name,
        }
    }
}

/// Authentication middleware
///
/// Verifies the bearer token through the JWT service held in application
/// state (built once at startup). Every failure, from a missing header to
/// a malformed claim body, collapses to a generic 401; the reason only
/// reaches the logs.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    let claims = state.jwt_service.verify(token).map_err(|e| {
        debug!("Bearer token rejected: {}", e);
        ApiError::Unauthorized
    })?;

    req.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(req).await)
}
