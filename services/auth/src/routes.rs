//! Authentication service routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{AppState, claims::TokenClaims, error::AuthError, validation};

/// Request for token issuance
#[derive(Deserialize)]
pub struct TokenRequest {
    pub email: String,
    pub name: String,
}

/// Response for token issuance
#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Request for token verification
#[derive(Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/token", post(issue_token))
        .route("/auth/verify", post(verify_token))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// Mint a signed token for an identity
pub async fn issue_token(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> Result<impl IntoResponse, AuthError> {
    validation::validate_email(&payload.email).map_err(AuthError::BadRequest)?;
    validation::validate_display_name(&payload.name).map_err(AuthError::BadRequest)?;

    let claims = TokenClaims {
        email: payload.email,
        name: payload.name,
    };

    let access_token = state.jwt_service.sign(&claims).map_err(|e| {
        error!("Failed to sign token: {}", e);
        AuthError::InternalServerError
    })?;

    info!("Issued token for {}", claims.email);

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: state.jwt_service.token_expiry(),
        }),
    ))
}

/// Check a presented token and return its claims
///
/// Every rejection collapses to a generic unauthorized response; the
/// reason stays in the logs.
pub async fn verify_token(
    State(state): State<AppState>,
    Json(payload): Json<VerifyRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let claims = state.jwt_service.verify(&payload.token).map_err(|e| {
        debug!("Token verification failed: {}", e);
        AuthError::Unauthorized
    })?;

    Ok(Json(claims))
}
