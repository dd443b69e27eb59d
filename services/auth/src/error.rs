//! Custom error types for the authentication service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the authentication service
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unauthorized access
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AuthError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for authentication results
pub type AuthResult<T> = Result<T, AuthError>;
