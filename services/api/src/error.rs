//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::dto::ShapeError;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Unauthorized access
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// A persistence record broke the required-field invariant
    #[error("Response shaping error: {0}")]
    Shaping(#[from] ShapeError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            // The field-level detail is for the logs only; the client gets
            // a generic internal error.
            ApiError::Shaping(e) => {
                tracing::error!("Response shaping failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
