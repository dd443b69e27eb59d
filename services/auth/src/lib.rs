//! Authentication service library
//!
//! Exposes the token claim model, claim-shape validation, and the JWT
//! signing/verification service. The api service depends on this crate to
//! verify bearer tokens with the same rules that issued them.

pub mod claims;
pub mod error;
pub mod jwt;
pub mod routes;
pub mod validation;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub jwt_service: jwt::JwtService,
}
