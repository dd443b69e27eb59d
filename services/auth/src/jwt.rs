//! JWT service for token generation and validation
//!
//! This module signs and verifies tokens using the HS256 algorithm with a
//! shared secret. Signature and expiry checks are delegated to
//! `jsonwebtoken`; the decoded body stays untyped until it has passed the
//! claim-shape validation in [`crate::claims`].

use anyhow::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::debug;

use crate::claims::{SignedTokenClaims, TokenClaims};

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret for signing and verifying tokens
    pub secret: String,
    /// Token lifetime in seconds (default: 1 hour)
    pub token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: shared signing secret (required)
    /// - `JWT_TOKEN_EXPIRY`: token lifetime in seconds (default: 3600)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        let token_expiry = std::env::var("JWT_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .unwrap_or(3600);

        Ok(JwtConfig {
            secret,
            token_expiry,
        })
    }
}

/// Reasons a presented token is rejected
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature, encoding, or expiry check failed
    #[error("token rejected")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    /// The decoded body does not have the expected claim shape
    #[error("token claims malformed")]
    MalformedClaims,
}

/// JWT service
///
/// Built once at startup from [`JwtConfig`] and shared through application
/// state; it is never reconstructed per request.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_expiry: u64,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: &JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = true;

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            token_expiry: config.token_expiry,
        }
    }

    /// Sign business claims into a token, stamping issued-at and expiry
    pub fn sign(&self, claims: &TokenClaims) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        let signed = SignedTokenClaims {
            email: claims.email.clone(),
            name: claims.name.clone(),
            iat: now,
            exp: now + self.token_expiry,
        };

        let token = encode(&Header::default(), &signed, &self.encoding_key)?;
        Ok(token)
    }

    /// Verify a token and return its claims
    ///
    /// A structurally wrong claim body is rejected even when the signature
    /// is valid.
    pub fn verify(&self, token: &str) -> Result<SignedTokenClaims, TokenError> {
        let token_data = decode::<Value>(token, &self.decoding_key, &self.validation)
            .map_err(TokenError::Invalid)?;

        SignedTokenClaims::from_value(&token_data.claims).ok_or_else(|| {
            debug!("decoded token body failed the claim shape check");
            TokenError::MalformedClaims
        })
    }

    /// Token lifetime in seconds
    pub fn token_expiry(&self) -> u64 {
        self.token_expiry
    }
}
