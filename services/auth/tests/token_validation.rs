//! Integration tests for token issuance and verification
//!
//! These tests drive the public surface of the auth crate: claims are
//! signed through the JWT service and must come back out only when the
//! decoded body has exactly the expected shape.

use auth::claims::{SignedTokenClaims, TokenClaims, is_signed_token_claims};
use auth::jwt::{JwtConfig, JwtService, TokenError};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;

fn test_service() -> JwtService {
    JwtService::new(&JwtConfig {
        secret: "integration-test-secret".to_string(),
        token_expiry: 3600,
    })
}

fn sign_raw(body: &serde_json::Value) -> String {
    encode(
        &Header::default(),
        body,
        &EncodingKey::from_secret(b"integration-test-secret"),
    )
    .expect("failed to encode test token")
}

fn epoch_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_secs()
}

#[test]
fn sign_then_verify_round_trips_claims() {
    let service = test_service();
    let claims = TokenClaims {
        email: "a@example.com".to_string(),
        name: "Alice".to_string(),
    };

    let token = service.sign(&claims).expect("signing failed");
    let verified = service.verify(&token).expect("verification failed");

    assert_eq!(verified.email, "a@example.com");
    assert_eq!(verified.name, "Alice");
    assert_eq!(verified.exp, verified.iat + 3600);
}

#[test]
fn verify_rejects_tampered_token() {
    let service = test_service();
    let claims = TokenClaims {
        email: "a@example.com".to_string(),
        name: "Alice".to_string(),
    };

    let mut token = service.sign(&claims).expect("signing failed");
    token.push('x');

    assert!(matches!(
        service.verify(&token),
        Err(TokenError::Invalid(_))
    ));
}

#[test]
fn verify_rejects_foreign_secret() {
    let service = test_service();
    let other = JwtService::new(&JwtConfig {
        secret: "some-other-secret".to_string(),
        token_expiry: 3600,
    });

    let token = other
        .sign(&TokenClaims {
            email: "a@example.com".to_string(),
            name: "Alice".to_string(),
        })
        .expect("signing failed");

    assert!(matches!(
        service.verify(&token),
        Err(TokenError::Invalid(_))
    ));
}

#[test]
fn verify_rejects_valid_signature_with_foreign_claim() {
    // Correctly signed, but the body carries a key outside both claim
    // sets; the shape check must refuse it.
    let service = test_service();
    let now = epoch_now();
    let token = sign_raw(&json!({
        "email": "a@example.com",
        "name": "Alice",
        "iat": now,
        "exp": now + 600,
        "role": "admin"
    }));

    assert!(matches!(
        service.verify(&token),
        Err(TokenError::MalformedClaims)
    ));
}

#[test]
fn verify_rejects_empty_business_claim() {
    let service = test_service();
    let now = epoch_now();
    let token = sign_raw(&json!({
        "email": "",
        "name": "Alice",
        "iat": now,
        "exp": now + 600
    }));

    assert!(matches!(
        service.verify(&token),
        Err(TokenError::MalformedClaims)
    ));
}

#[test]
fn signed_token_body_passes_shape_check() {
    let service = test_service();
    let token = service
        .sign(&TokenClaims {
            email: "a@example.com".to_string(),
            name: "Alice".to_string(),
        })
        .expect("signing failed");

    let verified = service.verify(&token).expect("verification failed");
    let as_value = serde_json::to_value(&verified).expect("serialization failed");

    assert!(is_signed_token_claims(&as_value));
    assert_eq!(
        SignedTokenClaims::from_value(&as_value),
        Some(verified)
    );
}
