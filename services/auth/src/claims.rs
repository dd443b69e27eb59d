//! Token claim shapes and payload validation
//!
//! A decoded token body arrives as untyped JSON. The predicates in this
//! module decide whether that value has exactly the expected claim shape
//! before any field of it is trusted. They never fail with an error: a
//! mismatch is a plain `false`, and the caller turns that into a generic
//! authentication rejection.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Claim keys asserted by the business side of a token.
pub const BUSINESS_CLAIM_KEYS: [&str; 2] = ["email", "name"];

/// Temporal claim keys stamped during signing.
pub const TEMPORAL_CLAIM_KEYS: [&str; 2] = ["iat", "exp"];

/// Business claims placed into a token at signing time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub email: String,
    pub name: String,
}

/// Claims carried by a signed token: the business claims plus the temporal
/// claims added when the token was issued
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTokenClaims {
    pub email: String,
    pub name: String,
    /// Issued-at time, seconds since epoch
    pub iat: u64,
    /// Expiration time, seconds since epoch
    pub exp: u64,
}

impl SignedTokenClaims {
    /// Narrow a decoded token body into typed claims.
    ///
    /// Returns `None` unless the value passes [`is_signed_token_claims`]
    /// and carries all four claims. The shape check alone accepts partial
    /// objects (every present key must be valid, none is required to be
    /// present); the typed form requires all of them.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !is_signed_token_claims(value) {
            return None;
        }

        serde_json::from_value(value.clone()).ok()
    }
}

/// Base structural gate: the value is a JSON object, not null and not an
/// array.
pub fn is_plain_object(value: &Value) -> bool {
    value.is_object()
}

/// True iff `value` is a plain object whose every key is a declared
/// business-claim key with a non-empty string value.
pub fn is_token_claims(value: &Value) -> bool {
    if !is_plain_object(value) {
        return false;
    }
    let Some(map) = value.as_object() else {
        return false;
    };

    map.iter().all(|(key, val)| {
        BUSINESS_CLAIM_KEYS.contains(&key.as_str())
            && val.as_str().is_some_and(|s| !s.is_empty())
    })
}

/// True iff `value` is a plain object whose every key belongs to one of
/// the declared claim key sets with a value of the matching type: business
/// claims must be non-empty strings, temporal claims must be numeric. Any
/// key outside both sets fails the whole check.
///
/// An object with zero keys passes: the condition holds vacuously.
pub fn is_signed_token_claims(value: &Value) -> bool {
    if !is_plain_object(value) {
        return false;
    }
    let Some(map) = value.as_object() else {
        return false;
    };

    map.iter().all(|(key, val)| {
        if BUSINESS_CLAIM_KEYS.contains(&key.as_str()) {
            val.as_str().is_some_and(|s| !s.is_empty())
        } else if TEMPORAL_CLAIM_KEYS.contains(&key.as_str()) {
            val.is_number()
        } else {
            false
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_object_accepts_only_objects() {
        assert!(is_plain_object(&json!({})));
        assert!(is_plain_object(&json!({ "email": "a@example.com" })));
        assert!(!is_plain_object(&json!(null)));
        assert!(!is_plain_object(&json!([])));
        assert!(!is_plain_object(&json!("claims")));
        assert!(!is_plain_object(&json!(42)));
    }

    #[test]
    fn token_claims_accepts_business_claims() {
        assert!(is_token_claims(&json!({
            "email": "a@example.com",
            "name": "Alice"
        })));
        assert!(is_token_claims(&json!({ "email": "a@example.com" })));
    }

    #[test]
    fn token_claims_rejects_empty_strings_and_foreign_keys() {
        assert!(!is_token_claims(&json!({ "email": "" })));
        assert!(!is_token_claims(&json!({ "email": 42 })));
        assert!(!is_token_claims(&json!({
            "email": "a@example.com",
            "iat": 1000
        })));
        assert!(!is_token_claims(&json!(null)));
        assert!(!is_token_claims(&json!(["email", "name"])));
    }

    #[test]
    fn signed_claims_accepts_full_claim_set() {
        assert!(is_signed_token_claims(&json!({
            "email": "a@example.com",
            "name": "Alice",
            "iat": 1000,
            "exp": 2000
        })));
    }

    #[test]
    fn signed_claims_accepts_empty_object_vacuously() {
        assert!(is_signed_token_claims(&json!({})));
    }

    #[test]
    fn signed_claims_rejects_empty_business_claim() {
        assert!(!is_signed_token_claims(&json!({
            "email": "",
            "name": "Alice",
            "iat": 1000,
            "exp": 2000
        })));
    }

    #[test]
    fn signed_claims_rejects_undeclared_key() {
        assert!(!is_signed_token_claims(&json!({
            "email": "a@example.com",
            "role": "admin"
        })));
    }

    #[test]
    fn signed_claims_rejects_mistyped_values() {
        assert!(!is_signed_token_claims(&json!({ "iat": "1000" })));
        assert!(!is_signed_token_claims(&json!({ "email": 5 })));
        assert!(!is_signed_token_claims(&json!(null)));
        assert!(!is_signed_token_claims(&json!([1, 2])));
    }

    #[test]
    fn from_value_narrows_full_claims() {
        let claims = SignedTokenClaims::from_value(&json!({
            "email": "a@example.com",
            "name": "Alice",
            "iat": 1000,
            "exp": 2000
        }))
        .expect("full claim set should narrow");

        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.name, "Alice");
        assert_eq!(claims.iat, 1000);
        assert_eq!(claims.exp, 2000);
    }

    #[test]
    fn from_value_requires_all_claims() {
        // The shape check passes vacuously, but an empty object can never
        // become trusted claims.
        assert_eq!(SignedTokenClaims::from_value(&json!({})), None);
        assert_eq!(
            SignedTokenClaims::from_value(&json!({
                "email": "a@example.com",
                "name": "Alice"
            })),
            None
        );
    }

    #[test]
    fn from_value_rejects_foreign_keys() {
        assert_eq!(
            SignedTokenClaims::from_value(&json!({
                "email": "a@example.com",
                "name": "Alice",
                "iat": 1000,
                "exp": 2000,
                "role": "admin"
            })),
            None
        );
    }
}
