//! Authentication tests
//!
//! Token round-trips, expiry handling, and the account validation rules
//! used at seed time.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};

use shared::types::UserRole;
use shared::validation::{validate_login, validate_password};

/// The claims shape issued at login and read by the middleware
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct Claims {
    id: i64,
    role: String,
    full_name: String,
    login: String,
    exp: i64,
    iat: i64,
}

fn claims_for(id: i64, role: UserRole, login: &str, ttl: i64) -> Claims {
    let now = Utc::now().timestamp();
    Claims {
        id,
        role: role.as_str().to_string(),
        full_name: "Test User".to_string(),
        login: login.to_string(),
        exp: now + ttl,
        iat: now,
    }
}

fn sign(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

fn verify(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

// ============================================================================
// Unit tests
// ============================================================================

#[test]
fn token_round_trip_preserves_identity() {
    let claims = claims_for(7, UserRole::Cashier, "cashier_7", 3600);
    let token = sign(&claims, "test-secret");

    let decoded = verify(&token, "test-secret").unwrap();
    assert_eq!(decoded, claims);
    assert_eq!(decoded.role.parse::<UserRole>().unwrap(), UserRole::Cashier);
}

#[test]
fn expired_token_is_rejected() {
    let claims = claims_for(7, UserRole::Cashier, "cashier_7", -3600);
    let token = sign(&claims, "test-secret");

    assert!(verify(&token, "test-secret").is_err());
}

#[test]
fn wrong_secret_is_rejected() {
    let claims = claims_for(1, UserRole::Admin, "admin", 3600);
    let token = sign(&claims, "test-secret");

    assert!(verify(&token, "another-secret").is_err());
}

#[test]
fn tampered_token_is_rejected() {
    let claims = claims_for(1, UserRole::Admin, "admin", 3600);
    let mut token = sign(&claims, "test-secret");
    // Flip a character in the signature segment.
    let flipped = if token.ends_with('x') { 'y' } else { 'x' };
    token.pop();
    token.push(flipped);

    assert!(verify(&token, "test-secret").is_err());
}

#[test]
fn password_hash_round_trip() {
    // MIN_COST (== 4) keeps the test fast; the binaries use DEFAULT_COST.
    let hash = bcrypt::hash("s3cret-password", 4).unwrap();

    assert!(bcrypt::verify("s3cret-password", &hash).unwrap());
    assert!(!bcrypt::verify("wrong-password", &hash).unwrap());
}

// ============================================================================
// Property-based tests
// ============================================================================

fn login_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_]{3,32}"
}

fn password_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9!@#$%]{8,20}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Well-formed logins pass validation
    #[test]
    fn prop_valid_logins_accepted(login in login_strategy()) {
        prop_assert!(validate_login(&login).is_ok());
    }

    /// Whitespace in a login is always rejected
    #[test]
    fn prop_logins_with_spaces_rejected(
        prefix in "[a-z0-9_]{1,10}",
        suffix in "[a-z0-9_]{1,10}"
    ) {
        let login = format!("{prefix} {suffix}");
        prop_assert!(validate_login(&login).is_err());
    }

    /// Passwords of eight or more characters pass validation
    #[test]
    fn prop_valid_passwords_accepted(password in password_strategy()) {
        prop_assert!(validate_password(&password).is_ok());
    }

    /// Short passwords are rejected
    #[test]
    fn prop_short_passwords_rejected(password in "[a-zA-Z0-9]{0,7}") {
        prop_assert!(validate_password(&password).is_err());
    }

    /// Any signed token decodes with the signing secret and fails with a
    /// different one
    #[test]
    fn prop_token_binds_to_secret(
        id in 1i64..=1_000_000,
        login in login_strategy(),
        secret in "[a-zA-Z0-9]{8,32}",
        other in "[a-zA-Z0-9]{8,32}"
    ) {
        let claims = claims_for(id, UserRole::Cashier, &login, 3600);
        let token = sign(&claims, &secret);

        prop_assert!(verify(&token, &secret).is_ok());
        if secret != other {
            prop_assert!(verify(&token, &other).is_err());
        }
    }
}
