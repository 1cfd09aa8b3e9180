// Bearer token creation and verification
// HS256-signed JWTs carrying the username as subject

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token type reported alongside every issued token
pub const TOKEN_TYPE: &str = "bearer";

/// Default token lifetime in minutes
pub const DEFAULT_TTL_MINUTES: i64 = 30;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims structure
///
/// # Fields
/// * `sub` - Subject (username)
/// * `iat` - Issued-at time (seconds since epoch)
/// * `exp` - Expiry time (seconds since epoch)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Failed to create token: {0}")]
    Encoding(String),
}

/// Creates a signed token for `subject` that expires after `ttl`
///
/// # Example
/// ```
/// use chrono::Duration;
/// use cyberbank_api::auth::jwt::{create_token, verify_token};
///
/// let secret = "a-long-enough-test-secret";
/// let token = create_token("alice", secret, Duration::minutes(30)).expect("valid token");
///
/// let claims = verify_token(&token, secret).expect("valid token");
/// assert_eq!(claims.sub, "alice");
/// ```
pub fn create_token(subject: &str, secret: &str, ttl: Duration) -> Result<String, TokenError> {
    let now = Utc::now();
    let claims = Claims {
        sub: subject.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    encode(
        &Header::new(ALGORITHM),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Encoding(e.to_string()))
}

/// Verifies the signature and expiry of a token and returns its claims
///
/// Expiry is checked without leeway. Tokens with an empty subject are
/// rejected.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(ALGORITHM);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(e.to_string()),
    })?;

    if claims.sub.trim().is_empty() {
        return Err(TokenError::Invalid("missing subject".to_string()));
    }

    Ok(claims)
}
