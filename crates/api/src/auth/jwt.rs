//! Token issuing for the auth endpoints.
//!
//! A login yields a [`TokenPair`]: a short-lived HS256 JWT and an opaque
//! refresh token. The refresh token is handed to the client once; the
//! server keeps its SHA-256 digest in `user_sessions`.

use chrono::{Duration, Utc};
use gigbook_core::types::{DbId, Timestamp};
use jsonwebtoken::errors::Error as JwtError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: DbId,
    /// `artist`, `organizer` or `admin`.
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

impl Claims {
    fn new(user_id: DbId, role: &str, ttl: Duration) -> Self {
        let issued = Utc::now();
        Self {
            sub: user_id,
            role: role.to_owned(),
            exp: (issued + ttl).timestamp(),
            iat: issued.timestamp(),
            jti: Uuid::new_v4().simple().to_string(),
        }
    }
}

/// Signing secret and token lifetimes.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required), `JWT_ACCESS_EXPIRY_MINS` (default `60`)
    /// and `JWT_REFRESH_EXPIRY_DAYS` (default `7`).
    ///
    /// # Panics
    ///
    /// Panics when the secret is missing or a lifetime is not a positive integer.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.trim().is_empty(), "JWT_SECRET must be set and non-empty");

        Self {
            secret,
            access_ttl: Duration::minutes(positive_env("JWT_ACCESS_EXPIRY_MINS", 60)),
            refresh_ttl: Duration::days(positive_env("JWT_REFRESH_EXPIRY_DAYS", 7)),
        }
    }

    /// Sign an access token for `user_id` and mint a fresh refresh token.
    pub fn issue(&self, user_id: DbId, role: &str) -> Result<TokenPair, JwtError> {
        let claims = Claims::new(user_id, role, self.access_ttl);
        let access_token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        let refresh_token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        Ok(TokenPair {
            access_token,
            refresh_hash: refresh_token_digest(&refresh_token),
            refresh_token,
            access_expires_in: self.access_ttl.num_seconds(),
            refresh_expires_at: Utc::now() + self.refresh_ttl,
        })
    }

    /// Check signature and expiry of an access token.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
    }
}

/// Output of [`JwtConfig::issue`].
#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    /// Plaintext, returned to the client only.
    pub refresh_token: String,
    /// What gets stored in the session row.
    pub refresh_hash: String,
    /// Access token lifetime in seconds.
    pub access_expires_in: i64,
    pub refresh_expires_at: Timestamp,
}

/// Lowercase hex SHA-256 of a presented refresh token.
pub fn refresh_token_digest(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("{digest:x}")
}

fn positive_env(key: &str, default: i64) -> i64 {
    let value = match std::env::var(key) {
        Ok(raw) => raw
            .parse::<i64>()
            .unwrap_or_else(|_| panic!("{key} must be an integer, got '{raw}'")),
        Err(_) => default,
    };
    assert!(value > 0, "{key} must be positive");
    value
}
