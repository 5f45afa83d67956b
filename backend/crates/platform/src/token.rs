//! JWT Access/Refresh Tokens
//!
//! Stateless HS256 tokens: a short-lived access token carrying the user's
//! identity and role, and a longer-lived refresh token carrying only the
//! user id. The two token kinds are signed with separate secrets, so a
//! refresh token can never be replayed as an access token.

use std::time::Duration;

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind as JwtErrorKind, get_current_timestamp,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::random_bytes;

/// Access token TTL (15 minutes)
pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Refresh token TTL (7 days)
pub const REFRESH_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 3600);

/// Token verification errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Token is invalid")]
    Invalid,
}

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User id
    pub sub: String,
    pub email: String,
    pub role: String,
    pub iat: u64,
    pub exp: u64,
}

/// Claims carried by a refresh token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// User id
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

/// Token signing configuration
#[derive(Clone)]
pub struct TokenConfig {
    access_secret: Vec<u8>,
    refresh_secret: Vec<u8>,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl TokenConfig {
    pub fn new(access_secret: Vec<u8>, refresh_secret: Vec<u8>) -> Self {
        Self {
            access_secret,
            refresh_secret,
            access_ttl: ACCESS_TOKEN_TTL,
            refresh_ttl: REFRESH_TOKEN_TTL,
        }
    }

    /// Random secrets, for local development only
    pub fn development() -> Self {
        Self::new(random_bytes(32), random_bytes(32))
    }

    /// Issue an access token for a user
    pub fn issue_access(
        &self,
        user_id: &str,
        email: &str,
        role: &str,
    ) -> Result<String, TokenError> {
        let now = get_current_timestamp();
        let claims = AccessClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            iat: now,
            exp: now + self.access_ttl.as_secs(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.access_secret),
        )
        .map_err(|_| TokenError::Invalid)
    }

    /// Issue a refresh token for a user
    pub fn issue_refresh(&self, user_id: &str) -> Result<String, TokenError> {
        let now = get_current_timestamp();
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.refresh_ttl.as_secs(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.refresh_secret),
        )
        .map_err(|_| TokenError::Invalid)
    }

    /// Verify and decode an access token
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(&self.access_secret),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(map_jwt_error)
    }

    /// Verify and decode a refresh token
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        decode::<RefreshClaims>(
            token,
            &DecodingKey::from_secret(&self.refresh_secret),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(map_jwt_error)
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("access_secret", &"[SECRET]")
            .field("refresh_secret", &"[SECRET]")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        JwtErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TokenConfig {
        TokenConfig::new(b"access-secret-for-tests".to_vec(), b"refresh-secret-for-tests".to_vec())
    }

    #[test]
    fn test_access_roundtrip() {
        let cfg = config();
        let token = cfg
            .issue_access("user-1", "alice@example.edu", "EDUCATOR")
            .unwrap();

        let claims = cfg.verify_access(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "alice@example.edu");
        assert_eq!(claims.role, "EDUCATOR");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_refresh_roundtrip() {
        let cfg = config();
        let token = cfg.issue_refresh("user-1").unwrap();
        let claims = cfg.verify_refresh(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
    }

    #[test]
    fn test_tampered_token_rejected() {
        let cfg = config();
        let token = cfg
            .issue_access("user-1", "alice@example.edu", "STUDENT")
            .unwrap();

        let mut tampered = token.clone();
        // Flip a character in the payload segment
        let mid = token.len() / 2;
        let replacement = if &token[mid..mid + 1] == "a" { "b" } else { "a" };
        tampered.replace_range(mid..mid + 1, replacement);

        assert_eq!(cfg.verify_access(&tampered), Err(TokenError::Invalid));
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut cfg = config();
        cfg.access_ttl = Duration::from_secs(0);

        let token = cfg
            .issue_access("user-1", "alice@example.edu", "STUDENT")
            .unwrap();

        // jsonwebtoken applies default leeway; strip it for the check
        let result = decode::<AccessClaims>(
            &token,
            &DecodingKey::from_secret(b"access-secret-for-tests"),
            &{
                let mut v = Validation::new(Algorithm::HS256);
                v.leeway = 0;
                v
            },
        );
        assert!(matches!(
            result.unwrap_err().kind(),
            JwtErrorKind::ExpiredSignature
        ));
    }

    #[test]
    fn test_refresh_not_valid_as_access() {
        let cfg = config();
        let refresh = cfg.issue_refresh("user-1").unwrap();
        assert_eq!(cfg.verify_access(&refresh), Err(TokenError::Invalid));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let cfg = config();
        let other = TokenConfig::new(b"different-secret".to_vec(), b"also-different".to_vec());

        let token = cfg
            .issue_access("user-1", "alice@example.edu", "STUDENT")
            .unwrap();
        assert_eq!(other.verify_access(&token), Err(TokenError::Invalid));
    }
}
