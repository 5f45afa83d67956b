//! Application Configuration
//!
//! Configuration for the Auth application layer: token signing keys,
//! the two auth cookies, and the optional password pepper.

use platform::cookie::CookieConfig;
use platform::token::TokenConfig;

use crate::domain::entity::User;
use crate::error::AuthResult;

/// Access token cookie name
pub const ACCESS_COOKIE: &str = "accessToken";

/// Refresh token cookie name
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing configuration
    pub tokens: TokenConfig,
    /// Cookie carrying the access token
    pub access_cookie: CookieConfig,
    /// Cookie carrying the refresh token
    pub refresh_cookie: CookieConfig,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

/// Freshly issued access/refresh token pair
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
}

impl AuthConfig {
    /// Build a config from token keys. Cookie lifetimes follow the
    /// token TTLs so a cookie never outlives its token.
    pub fn new(tokens: TokenConfig, secure_cookies: bool) -> Self {
        let mut access_cookie =
            CookieConfig::http_only(ACCESS_COOKIE, tokens.access_ttl.as_secs() as i64);
        let mut refresh_cookie =
            CookieConfig::http_only(REFRESH_COOKIE, tokens.refresh_ttl.as_secs() as i64);
        access_cookie.secure = secure_cookies;
        refresh_cookie.secure = secure_cookies;

        Self {
            tokens,
            access_cookie,
            refresh_cookie,
            password_pepper: None,
        }
    }

    /// Random keys and insecure cookies, for local development only
    pub fn development() -> Self {
        Self::new(TokenConfig::development(), false)
    }

    pub fn with_pepper(mut self, pepper: Option<Vec<u8>>) -> Self {
        self.password_pepper = pepper;
        self
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Issue a fresh access/refresh pair for a user
    pub fn issue_tokens(&self, user: &User) -> AuthResult<IssuedTokens> {
        let id = user.user_id.to_string();
        let access_token =
            self.tokens
                .issue_access(&id, user.email.as_str(), user.role.code())?;
        let refresh_token = self.tokens.issue_refresh(&id)?;

        Ok(IssuedTokens {
            access_token,
            refresh_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_lifetimes_follow_token_ttls() {
        let config = AuthConfig::development();
        assert_eq!(config.access_cookie.name, ACCESS_COOKIE);
        assert_eq!(config.access_cookie.max_age_secs, Some(15 * 60));
        assert_eq!(config.refresh_cookie.max_age_secs, Some(7 * 24 * 3600));
        assert!(!config.access_cookie.secure);
    }
}
