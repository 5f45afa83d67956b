//! Token Refresh Use Case
//!
//! Exchanges a valid refresh token for a new access/refresh pair.
//! Claims are re-read from the database so a role change made after
//! the token was issued takes effect on the next refresh.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::{AuthConfig, IssuedTokens};
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Refresh output
pub struct RefreshOutput {
    pub user: User,
    pub tokens: IssuedTokens,
}

/// Token refresh use case
pub struct RefreshUseCase<R: UserRepository> {
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R: UserRepository> RefreshUseCase<R> {
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<RefreshOutput> {
        let claims = self.config.tokens.verify_refresh(refresh_token)?;

        let user_id = UserId::parse(&claims.sub).map_err(|_| AuthError::TokenInvalid)?;

        // A token for a deleted account is treated the same as a bad one
        let user = self
            .repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::TokenInvalid)?;

        let tokens = self.config.issue_tokens(&user)?;

        tracing::debug!(user_id = %user.user_id, "Tokens refreshed");

        Ok(RefreshOutput { user, tokens })
    }
}
