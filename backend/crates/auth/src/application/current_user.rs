//! Current User Resolution
//!
//! Turns a bearer access token into the authenticated user. Used by
//! the auth middleware on every guarded request and by the profile
//! endpoint.

use std::sync::Arc;

use kernel::actor::CurrentUser;
use kernel::id::UserId;

use crate::application::config::AuthConfig;
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Build the request actor from a loaded user
pub fn to_current_user(user: &User) -> CurrentUser {
    CurrentUser {
        id: user.user_id,
        email: user.email.as_str().to_string(),
        role: user.role,
        onboarded: user.onboarded,
    }
}

/// Current user use case
pub struct CurrentUserUseCase<R: UserRepository> {
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R: UserRepository> CurrentUserUseCase<R> {
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Verify the access token and load the account behind it.
    ///
    /// Role and onboarding state come from the database, not the token,
    /// so stale claims cannot grant more than the account currently has.
    pub async fn execute(&self, access_token: &str) -> AuthResult<User> {
        let claims = self.config.tokens.verify_access(access_token)?;

        let user_id = UserId::parse(&claims.sub).map_err(|_| AuthError::TokenInvalid)?;

        self.repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::TokenInvalid)
    }
}
