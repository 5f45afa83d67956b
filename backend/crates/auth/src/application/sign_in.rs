//! Sign In Use Case
//!
//! Verifies credentials and issues a fresh token pair. Unknown emails
//! and wrong passwords both report `InvalidCredentials` so the response
//! does not reveal which accounts exist.

use std::sync::Arc;

use platform::password::RawPassword;

use crate::application::config::{AuthConfig, IssuedTokens};
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    pub user: User,
    pub tokens: IssuedTokens,
}

/// Sign in use case
pub struct SignInUseCase<R: UserRepository> {
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R: UserRepository> SignInUseCase<R> {
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        if !user.password.verify(&password, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.config.issue_tokens(&user)?;

        tracing::info!(user_id = %user.user_id, "User signed in");

        Ok(SignInOutput { user, tokens })
    }
}
