//! Sign Up Use Case
//!
//! Registers a new account and issues the first token pair.

use std::sync::Arc;

use kernel::actor::UserRole;
use platform::password::RawPassword;

use crate::application::config::{AuthConfig, IssuedTokens};
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, person_name::PersonName};
use crate::error::{AuthError, AuthResult};

/// Sign up input, already validated at the DTO boundary
#[derive(Debug)]
pub struct SignUpInput {
    pub email: Email,
    pub password: RawPassword,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub role: UserRole,
}

/// Sign up output
pub struct SignUpOutput {
    pub user: User,
    pub tokens: IssuedTokens,
}

/// Sign up use case
pub struct SignUpUseCase<R: UserRepository> {
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R: UserRepository> SignUpUseCase<R> {
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        if self.repo.exists_by_email(&input.email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password = input.password.hash(self.config.pepper())?;
        let user = User::new(
            input.email,
            password,
            input.first_name,
            input.last_name,
            input.role,
        );

        self.repo.create(&user).await?;

        let tokens = self.config.issue_tokens(&user)?;

        tracing::info!(
            user_id = %user.user_id,
            role = %user.role,
            "User signed up"
        );

        Ok(SignUpOutput { user, tokens })
    }
}
