//! Profile Management Use Case
//!
//! Partial profile updates, password changes and the admin-only role
//! change.

use std::sync::Arc;

use kernel::actor::{CurrentUser, UserRole};
use kernel::id::UserId;
use platform::password::RawPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::{ProfileUpdate, User};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Profile use case
pub struct ProfileUseCase<R: UserRepository> {
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R: UserRepository> ProfileUseCase<R> {
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Apply a partial update to the caller's own profile
    pub async fn update_profile(
        &self,
        actor: &CurrentUser,
        update: ProfileUpdate,
    ) -> AuthResult<User> {
        let mut user = self.load(&actor.id).await?;
        user.apply_profile(update);
        self.repo.update(&user).await?;
        Ok(user)
    }

    /// Change the caller's password, verifying the current one first
    pub async fn change_password(
        &self,
        actor: &CurrentUser,
        current: RawPassword,
        new: RawPassword,
    ) -> AuthResult<()> {
        let mut user = self.load(&actor.id).await?;

        if !user.password.verify(&current, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        user.set_password(new.hash(self.config.pepper())?);
        self.repo.update(&user).await?;

        tracing::info!(user_id = %user.user_id, "Password changed");
        Ok(())
    }

    /// Change another user's role. Admin only.
    pub async fn set_role(
        &self,
        actor: &CurrentUser,
        target: UserId,
        role: UserRole,
    ) -> AuthResult<User> {
        if !actor.role.is_admin() {
            return Err(AuthError::Forbidden);
        }

        let mut user = self.load(&target).await?;
        user.set_role(role);
        self.repo.update(&user).await?;

        tracing::info!(user_id = %user.user_id, role = %role, "Role changed");
        Ok(user)
    }

    async fn load(&self, user_id: &UserId) -> AuthResult<User> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
