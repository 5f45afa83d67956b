//! Onboarding Use Case
//!
//! One-time profile completion after sign up. The student and educator
//! paths each require the matching role and can only run once.

use std::sync::Arc;

use kernel::actor::CurrentUser;
use kernel::actor::UserRole;

use crate::domain::entity::{EducatorOnboarding, StudentOnboarding, User};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Onboarding use case
pub struct OnboardingUseCase<R: UserRepository> {
    repo: Arc<R>,
}

impl<R: UserRepository> OnboardingUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn onboard_student(
        &self,
        actor: &CurrentUser,
        data: StudentOnboarding,
    ) -> AuthResult<User> {
        let mut user = self.load(actor).await?;

        if user.role != UserRole::Student {
            return Err(AuthError::Forbidden);
        }

        user.onboard_student(data);
        self.repo.update(&user).await?;

        tracing::info!(user_id = %user.user_id, "Student onboarding completed");
        Ok(user)
    }

    pub async fn onboard_educator(
        &self,
        actor: &CurrentUser,
        data: EducatorOnboarding,
    ) -> AuthResult<User> {
        let mut user = self.load(actor).await?;

        if !user.role.is_educator_or_admin() {
            return Err(AuthError::Forbidden);
        }

        user.onboard_educator(data);
        self.repo.update(&user).await?;

        tracing::info!(user_id = %user.user_id, "Educator onboarding completed");
        Ok(user)
    }

    async fn load(&self, actor: &CurrentUser) -> AuthResult<User> {
        let user = self
            .repo
            .find_by_id(&actor.id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if user.onboarded {
            return Err(AuthError::AlreadyOnboarded);
        }

        Ok(user)
    }
}
