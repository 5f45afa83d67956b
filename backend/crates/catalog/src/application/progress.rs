//! Progress Tracking Use Case
//!
//! Toggling a section's completion marker recomputes the enrollment
//! percentage; the first time a course hits 100% a certificate is
//! issued and the analytics completion rate is refreshed.

use std::sync::Arc;

use kernel::actor::CurrentUser;
use kernel::id::SectionId;

use crate::domain::repository::{CourseRepository, EnrollmentRepository, SectionRepository};
use crate::error::{CatalogError, CatalogResult};

/// Result of a progress toggle
#[derive(Debug, Clone)]
pub struct ProgressOutput {
    /// Whether the section is now marked complete
    pub section_completed: bool,
    pub progress_percent: i32,
    pub course_completed: bool,
    pub certificate_issued: bool,
}

pub struct ProgressUseCase<R> {
    repo: Arc<R>,
}

impl<R> ProgressUseCase<R>
where
    R: EnrollmentRepository + SectionRepository + CourseRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn toggle(
        &self,
        actor: &CurrentUser,
        section_id: &SectionId,
    ) -> CatalogResult<ProgressOutput> {
        let section = SectionRepository::find_by_id(&*self.repo, section_id)
            .await?
            .ok_or(CatalogError::SectionNotFound)?;

        if !section.is_published {
            return Err(CatalogError::SectionNotFound);
        }

        let mut enrollment =
            EnrollmentRepository::find(&*self.repo, &actor.id, &section.course_id)
                .await?
                .ok_or(CatalogError::EnrollmentRequired)?;

        let section_completed = self
            .repo
            .toggle_section_progress(&actor.id, section_id)
            .await?;

        let done = self
            .repo
            .count_completed_sections(&actor.id, &section.course_id)
            .await?;
        let total =
            SectionRepository::count_published(&*self.repo, &section.course_id).await?;

        let completed_now = enrollment.update_progress(done, total);
        EnrollmentRepository::update(&*self.repo, &enrollment).await?;

        if completed_now {
            self.repo
                .issue_certificate(&actor.id, &section.course_id)
                .await?;
            self.repo
                .refresh_completion_rate(&section.course_id)
                .await?;

            tracing::info!(
                course_id = %section.course_id,
                student_id = %actor.id,
                "Course completed, certificate issued"
            );
        }

        Ok(ProgressOutput {
            section_completed,
            progress_percent: enrollment.progress_percent,
            course_completed: enrollment.completed,
            certificate_issued: completed_now,
        })
    }
}
