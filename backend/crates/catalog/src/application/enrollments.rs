//! Enrollment Use Cases

use std::sync::Arc;

use kernel::actor::CurrentUser;
use kernel::id::CourseId;

use crate::domain::entity::course::Course;
use crate::domain::entity::enrollment::Enrollment;
use crate::domain::repository::{CourseRepository, EnrollmentRepository};
use crate::error::{CatalogError, CatalogResult};

pub struct EnrollmentUseCase<R> {
    repo: Arc<R>,
}

impl<R> EnrollmentUseCase<R>
where
    R: EnrollmentRepository + CourseRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Enroll the caller in a published course. A second attempt
    /// surfaces the unique constraint as a 409.
    pub async fn enroll(
        &self,
        actor: &CurrentUser,
        course_id: &CourseId,
    ) -> CatalogResult<Enrollment> {
        let course = CourseRepository::find_by_id(&*self.repo, course_id)
            .await?
            .ok_or(CatalogError::CourseNotFound)?;

        if !course.is_published {
            return Err(CatalogError::CourseNotPublished);
        }

        let enrollment = Enrollment::new(actor.id, *course_id);
        EnrollmentRepository::create(&*self.repo, &enrollment).await?;

        self.repo.increment_enrollment_count(course_id).await?;

        tracing::info!(
            course_id = %course_id,
            student_id = %actor.id,
            "Student enrolled"
        );

        Ok(enrollment)
    }

    /// The caller's enrollments with their courses, newest first
    pub async fn list_own(
        &self,
        actor: &CurrentUser,
    ) -> CatalogResult<Vec<(Enrollment, Course)>> {
        self.repo.list_by_student(&actor.id).await
    }
}
