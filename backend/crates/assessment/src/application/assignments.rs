//! Assignment management

use std::sync::Arc;

use kernel::actor::CurrentUser;
use kernel::id::{AssignmentId, CourseId};

use crate::domain::entity::assignment::{Assignment, AssignmentUpdate};
use crate::domain::repository::{AssignmentRepository, CourseAccessRepository};
use crate::error::{AssessmentError, AssessmentResult};

pub struct AssignmentUseCase<R> {
    repo: Arc<R>,
}

impl<R> AssignmentUseCase<R>
where
    R: AssignmentRepository + CourseAccessRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        actor: &CurrentUser,
        course_id: CourseId,
        title: String,
        max_score: i32,
        update: AssignmentUpdate,
    ) -> AssessmentResult<Assignment> {
        self.require_course_owner(actor, &course_id).await?;

        let mut assignment = Assignment::new(course_id, title, max_score);
        assignment.apply(update);
        AssignmentRepository::create(&*self.repo, &assignment).await?;

        tracing::info!(
            assignment_id = %assignment.assignment_id,
            course_id = %course_id,
            "Assignment created"
        );
        Ok(assignment)
    }

    /// Fetch an assignment. Visible to the course owner, admins and
    /// enrolled students.
    pub async fn get(
        &self,
        actor: &CurrentUser,
        assignment_id: &AssignmentId,
    ) -> AssessmentResult<Assignment> {
        let assignment = self.require_assignment(assignment_id).await?;

        let instructor = self.repo.course_instructor(&assignment.course_id).await?;
        let is_owner = instructor.is_some_and(|id| actor.owns_or_admin(id));

        if !is_owner
            && !actor.role.is_educator_or_admin()
            && !self.repo.is_enrolled(&actor.id, &assignment.course_id).await?
        {
            return Err(AssessmentError::EnrollmentRequired);
        }
        Ok(assignment)
    }

    /// Assignments of a course, same visibility rule as [`Self::get`]
    pub async fn list_by_course(
        &self,
        actor: &CurrentUser,
        course_id: &CourseId,
    ) -> AssessmentResult<Vec<Assignment>> {
        let instructor = self
            .repo
            .course_instructor(course_id)
            .await?
            .ok_or(AssessmentError::AssignmentNotFound)?;

        if !actor.owns_or_admin(instructor)
            && !actor.role.is_educator_or_admin()
            && !self.repo.is_enrolled(&actor.id, course_id).await?
        {
            return Err(AssessmentError::EnrollmentRequired);
        }

        self.repo.list_by_course(course_id).await
    }

    pub async fn update(
        &self,
        actor: &CurrentUser,
        assignment_id: &AssignmentId,
        update: AssignmentUpdate,
    ) -> AssessmentResult<Assignment> {
        let mut assignment = self.require_assignment(assignment_id).await?;
        self.require_course_owner(actor, &assignment.course_id).await?;

        assignment.apply(update);
        AssignmentRepository::update(&*self.repo, &assignment).await?;

        Ok(assignment)
    }

    pub async fn delete(
        &self,
        actor: &CurrentUser,
        assignment_id: &AssignmentId,
    ) -> AssessmentResult<()> {
        let assignment = self.require_assignment(assignment_id).await?;
        self.require_course_owner(actor, &assignment.course_id).await?;

        AssignmentRepository::delete(&*self.repo, assignment_id).await?;

        tracing::info!(assignment_id = %assignment_id, "Assignment deleted");
        Ok(())
    }

    async fn require_assignment(
        &self,
        assignment_id: &AssignmentId,
    ) -> AssessmentResult<Assignment> {
        AssignmentRepository::find_by_id(&*self.repo, assignment_id)
            .await?
            .ok_or(AssessmentError::AssignmentNotFound)
    }

    async fn require_course_owner(
        &self,
        actor: &CurrentUser,
        course_id: &CourseId,
    ) -> AssessmentResult<()> {
        let instructor = self
            .repo
            .course_instructor(course_id)
            .await?
            .ok_or(AssessmentError::AssignmentNotFound)?;

        if !actor.owns_or_admin(instructor) {
            return Err(AssessmentError::Forbidden);
        }
        Ok(())
    }
}
