//! Assignment submissions and manual grading

use std::sync::Arc;

use kernel::actor::CurrentUser;
use kernel::error::app_error::FieldError;
use kernel::id::{AssignmentId, SubmissionId};

use crate::domain::entity::assignment::{Assignment, AssignmentSubmission};
use crate::domain::repository::{
    AssignmentRepository, CourseAccessRepository, SubmissionRepository,
};
use crate::error::{AssessmentError, AssessmentResult};

pub struct SubmissionUseCase<R> {
    repo: Arc<R>,
}

impl<R> SubmissionUseCase<R>
where
    R: AssignmentRepository + SubmissionRepository + CourseAccessRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Hand in work. A repeat submission overwrites the previous one
    /// and drops any grade it carried.
    pub async fn submit(
        &self,
        actor: &CurrentUser,
        assignment_id: &AssignmentId,
        text: Option<String>,
        file_url: Option<String>,
    ) -> AssessmentResult<AssignmentSubmission> {
        let assignment = self.require_assignment(assignment_id).await?;

        if !self.repo.is_enrolled(&actor.id, &assignment.course_id).await? {
            return Err(AssessmentError::EnrollmentRequired);
        }
        if !assignment.accepts_submissions(chrono::Utc::now()) {
            return Err(AssessmentError::DueDatePassed);
        }

        let submission = match self.repo.find_by_student(assignment_id, &actor.id).await? {
            Some(mut existing) => {
                existing.resubmit(text, file_url);
                existing
            }
            None => AssignmentSubmission::new(*assignment_id, actor.id, text, file_url),
        };
        self.repo.upsert(&submission).await?;

        tracing::info!(
            submission_id = %submission.submission_id,
            assignment_id = %assignment_id,
            "Assignment submitted"
        );
        Ok(submission)
    }

    /// The caller's own submission for an assignment
    pub async fn own(
        &self,
        actor: &CurrentUser,
        assignment_id: &AssignmentId,
    ) -> AssessmentResult<Option<AssignmentSubmission>> {
        self.require_assignment(assignment_id).await?;
        self.repo.find_by_student(assignment_id, &actor.id).await
    }

    /// All submissions, course owner or admin only
    pub async fn list(
        &self,
        actor: &CurrentUser,
        assignment_id: &AssignmentId,
    ) -> AssessmentResult<Vec<AssignmentSubmission>> {
        let assignment = self.require_assignment(assignment_id).await?;
        self.require_course_owner(actor, &assignment).await?;

        self.repo.list_by_assignment(assignment_id).await
    }

    /// Grade a submission. The score must fall within the assignment's
    /// maximum.
    pub async fn grade(
        &self,
        actor: &CurrentUser,
        assignment_id: &AssignmentId,
        submission_id: &SubmissionId,
        score: i32,
        feedback: Option<String>,
    ) -> AssessmentResult<AssignmentSubmission> {
        let assignment = self.require_assignment(assignment_id).await?;
        self.require_course_owner(actor, &assignment).await?;

        if score < 0 || score > assignment.max_score {
            return Err(AssessmentError::Validation(vec![FieldError::new(
                "score",
                format!("Score must be between 0 and {}", assignment.max_score),
            )]));
        }

        let mut submission = self
            .repo
            .list_by_assignment(assignment_id)
            .await?
            .into_iter()
            .find(|s| s.submission_id == *submission_id)
            .ok_or(AssessmentError::SubmissionNotFound)?;

        submission.grade(score, feedback);
        SubmissionRepository::update(&*self.repo, &submission).await?;

        tracing::info!(
            submission_id = %submission_id,
            score = score,
            "Submission graded"
        );
        Ok(submission)
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
        assignment: &Assignment,
    ) -> AssessmentResult<()> {
        let instructor = self
            .repo
            .course_instructor(&assignment.course_id)
            .await?
            .ok_or(AssessmentError::AssignmentNotFound)?;

        if !actor.owns_or_admin(instructor) {
            return Err(AssessmentError::Forbidden);
        }
        Ok(())
    }
}
