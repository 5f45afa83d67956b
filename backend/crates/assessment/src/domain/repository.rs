//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{AssignmentId, CourseId, QuizAttemptId, QuizId, SectionId, UserId};

use crate::domain::entity::assignment::{Assignment, AssignmentSubmission};
use crate::domain::entity::quiz::{Quiz, QuizAttempt};
use crate::error::AssessmentResult;

/// Quiz repository trait
#[trait_variant::make(QuizRepository: Send)]
pub trait LocalQuizRepository {
    async fn create(&self, quiz: &Quiz) -> AssessmentResult<()>;

    async fn find_by_id(&self, quiz_id: &QuizId) -> AssessmentResult<Option<Quiz>>;

    async fn list_by_section(&self, section_id: &SectionId) -> AssessmentResult<Vec<Quiz>>;

    async fn update(&self, quiz: &Quiz) -> AssessmentResult<()>;

    async fn delete(&self, quiz_id: &QuizId) -> AssessmentResult<()>;
}

/// Quiz attempt repository trait
#[trait_variant::make(AttemptRepository: Send)]
pub trait LocalAttemptRepository {
    async fn create(&self, attempt: &QuizAttempt) -> AssessmentResult<()>;

    async fn find_by_id(&self, attempt_id: &QuizAttemptId)
    -> AssessmentResult<Option<QuizAttempt>>;

    /// The student's attempt without a completion timestamp, if any
    async fn find_ongoing(
        &self,
        quiz_id: &QuizId,
        student_id: &UserId,
    ) -> AssessmentResult<Option<QuizAttempt>>;

    async fn count_for(&self, quiz_id: &QuizId, student_id: &UserId) -> AssessmentResult<i64>;

    async fn update(&self, attempt: &QuizAttempt) -> AssessmentResult<()>;
}

/// Assignment repository trait
#[trait_variant::make(AssignmentRepository: Send)]
pub trait LocalAssignmentRepository {
    async fn create(&self, assignment: &Assignment) -> AssessmentResult<()>;

    async fn find_by_id(&self, assignment_id: &AssignmentId)
    -> AssessmentResult<Option<Assignment>>;

    async fn list_by_course(&self, course_id: &CourseId) -> AssessmentResult<Vec<Assignment>>;

    async fn update(&self, assignment: &Assignment) -> AssessmentResult<()>;

    async fn delete(&self, assignment_id: &AssignmentId) -> AssessmentResult<()>;
}

/// Submission repository trait
#[trait_variant::make(SubmissionRepository: Send)]
pub trait LocalSubmissionRepository {
    /// Insert or, for a repeat submission, overwrite the student's row
    async fn upsert(&self, submission: &AssignmentSubmission) -> AssessmentResult<()>;

    async fn find_by_student(
        &self,
        assignment_id: &AssignmentId,
        student_id: &UserId,
    ) -> AssessmentResult<Option<AssignmentSubmission>>;

    async fn list_by_assignment(
        &self,
        assignment_id: &AssignmentId,
    ) -> AssessmentResult<Vec<AssignmentSubmission>>;

    async fn update(&self, submission: &AssignmentSubmission) -> AssessmentResult<()>;
}

/// Course facts the assessment flows need from the catalog tables
#[trait_variant::make(CourseAccessRepository: Send)]
pub trait LocalCourseAccessRepository {
    /// Instructor of the course, `None` when the course is gone
    async fn course_instructor(&self, course_id: &CourseId) -> AssessmentResult<Option<UserId>>;

    /// Course a section belongs to
    async fn section_course(&self, section_id: &SectionId) -> AssessmentResult<Option<CourseId>>;

    async fn is_enrolled(&self, student_id: &UserId, course_id: &CourseId)
    -> AssessmentResult<bool>;
}
