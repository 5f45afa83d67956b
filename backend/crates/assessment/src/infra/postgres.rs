//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::{AssignmentId, CourseId, QuizAttemptId, QuizId, SectionId, SubmissionId, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::assignment::{Assignment, AssignmentSubmission, SubmissionStatus};
use crate::domain::entity::quiz::{AnswerSheet, Quiz, QuizAttempt, QuizQuestion};
use crate::domain::repository::{
    AssignmentRepository, AttemptRepository, CourseAccessRepository, QuizRepository,
    SubmissionRepository,
};
use crate::error::{AssessmentError, AssessmentResult};

const QUIZ_COLUMNS: &str = "quiz_id, course_id, section_id, title, description, \
     time_limit_minutes, passing_score, max_attempts, questions, created_at, updated_at";

const ATTEMPT_COLUMNS: &str = "attempt_id, quiz_id, student_id, started_at, completed_at, \
     answers, score_percent, passed";

const ASSIGNMENT_COLUMNS: &str = "assignment_id, course_id, section_id, title, description, \
     due_date, max_score, file_url, created_at, updated_at";

const SUBMISSION_COLUMNS: &str = "submission_id, assignment_id, student_id, body, file_url, \
     status, score, feedback, submitted_at, updated_at";

/// PostgreSQL-backed assessment repository
#[derive(Clone)]
pub struct PgAssessmentRepository {
    pool: PgPool,
}

impl PgAssessmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Quizzes
// ============================================================================

impl QuizRepository for PgAssessmentRepository {
    async fn create(&self, quiz: &Quiz) -> AssessmentResult<()> {
        sqlx::query(
            "INSERT INTO quizzes (quiz_id, course_id, section_id, title, description, \
             time_limit_minutes, passing_score, max_attempts, questions, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(quiz.quiz_id.as_uuid())
        .bind(quiz.course_id.as_uuid())
        .bind(quiz.section_id.as_uuid())
        .bind(&quiz.title)
        .bind(&quiz.description)
        .bind(quiz.time_limit_minutes)
        .bind(quiz.passing_score)
        .bind(quiz.max_attempts)
        .bind(questions_json(&quiz.questions)?)
        .bind(quiz.created_at)
        .bind(quiz.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, quiz_id: &QuizId) -> AssessmentResult<Option<Quiz>> {
        let row = sqlx::query_as::<_, QuizRow>(&format!(
            "SELECT {QUIZ_COLUMNS} FROM quizzes WHERE quiz_id = $1"
        ))
        .bind(quiz_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(QuizRow::into_quiz).transpose()
    }

    async fn list_by_section(&self, section_id: &SectionId) -> AssessmentResult<Vec<Quiz>> {
        let rows = sqlx::query_as::<_, QuizRow>(&format!(
            "SELECT {QUIZ_COLUMNS} FROM quizzes WHERE section_id = $1 ORDER BY created_at"
        ))
        .bind(section_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(QuizRow::into_quiz).collect()
    }

    async fn update(&self, quiz: &Quiz) -> AssessmentResult<()> {
        sqlx::query(
            "UPDATE quizzes SET title = $2, description = $3, time_limit_minutes = $4, \
             passing_score = $5, max_attempts = $6, questions = $7, updated_at = $8 \
             WHERE quiz_id = $1",
        )
        .bind(quiz.quiz_id.as_uuid())
        .bind(&quiz.title)
        .bind(&quiz.description)
        .bind(quiz.time_limit_minutes)
        .bind(quiz.passing_score)
        .bind(quiz.max_attempts)
        .bind(questions_json(&quiz.questions)?)
        .bind(quiz.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, quiz_id: &QuizId) -> AssessmentResult<()> {
        sqlx::query("DELETE FROM quizzes WHERE quiz_id = $1")
            .bind(quiz_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Quiz attempts
// ============================================================================

impl AttemptRepository for PgAssessmentRepository {
    async fn create(&self, attempt: &QuizAttempt) -> AssessmentResult<()> {
        sqlx::query(
            "INSERT INTO quiz_attempts (attempt_id, quiz_id, student_id, started_at, \
             completed_at, answers, score_percent, passed) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(attempt.attempt_id.as_uuid())
        .bind(attempt.quiz_id.as_uuid())
        .bind(attempt.student_id.as_uuid())
        .bind(attempt.started_at)
        .bind(attempt.completed_at)
        .bind(answers_json(&attempt.answers)?)
        .bind(attempt.score_percent)
        .bind(attempt.passed)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        attempt_id: &QuizAttemptId,
    ) -> AssessmentResult<Option<QuizAttempt>> {
        let row = sqlx::query_as::<_, AttemptRow>(&format!(
            "SELECT {ATTEMPT_COLUMNS} FROM quiz_attempts WHERE attempt_id = $1"
        ))
        .bind(attempt_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AttemptRow::into_attempt).transpose()
    }

    async fn find_ongoing(
        &self,
        quiz_id: &QuizId,
        student_id: &UserId,
    ) -> AssessmentResult<Option<QuizAttempt>> {
        let row = sqlx::query_as::<_, AttemptRow>(&format!(
            "SELECT {ATTEMPT_COLUMNS} FROM quiz_attempts \
             WHERE quiz_id = $1 AND student_id = $2 AND completed_at IS NULL \
             ORDER BY started_at DESC LIMIT 1"
        ))
        .bind(quiz_id.as_uuid())
        .bind(student_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AttemptRow::into_attempt).transpose()
    }

    async fn count_for(&self, quiz_id: &QuizId, student_id: &UserId) -> AssessmentResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM quiz_attempts WHERE quiz_id = $1 AND student_id = $2",
        )
        .bind(quiz_id.as_uuid())
        .bind(student_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn update(&self, attempt: &QuizAttempt) -> AssessmentResult<()> {
        sqlx::query(
            "UPDATE quiz_attempts SET completed_at = $2, answers = $3, score_percent = $4, \
             passed = $5 WHERE attempt_id = $1",
        )
        .bind(attempt.attempt_id.as_uuid())
        .bind(attempt.completed_at)
        .bind(answers_json(&attempt.answers)?)
        .bind(attempt.score_percent)
        .bind(attempt.passed)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Assignments
// ============================================================================

impl AssignmentRepository for PgAssessmentRepository {
    async fn create(&self, assignment: &Assignment) -> AssessmentResult<()> {
        sqlx::query(
            "INSERT INTO assignments (assignment_id, course_id, section_id, title, description, \
             due_date, max_score, file_url, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(assignment.assignment_id.as_uuid())
        .bind(assignment.course_id.as_uuid())
        .bind(assignment.section_id.map(|id| id.into_uuid()))
        .bind(&assignment.title)
        .bind(&assignment.description)
        .bind(assignment.due_date)
        .bind(assignment.max_score)
        .bind(&assignment.file_url)
        .bind(assignment.created_at)
        .bind(assignment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        assignment_id: &AssignmentId,
    ) -> AssessmentResult<Option<Assignment>> {
        let row = sqlx::query_as::<_, AssignmentRow>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE assignment_id = $1"
        ))
        .bind(assignment_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AssignmentRow::into_assignment))
    }

    async fn list_by_course(&self, course_id: &CourseId) -> AssessmentResult<Vec<Assignment>> {
        let rows = sqlx::query_as::<_, AssignmentRow>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE course_id = $1 \
             ORDER BY due_date NULLS LAST, created_at"
        ))
        .bind(course_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AssignmentRow::into_assignment).collect())
    }

    async fn update(&self, assignment: &Assignment) -> AssessmentResult<()> {
        sqlx::query(
            "UPDATE assignments SET section_id = $2, title = $3, description = $4, \
             due_date = $5, max_score = $6, file_url = $7, updated_at = $8 \
             WHERE assignment_id = $1",
        )
        .bind(assignment.assignment_id.as_uuid())
        .bind(assignment.section_id.map(|id| id.into_uuid()))
        .bind(&assignment.title)
        .bind(&assignment.description)
        .bind(assignment.due_date)
        .bind(assignment.max_score)
        .bind(&assignment.file_url)
        .bind(assignment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, assignment_id: &AssignmentId) -> AssessmentResult<()> {
        sqlx::query("DELETE FROM assignments WHERE assignment_id = $1")
            .bind(assignment_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Submissions
// ============================================================================

impl SubmissionRepository for PgAssessmentRepository {
    async fn upsert(&self, submission: &AssignmentSubmission) -> AssessmentResult<()> {
        sqlx::query(
            "INSERT INTO assignment_submissions (submission_id, assignment_id, student_id, \
             body, file_url, status, score, feedback, submitted_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (assignment_id, student_id) DO UPDATE SET \
             body = EXCLUDED.body, file_url = EXCLUDED.file_url, status = EXCLUDED.status, \
             score = EXCLUDED.score, feedback = EXCLUDED.feedback, \
             submitted_at = EXCLUDED.submitted_at, updated_at = EXCLUDED.updated_at",
        )
        .bind(submission.submission_id.as_uuid())
        .bind(submission.assignment_id.as_uuid())
        .bind(submission.student_id.as_uuid())
        .bind(&submission.text)
        .bind(&submission.file_url)
        .bind(submission.status.code())
        .bind(submission.score)
        .bind(&submission.feedback)
        .bind(submission.submitted_at)
        .bind(submission.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_student(
        &self,
        assignment_id: &AssignmentId,
        student_id: &UserId,
    ) -> AssessmentResult<Option<AssignmentSubmission>> {
        let row = sqlx::query_as::<_, SubmissionRow>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM assignment_submissions \
             WHERE assignment_id = $1 AND student_id = $2"
        ))
        .bind(assignment_id.as_uuid())
        .bind(student_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(SubmissionRow::into_submission).transpose()
    }

    async fn list_by_assignment(
        &self,
        assignment_id: &AssignmentId,
    ) -> AssessmentResult<Vec<AssignmentSubmission>> {
        let rows = sqlx::query_as::<_, SubmissionRow>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM assignment_submissions \
             WHERE assignment_id = $1 ORDER BY submitted_at"
        ))
        .bind(assignment_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SubmissionRow::into_submission).collect()
    }

    async fn update(&self, submission: &AssignmentSubmission) -> AssessmentResult<()> {
        sqlx::query(
            "UPDATE assignment_submissions SET body = $2, file_url = $3, status = $4, \
             score = $5, feedback = $6, submitted_at = $7, updated_at = $8 \
             WHERE submission_id = $1",
        )
        .bind(submission.submission_id.as_uuid())
        .bind(&submission.text)
        .bind(&submission.file_url)
        .bind(submission.status.code())
        .bind(submission.score)
        .bind(&submission.feedback)
        .bind(submission.submitted_at)
        .bind(submission.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Course access (reads catalog tables)
// ============================================================================

impl CourseAccessRepository for PgAssessmentRepository {
    async fn course_instructor(&self, course_id: &CourseId) -> AssessmentResult<Option<UserId>> {
        let instructor = sqlx::query_scalar::<_, Uuid>(
            "SELECT instructor_id FROM courses WHERE course_id = $1",
        )
        .bind(course_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(instructor.map(UserId::from_uuid))
    }

    async fn section_course(&self, section_id: &SectionId) -> AssessmentResult<Option<CourseId>> {
        let course = sqlx::query_scalar::<_, Uuid>(
            "SELECT course_id FROM sections WHERE section_id = $1",
        )
        .bind(section_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(course.map(CourseId::from_uuid))
    }

    async fn is_enrolled(
        &self,
        student_id: &UserId,
        course_id: &CourseId,
    ) -> AssessmentResult<bool> {
        let enrolled = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE student_id = $1 AND course_id = $2)",
        )
        .bind(student_id.as_uuid())
        .bind(course_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(enrolled)
    }
}

// ============================================================================
// Row types
// ============================================================================

fn questions_json(questions: &[QuizQuestion]) -> AssessmentResult<serde_json::Value> {
    serde_json::to_value(questions)
        .map_err(|e| AssessmentError::Internal(format!("Question serialization failed: {e}")))
}

fn answers_json(answers: &AnswerSheet) -> AssessmentResult<serde_json::Value> {
    serde_json::to_value(answers)
        .map_err(|e| AssessmentError::Internal(format!("Answer serialization failed: {e}")))
}

#[derive(sqlx::FromRow)]
struct QuizRow {
    quiz_id: Uuid,
    course_id: Uuid,
    section_id: Uuid,
    title: String,
    description: Option<String>,
    time_limit_minutes: Option<i32>,
    passing_score: i32,
    max_attempts: Option<i32>,
    questions: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl QuizRow {
    fn into_quiz(self) -> AssessmentResult<Quiz> {
        let questions: Vec<QuizQuestion> = serde_json::from_value(self.questions)
            .map_err(|e| AssessmentError::Internal(format!("Corrupt question list: {e}")))?;

        Ok(Quiz {
            quiz_id: QuizId::from_uuid(self.quiz_id),
            course_id: CourseId::from_uuid(self.course_id),
            section_id: SectionId::from_uuid(self.section_id),
            title: self.title,
            description: self.description,
            time_limit_minutes: self.time_limit_minutes,
            passing_score: self.passing_score,
            max_attempts: self.max_attempts,
            questions,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AttemptRow {
    attempt_id: Uuid,
    quiz_id: Uuid,
    student_id: Uuid,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    answers: serde_json::Value,
    score_percent: Option<f64>,
    passed: Option<bool>,
}

impl AttemptRow {
    fn into_attempt(self) -> AssessmentResult<QuizAttempt> {
        let answers: AnswerSheet = serde_json::from_value(self.answers)
            .map_err(|e| AssessmentError::Internal(format!("Corrupt answer sheet: {e}")))?;

        Ok(QuizAttempt {
            attempt_id: QuizAttemptId::from_uuid(self.attempt_id),
            quiz_id: QuizId::from_uuid(self.quiz_id),
            student_id: UserId::from_uuid(self.student_id),
            started_at: self.started_at,
            completed_at: self.completed_at,
            answers,
            score_percent: self.score_percent,
            passed: self.passed,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AssignmentRow {
    assignment_id: Uuid,
    course_id: Uuid,
    section_id: Option<Uuid>,
    title: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    max_score: i32,
    file_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AssignmentRow {
    fn into_assignment(self) -> Assignment {
        Assignment {
            assignment_id: AssignmentId::from_uuid(self.assignment_id),
            course_id: CourseId::from_uuid(self.course_id),
            section_id: self.section_id.map(SectionId::from_uuid),
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            max_score: self.max_score,
            file_url: self.file_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SubmissionRow {
    submission_id: Uuid,
    assignment_id: Uuid,
    student_id: Uuid,
    body: Option<String>,
    file_url: Option<String>,
    status: String,
    score: Option<i32>,
    feedback: Option<String>,
    submitted_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SubmissionRow {
    fn into_submission(self) -> AssessmentResult<AssignmentSubmission> {
        let status = SubmissionStatus::try_from_code(&self.status).ok_or_else(|| {
            AssessmentError::Internal(format!("Unknown submission status: {}", self.status))
        })?;

        Ok(AssignmentSubmission {
            submission_id: SubmissionId::from_uuid(self.submission_id),
            assignment_id: AssignmentId::from_uuid(self.assignment_id),
            student_id: UserId::from_uuid(self.student_id),
            text: self.body,
            file_url: self.file_url,
            status,
            score: self.score,
            feedback: self.feedback,
            submitted_at: self.submitted_at,
            updated_at: self.updated_at,
        })
    }
}
