//! Quiz attempts and automatic grading

use std::sync::Arc;

use kernel::actor::CurrentUser;
use kernel::id::QuizId;

use crate::domain::entity::quiz::{AnswerSheet, Quiz, QuizAttempt};
use crate::domain::grading::{self, GradeReport};
use crate::domain::repository::{AttemptRepository, CourseAccessRepository, QuizRepository};
use crate::error::{AssessmentError, AssessmentResult};

/// Graded attempt with its per-question breakdown
pub struct AttemptOutcome {
    pub attempt: QuizAttempt,
    pub report: GradeReport,
}

pub struct AttemptUseCase<R> {
    repo: Arc<R>,
}

impl<R> AttemptUseCase<R>
where
    R: QuizRepository + AttemptRepository + CourseAccessRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Start an attempt, or resume the ongoing one.
    ///
    /// The attempt limit counts started attempts, so abandoning a run
    /// still consumes one.
    pub async fn start(
        &self,
        actor: &CurrentUser,
        quiz_id: &QuizId,
    ) -> AssessmentResult<QuizAttempt> {
        let quiz = self.require_enrolled_quiz(actor, quiz_id).await?;

        if let Some(ongoing) = self.repo.find_ongoing(quiz_id, &actor.id).await? {
            return Ok(ongoing);
        }

        if let Some(max) = quiz.max_attempts {
            let taken = self.repo.count_for(quiz_id, &actor.id).await?;
            if taken >= i64::from(max) {
                return Err(AssessmentError::AttemptLimitReached);
            }
        }

        let attempt = QuizAttempt::start(*quiz_id, actor.id);
        AttemptRepository::create(&*self.repo, &attempt).await?;

        tracing::info!(
            attempt_id = %attempt.attempt_id,
            quiz_id = %quiz_id,
            "Quiz attempt started"
        );
        Ok(attempt)
    }

    /// Submit answers for the ongoing attempt and grade them
    pub async fn submit(
        &self,
        actor: &CurrentUser,
        quiz_id: &QuizId,
        answers: AnswerSheet,
    ) -> AssessmentResult<AttemptOutcome> {
        let quiz = self.require_enrolled_quiz(actor, quiz_id).await?;

        let mut attempt = self
            .repo
            .find_ongoing(quiz_id, &actor.id)
            .await?
            .ok_or(AssessmentError::NoOngoingAttempt)?;

        if attempt.expired(quiz.time_limit_minutes, chrono::Utc::now()) {
            return Err(AssessmentError::TimeLimitExceeded);
        }

        let report = grading::grade(&quiz.questions, &answers, quiz.passing_score);
        attempt.complete(answers, report.percentage, report.passed);
        AttemptRepository::update(&*self.repo, &attempt).await?;

        tracing::info!(
            attempt_id = %attempt.attempt_id,
            score = report.percentage,
            passed = report.passed,
            "Quiz attempt graded"
        );

        Ok(AttemptOutcome { attempt, report })
    }

    async fn require_enrolled_quiz(
        &self,
        actor: &CurrentUser,
        quiz_id: &QuizId,
    ) -> AssessmentResult<Quiz> {
        let quiz = QuizRepository::find_by_id(&*self.repo, quiz_id)
            .await?
            .ok_or(AssessmentError::QuizNotFound)?;

        if !self.repo.is_enrolled(&actor.id, &quiz.course_id).await? {
            return Err(AssessmentError::EnrollmentRequired);
        }
        Ok(quiz)
    }
}
