//! Quiz management.
//!
//! Repository methods are called fully qualified since one store backs
//! several traits with overlapping method names.

use std::sync::Arc;

use kernel::actor::CurrentUser;
use kernel::id::{QuizId, SectionId};

use crate::domain::entity::quiz::{Quiz, QuizQuestion, QuizUpdate};
use crate::domain::repository::{CourseAccessRepository, QuizRepository};
use crate::error::{AssessmentError, AssessmentResult};

/// A quiz plus whether the caller may see correct answers
pub struct QuizView {
    pub quiz: Quiz,
    pub with_answers: bool,
}

pub struct QuizUseCase<R> {
    repo: Arc<R>,
}

impl<R> QuizUseCase<R>
where
    R: QuizRepository + CourseAccessRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Create a quiz on a section of a course the actor owns.
    /// Optional fields ride in through `extras`.
    pub async fn create(
        &self,
        actor: &CurrentUser,
        section_id: SectionId,
        title: String,
        passing_score: i32,
        questions: Vec<QuizQuestion>,
        extras: QuizUpdate,
    ) -> AssessmentResult<Quiz> {
        let course_id = self
            .repo
            .section_course(&section_id)
            .await?
            .ok_or(AssessmentError::QuizNotFound)?;
        self.require_course_owner(actor, &course_id).await?;

        let mut quiz = Quiz::new(course_id, section_id, title, passing_score, questions);
        quiz.apply(extras);
        QuizRepository::create(&*self.repo, &quiz).await?;

        tracing::info!(quiz_id = %quiz.quiz_id, section_id = %section_id, "Quiz created");
        Ok(quiz)
    }

    /// Fetch a quiz. Students must be enrolled and never see the
    /// correct answers; the course owner and admins see everything.
    pub async fn get(&self, actor: &CurrentUser, quiz_id: &QuizId) -> AssessmentResult<QuizView> {
        let quiz = self.require_quiz(quiz_id).await?;
        let is_owner = self.is_course_owner(actor, &quiz).await?;

        if !is_owner {
            let enrolled = self.repo.is_enrolled(&actor.id, &quiz.course_id).await?;
            if !enrolled {
                return Err(AssessmentError::EnrollmentRequired);
            }
        }

        Ok(QuizView {
            quiz,
            with_answers: is_owner,
        })
    }

    /// Quizzes of a section, answer visibility per the caller
    pub async fn list_by_section(
        &self,
        actor: &CurrentUser,
        section_id: &SectionId,
    ) -> AssessmentResult<Vec<QuizView>> {
        let course_id = self
            .repo
            .section_course(section_id)
            .await?
            .ok_or(AssessmentError::QuizNotFound)?;

        let instructor = self.repo.course_instructor(&course_id).await?;
        let is_owner = instructor.is_some_and(|id| actor.owns_or_admin(id));

        if !is_owner && !self.repo.is_enrolled(&actor.id, &course_id).await? {
            return Err(AssessmentError::EnrollmentRequired);
        }

        let quizzes = self.repo.list_by_section(section_id).await?;
        Ok(quizzes
            .into_iter()
            .map(|quiz| QuizView {
                quiz,
                with_answers: is_owner,
            })
            .collect())
    }

    pub async fn update(
        &self,
        actor: &CurrentUser,
        quiz_id: &QuizId,
        update: QuizUpdate,
    ) -> AssessmentResult<Quiz> {
        let mut quiz = self.require_quiz(quiz_id).await?;
        self.require_course_owner(actor, &quiz.course_id).await?;

        quiz.apply(update);
        QuizRepository::update(&*self.repo, &quiz).await?;

        Ok(quiz)
    }

    pub async fn delete(&self, actor: &CurrentUser, quiz_id: &QuizId) -> AssessmentResult<()> {
        let quiz = self.require_quiz(quiz_id).await?;
        self.require_course_owner(actor, &quiz.course_id).await?;

        QuizRepository::delete(&*self.repo, quiz_id).await?;

        tracing::info!(quiz_id = %quiz_id, "Quiz deleted");
        Ok(())
    }

    async fn require_quiz(&self, quiz_id: &QuizId) -> AssessmentResult<Quiz> {
        QuizRepository::find_by_id(&*self.repo, quiz_id)
            .await?
            .ok_or(AssessmentError::QuizNotFound)
    }

    async fn is_course_owner(&self, actor: &CurrentUser, quiz: &Quiz) -> AssessmentResult<bool> {
        let instructor = self.repo.course_instructor(&quiz.course_id).await?;
        Ok(instructor.is_some_and(|id| actor.owns_or_admin(id)))
    }

    async fn require_course_owner(
        &self,
        actor: &CurrentUser,
        course_id: &kernel::id::CourseId,
    ) -> AssessmentResult<()> {
        let instructor = self
            .repo
            .course_instructor(course_id)
            .await?
            .ok_or(AssessmentError::QuizNotFound)?;

        if !actor.owns_or_admin(instructor) {
            return Err(AssessmentError::Forbidden);
        }
        Ok(())
    }
}
