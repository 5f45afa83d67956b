//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Response;
use std::sync::Arc;

use kernel::actor::CurrentUser;
use kernel::id::{AssignmentId, CourseId, QuizId, SectionId, SubmissionId};
use kernel::response;

use crate::application::assignments::AssignmentUseCase;
use crate::application::attempts::AttemptUseCase;
use crate::application::quizzes::QuizUseCase;
use crate::application::submissions::SubmissionUseCase;
use crate::domain::repository::{
    AssignmentRepository, AttemptRepository, CourseAccessRepository, QuizRepository,
    SubmissionRepository,
};
use crate::error::{AssessmentError, AssessmentResult};
use crate::presentation::dto::{
    AssignmentResponse, AttemptResponse, AttemptResultResponse, CreateAssignmentRequest,
    CreateQuizRequest, GradeSubmissionRequest, QuizResponse, SubmissionResponse,
    SubmitAssignmentRequest, SubmitQuizRequest, UpdateAssignmentRequest, UpdateQuizRequest,
};

/// Everything the assessment handlers need from persistence
pub trait AssessmentRepository:
    QuizRepository
    + AttemptRepository
    + AssignmentRepository
    + SubmissionRepository
    + CourseAccessRepository
    + Send
    + Sync
    + 'static
{
}

impl<T> AssessmentRepository for T where
    T: QuizRepository
        + AttemptRepository
        + AssignmentRepository
        + SubmissionRepository
        + CourseAccessRepository
        + Send
        + Sync
        + 'static
{
}

/// Shared state for assessment handlers
pub struct AssessmentAppState<R>
where
    R: AssessmentRepository,
{
    pub repo: Arc<R>,
}

impl<R: AssessmentRepository> Clone for AssessmentAppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

fn parse_quiz_id(raw: &str) -> AssessmentResult<QuizId> {
    QuizId::parse(raw).map_err(|_| AssessmentError::QuizNotFound)
}

fn parse_assignment_id(raw: &str) -> AssessmentResult<AssignmentId> {
    AssignmentId::parse(raw).map_err(|_| AssessmentError::AssignmentNotFound)
}

// ============================================================================
// Quizzes
// ============================================================================

pub async fn create_quiz<R: AssessmentRepository>(
    State(state): State<AssessmentAppState<R>>,
    actor: CurrentUser,
    Json(payload): Json<CreateQuizRequest>,
) -> AssessmentResult<Response> {
    let input = payload.validate().map_err(AssessmentError::Validation)?;

    let quiz = QuizUseCase::new(state.repo)
        .create(
            &actor,
            input.section_id,
            input.title,
            input.passing_score,
            input.questions,
            input.update,
        )
        .await?;

    Ok(response::created(QuizResponse::render(&quiz, true)))
}

pub async fn get_quiz<R: AssessmentRepository>(
    State(state): State<AssessmentAppState<R>>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> AssessmentResult<Response> {
    let quiz_id = parse_quiz_id(&id)?;
    let view = QuizUseCase::new(state.repo).get(&actor, &quiz_id).await?;
    Ok(response::ok(QuizResponse::from(&view)))
}

pub async fn list_section_quizzes<R: AssessmentRepository>(
    State(state): State<AssessmentAppState<R>>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> AssessmentResult<Response> {
    let section_id = SectionId::parse(&id).map_err(|_| AssessmentError::QuizNotFound)?;
    let views = QuizUseCase::new(state.repo)
        .list_by_section(&actor, &section_id)
        .await?;
    let body: Vec<QuizResponse> = views.iter().map(Into::into).collect();
    Ok(response::ok(body))
}

pub async fn update_quiz<R: AssessmentRepository>(
    State(state): State<AssessmentAppState<R>>,
    actor: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateQuizRequest>,
) -> AssessmentResult<Response> {
    let quiz_id = parse_quiz_id(&id)?;
    let update = payload.validate().map_err(AssessmentError::Validation)?;
    let quiz = QuizUseCase::new(state.repo)
        .update(&actor, &quiz_id, update)
        .await?;
    Ok(response::ok(QuizResponse::render(&quiz, true)))
}

pub async fn delete_quiz<R: AssessmentRepository>(
    State(state): State<AssessmentAppState<R>>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> AssessmentResult<Response> {
    let quiz_id = parse_quiz_id(&id)?;
    QuizUseCase::new(state.repo).delete(&actor, &quiz_id).await?;
    Ok(response::ok(serde_json::json!({ "deleted": true })))
}

// ============================================================================
// Attempts
// ============================================================================

pub async fn start_attempt<R: AssessmentRepository>(
    State(state): State<AssessmentAppState<R>>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> AssessmentResult<Response> {
    let quiz_id = parse_quiz_id(&id)?;
    let attempt = AttemptUseCase::new(state.repo).start(&actor, &quiz_id).await?;
    Ok(response::created(AttemptResponse::from(&attempt)))
}

pub async fn submit_attempt<R: AssessmentRepository>(
    State(state): State<AssessmentAppState<R>>,
    actor: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<SubmitQuizRequest>,
) -> AssessmentResult<Response> {
    let quiz_id = parse_quiz_id(&id)?;
    let outcome = AttemptUseCase::new(state.repo)
        .submit(&actor, &quiz_id, payload.answers)
        .await?;
    Ok(response::ok(AttemptResultResponse::from(&outcome)))
}

// ============================================================================
// Assignments
// ============================================================================

pub async fn create_assignment<R: AssessmentRepository>(
    State(state): State<AssessmentAppState<R>>,
    actor: CurrentUser,
    Json(payload): Json<CreateAssignmentRequest>,
) -> AssessmentResult<Response> {
    let input = payload.validate().map_err(AssessmentError::Validation)?;
    let assignment = AssignmentUseCase::new(state.repo)
        .create(
            &actor,
            input.course_id,
            input.title,
            input.max_score,
            input.update,
        )
        .await?;
    Ok(response::created(AssignmentResponse::from(&assignment)))
}

pub async fn get_assignment<R: AssessmentRepository>(
    State(state): State<AssessmentAppState<R>>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> AssessmentResult<Response> {
    let assignment_id = parse_assignment_id(&id)?;
    let assignment = AssignmentUseCase::new(state.repo)
        .get(&actor, &assignment_id)
        .await?;
    Ok(response::ok(AssignmentResponse::from(&assignment)))
}

pub async fn list_course_assignments<R: AssessmentRepository>(
    State(state): State<AssessmentAppState<R>>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> AssessmentResult<Response> {
    let course_id = CourseId::parse(&id).map_err(|_| AssessmentError::AssignmentNotFound)?;
    let assignments = AssignmentUseCase::new(state.repo)
        .list_by_course(&actor, &course_id)
        .await?;
    let body: Vec<AssignmentResponse> = assignments.iter().map(Into::into).collect();
    Ok(response::ok(body))
}

pub async fn update_assignment<R: AssessmentRepository>(
    State(state): State<AssessmentAppState<R>>,
    actor: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateAssignmentRequest>,
) -> AssessmentResult<Response> {
    let assignment_id = parse_assignment_id(&id)?;
    let update = payload.validate().map_err(AssessmentError::Validation)?;
    let assignment = AssignmentUseCase::new(state.repo)
        .update(&actor, &assignment_id, update)
        .await?;
    Ok(response::ok(AssignmentResponse::from(&assignment)))
}

pub async fn delete_assignment<R: AssessmentRepository>(
    State(state): State<AssessmentAppState<R>>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> AssessmentResult<Response> {
    let assignment_id = parse_assignment_id(&id)?;
    AssignmentUseCase::new(state.repo)
        .delete(&actor, &assignment_id)
        .await?;
    Ok(response::ok(serde_json::json!({ "deleted": true })))
}

// ============================================================================
// Submissions
// ============================================================================

pub async fn submit_assignment<R: AssessmentRepository>(
    State(state): State<AssessmentAppState<R>>,
    actor: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<SubmitAssignmentRequest>,
) -> AssessmentResult<Response> {
    let assignment_id = parse_assignment_id(&id)?;
    let (text, file_url) = payload.validate().map_err(AssessmentError::Validation)?;
    let submission = SubmissionUseCase::new(state.repo)
        .submit(&actor, &assignment_id, text, file_url)
        .await?;
    Ok(response::created(SubmissionResponse::from(&submission)))
}

pub async fn own_submission<R: AssessmentRepository>(
    State(state): State<AssessmentAppState<R>>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> AssessmentResult<Response> {
    let assignment_id = parse_assignment_id(&id)?;
    let submission = SubmissionUseCase::new(state.repo)
        .own(&actor, &assignment_id)
        .await?;
    Ok(response::ok(submission.as_ref().map(SubmissionResponse::from)))
}

pub async fn list_submissions<R: AssessmentRepository>(
    State(state): State<AssessmentAppState<R>>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> AssessmentResult<Response> {
    let assignment_id = parse_assignment_id(&id)?;
    let submissions = SubmissionUseCase::new(state.repo)
        .list(&actor, &assignment_id)
        .await?;
    let body: Vec<SubmissionResponse> = submissions.iter().map(Into::into).collect();
    Ok(response::ok(body))
}

pub async fn grade_submission<R: AssessmentRepository>(
    State(state): State<AssessmentAppState<R>>,
    actor: CurrentUser,
    Path((id, sid)): Path<(String, String)>,
    Json(payload): Json<GradeSubmissionRequest>,
) -> AssessmentResult<Response> {
    let assignment_id = parse_assignment_id(&id)?;
    let submission_id =
        SubmissionId::parse(&sid).map_err(|_| AssessmentError::SubmissionNotFound)?;

    let submission = SubmissionUseCase::new(state.repo)
        .grade(
            &actor,
            &assignment_id,
            &submission_id,
            payload.score,
            payload.feedback,
        )
        .await?;
    Ok(response::ok(SubmissionResponse::from(&submission)))
}
