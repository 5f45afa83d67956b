//! Assessment Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
};
use std::sync::Arc;

use auth::application::config::AuthConfig;
use auth::domain::repository::UserRepository;
use auth::presentation::middleware::{self, AuthGateState};

use crate::infra::postgres::PgAssessmentRepository;
use crate::presentation::handlers::{self, AssessmentAppState, AssessmentRepository};

/// Create the assessment router with the PostgreSQL repository.
///
/// Routes are relative; the binary nests this under `/api`.
pub fn assessment_router<UR>(
    repo: PgAssessmentRepository,
    users: Arc<UR>,
    config: Arc<AuthConfig>,
) -> Router
where
    UR: UserRepository + Clone + Send + Sync + 'static,
{
    assessment_router_generic(Arc::new(repo), users, config)
}

/// Create a generic assessment router for any repository implementation
pub fn assessment_router_generic<R, UR>(
    repo: Arc<R>,
    users: Arc<UR>,
    config: Arc<AuthConfig>,
) -> Router
where
    R: AssessmentRepository,
    UR: UserRepository + Clone + Send + Sync + 'static,
{
    let state = AssessmentAppState { repo };
    let gate = AuthGateState::new(users, config);

    // Everything here needs a session; access rules live in the use cases
    Router::new()
        .route("/quizzes", post(handlers::create_quiz::<R>))
        .route(
            "/quizzes/{id}",
            get(handlers::get_quiz::<R>)
                .patch(handlers::update_quiz::<R>)
                .delete(handlers::delete_quiz::<R>),
        )
        .route(
            "/sections/{id}/quizzes",
            get(handlers::list_section_quizzes::<R>),
        )
        .route("/quizzes/{id}/attempt", post(handlers::start_attempt::<R>))
        .route("/quizzes/{id}/submit", post(handlers::submit_attempt::<R>))
        .route("/assignments", post(handlers::create_assignment::<R>))
        .route(
            "/assignments/{id}",
            get(handlers::get_assignment::<R>)
                .patch(handlers::update_assignment::<R>)
                .delete(handlers::delete_assignment::<R>),
        )
        .route(
            "/courses/{id}/assignments",
            get(handlers::list_course_assignments::<R>),
        )
        .route(
            "/assignments/{id}/submit",
            post(handlers::submit_assignment::<R>),
        )
        .route(
            "/assignments/{id}/submission",
            get(handlers::own_submission::<R>),
        )
        .route(
            "/assignments/{id}/submissions",
            get(handlers::list_submissions::<R>),
        )
        .route(
            "/assignments/{id}/submissions/{sid}/grade",
            patch(handlers::grade_submission::<R>),
        )
        .layer(from_fn_with_state(gate, middleware::require_auth::<UR>))
        .with_state(state)
}
