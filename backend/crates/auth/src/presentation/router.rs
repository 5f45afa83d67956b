//! Auth Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
};
use std::sync::Arc;

use platform::rate_limit::MemoryRateLimiter;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{self, AuthGateState};

/// Create the auth router with the PostgreSQL repository.
///
/// Routes are relative; the binary nests this under `/api`.
pub fn auth_router(
    repo: PgUserRepository,
    config: Arc<AuthConfig>,
    limiter: Arc<MemoryRateLimiter>,
) -> Router {
    auth_router_generic(Arc::new(repo), config, limiter)
}

/// Create a generic auth router for any repository implementation
pub fn auth_router_generic<R>(
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    limiter: Arc<MemoryRateLimiter>,
) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: repo.clone(),
        config: config.clone(),
        limiter,
    };
    let gate = AuthGateState::new(repo, config);

    let public = Router::new()
        .route("/auth/signup", post(handlers::sign_up::<R>))
        .route("/auth/signin", post(handlers::sign_in::<R>))
        .route("/auth/refresh", post(handlers::refresh::<R>))
        .route("/auth/signout", post(handlers::sign_out::<R>))
        .route("/auth/me", get(handlers::me::<R>));

    let guarded = Router::new()
        .route("/onboarding/student", post(handlers::onboard_student::<R>))
        .route(
            "/onboarding/educator",
            post(handlers::onboard_educator::<R>),
        )
        .route("/users/profile", patch(handlers::update_profile::<R>))
        .route("/users/password", patch(handlers::change_password::<R>))
        .route("/users/{id}/role", patch(handlers::set_role::<R>))
        .layer(from_fn_with_state(gate, middleware::require_auth::<R>));

    public.merge(guarded).with_state(state)
}
