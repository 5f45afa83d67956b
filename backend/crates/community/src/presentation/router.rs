//! Community Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;

use auth::application::config::AuthConfig;
use auth::domain::repository::UserRepository;
use auth::presentation::middleware::{self, AuthGateState};

use crate::infra::postgres::PgCommunityRepository;
use crate::presentation::handlers::{self, CommunityAppState, CommunityRepository};

/// Create the community router with the PostgreSQL repository.
///
/// Routes are relative; the binary nests this under `/api`.
pub fn community_router<UR>(
    repo: PgCommunityRepository,
    users: Arc<UR>,
    config: Arc<AuthConfig>,
) -> Router
where
    UR: UserRepository + Clone + Send + Sync + 'static,
{
    community_router_generic(Arc::new(repo), users, config)
}

/// Create a generic community router for any repository implementation
pub fn community_router_generic<R, UR>(
    repo: Arc<R>,
    users: Arc<UR>,
    config: Arc<AuthConfig>,
) -> Router
where
    R: CommunityRepository,
    UR: UserRepository + Clone + Send + Sync + 'static,
{
    let state = CommunityAppState { repo };
    let gate = AuthGateState::new(users, config);

    Router::new()
        .route(
            "/discussions",
            get(handlers::list_discussions::<R>).post(handlers::create_discussion::<R>),
        )
        .route(
            "/discussions/{id}",
            get(handlers::get_discussion::<R>)
                .patch(handlers::update_discussion::<R>)
                .delete(handlers::delete_discussion::<R>),
        )
        .route(
            "/discussions/{id}/comments",
            post(handlers::create_comment::<R>),
        )
        .route(
            "/comments/{id}",
            axum::routing::patch(handlers::update_comment::<R>)
                .delete(handlers::delete_comment::<R>),
        )
        .route("/comments/{id}/vote", post(handlers::vote_comment::<R>))
        .layer(from_fn_with_state(gate, middleware::require_auth::<UR>))
        .with_state(state)
}
