//! Catalog Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post, put},
};
use std::sync::Arc;

use auth::application::config::AuthConfig;
use auth::domain::repository::UserRepository;
use auth::presentation::middleware::{self, AuthGateState};

use crate::infra::postgres::PgCatalogRepository;
use crate::infra::video::{ConfiguredVideoHost, VideoHost};
use crate::presentation::handlers::{self, CatalogAppState, CatalogRepository};

/// Create the catalog router with the PostgreSQL repository.
///
/// Routes are relative; the binary nests this under `/api`.
pub fn catalog_router<UR>(
    repo: PgCatalogRepository,
    host: ConfiguredVideoHost,
    users: Arc<UR>,
    config: Arc<AuthConfig>,
) -> Router
where
    UR: UserRepository + Clone + Send + Sync + 'static,
{
    catalog_router_generic(Arc::new(repo), Arc::new(host), users, config)
}

/// Create a generic catalog router for any repository and video host
pub fn catalog_router_generic<R, V, UR>(
    repo: Arc<R>,
    host: Arc<V>,
    users: Arc<UR>,
    config: Arc<AuthConfig>,
) -> Router
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
    UR: UserRepository + Clone + Send + Sync + 'static,
{
    let state = CatalogAppState { repo, host };
    let gate = AuthGateState::new(users, config);

    // Reads work without a session but show more to owners and staff
    let public = Router::new()
        .route("/departments", get(handlers::list_departments::<R, V>))
        .route("/categories", get(handlers::list_categories::<R, V>))
        .route("/courses", get(handlers::list_courses::<R, V>))
        .route("/courses/{id}", get(handlers::get_course::<R, V>))
        .route(
            "/courses/{id}/sections",
            get(handlers::list_sections::<R, V>),
        )
        .route("/sections/{id}", get(handlers::get_section::<R, V>))
        .layer(from_fn_with_state(
            gate.clone(),
            middleware::optional_auth::<UR>,
        ));

    let guarded = Router::new()
        .route("/departments", post(handlers::create_department::<R, V>))
        .route("/courses", post(handlers::create_course::<R, V>))
        .route(
            "/courses/{id}",
            patch(handlers::update_course::<R, V>).delete(handlers::delete_course::<R, V>),
        )
        .route(
            "/courses/{id}/publish",
            post(handlers::publish_course::<R, V>),
        )
        .route(
            "/courses/{id}/unpublish",
            post(handlers::unpublish_course::<R, V>),
        )
        .route(
            "/courses/{id}/sections",
            post(handlers::create_section::<R, V>),
        )
        .route(
            "/courses/{id}/sections/reorder",
            put(handlers::reorder_sections::<R, V>),
        )
        .route(
            "/sections/{id}",
            patch(handlers::update_section::<R, V>).delete(handlers::delete_section::<R, V>),
        )
        .route(
            "/sections/{id}/publish",
            post(handlers::publish_section::<R, V>),
        )
        .route(
            "/sections/{id}/unpublish",
            post(handlers::unpublish_section::<R, V>),
        )
        .route(
            "/sections/{id}/resources",
            post(handlers::add_resource::<R, V>),
        )
        .route("/resources/{id}", delete(handlers::delete_resource::<R, V>))
        .route("/courses/{id}/enroll", post(handlers::enroll::<R, V>))
        .route("/enrollments", get(handlers::list_enrollments::<R, V>))
        .route("/progress/{id}", post(handlers::toggle_progress::<R, V>))
        .layer(from_fn_with_state(gate, middleware::require_auth::<UR>));

    public.merge(guarded).with_state(state)
}
