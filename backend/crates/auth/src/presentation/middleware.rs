//! Auth Middleware
//!
//! Resolves the bearer/cookie access token into a `CurrentUser` and
//! stores it in request extensions for downstream handlers. Routers in
//! other crates layer these around their guarded routes.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use kernel::actor::{CurrentUser, MaybeUser};

use crate::application::config::AuthConfig;
use crate::application::current_user::{CurrentUserUseCase, to_current_user};
use crate::domain::repository::UserRepository;
use crate::error::AuthError;
use crate::presentation::handlers::extract_access_token;

/// Middleware state
#[derive(Clone)]
pub struct AuthGateState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthGateState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    async fn resolve(&self, headers: &HeaderMap) -> Result<CurrentUser, AuthError> {
        let token = extract_access_token(headers, &self.config)
            .ok_or(AuthError::TokenMissing)?;

        let use_case = CurrentUserUseCase::new(self.repo.clone(), self.config.clone());
        let user = use_case.execute(&token).await?;

        Ok(to_current_user(&user))
    }
}

/// Middleware that rejects unauthenticated requests with 401
pub async fn require_auth<R>(
    State(state): State<AuthGateState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user = state
        .resolve(req.headers())
        .await
        .map_err(|e| e.into_response())?;

    req.extensions_mut().insert(MaybeUser(Some(user.clone())));
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Middleware that resolves the caller when possible but lets
/// anonymous requests through
pub async fn optional_auth<R>(
    State(state): State<AuthGateState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let maybe = MaybeUser(state.resolve(req.headers()).await.ok());

    if let Some(user) = maybe.0.clone() {
        req.extensions_mut().insert(user);
    }
    req.extensions_mut().insert(maybe);

    next.run(req).await
}

/// Middleware allowing only educators and admins. Layer after
/// [`require_auth`].
pub async fn require_staff(req: Request<Body>, next: Next) -> Result<Response, Response> {
    match req.extensions().get::<CurrentUser>() {
        Some(user) if user.role.is_educator_or_admin() => Ok(next.run(req).await),
        Some(_) => Err(AuthError::Forbidden.into_response()),
        None => Err(AuthError::TokenMissing.into_response()),
    }
}

/// Middleware allowing only admins. Layer after [`require_auth`].
pub async fn require_admin(req: Request<Body>, next: Next) -> Result<Response, Response> {
    match req.extensions().get::<CurrentUser>() {
        Some(user) if user.role.is_admin() => Ok(next.run(req).await),
        Some(_) => Err(AuthError::Forbidden.into_response()),
        None => Err(AuthError::TokenMissing.into_response()),
    }
}
