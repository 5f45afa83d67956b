//! HTTP Handlers

use axum::Json;
use axum::extract::{ConnectInfo, Path, State};
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{AppendHeaders, IntoResponse, Response};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

use kernel::actor::CurrentUser;
use kernel::id::UserId;
use kernel::response;
use platform::client::rate_limit_key;
use platform::cookie::{delete_cookie_header, extract_cookie, set_cookie_header};
use platform::rate_limit::{MemoryRateLimiter, RateLimitConfig};

use crate::application::config::{AuthConfig, IssuedTokens};
use crate::application::current_user::CurrentUserUseCase;
use crate::application::onboarding::OnboardingUseCase;
use crate::application::profile::ProfileUseCase;
use crate::application::refresh_token::RefreshUseCase;
use crate::application::sign_in::{SignInInput, SignInUseCase};
use crate::application::sign_up::SignUpUseCase;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    ChangePasswordRequest, EducatorOnboardingRequest, SetRoleRequest, SignInRequest,
    SignUpRequest, StudentOnboardingRequest, UpdateProfileRequest, UserResponse,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub limiter: Arc<MemoryRateLimiter>,
}

/// Both auth cookies for a fresh token pair
fn auth_cookie_headers(
    config: &AuthConfig,
    tokens: &IssuedTokens,
) -> AppendHeaders<[(header::HeaderName, HeaderValue); 2]> {
    AppendHeaders([
        (
            header::SET_COOKIE,
            set_cookie_header(&config.access_cookie, &tokens.access_token),
        ),
        (
            header::SET_COOKIE,
            set_cookie_header(&config.refresh_cookie, &tokens.refresh_token),
        ),
    ])
}

/// Credential endpoints share a strict per-client window
fn enforce_auth_rate_limit<R>(
    state: &AuthAppState<R>,
    headers: &HeaderMap,
    addr: SocketAddr,
) -> AuthResult<()>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let key = format!("auth:{}", rate_limit_key(headers, Some(addr.ip())));
    let result = state.limiter.check(&key, &RateLimitConfig::strict());

    if !result.allowed {
        return Err(AuthError::RateLimited);
    }
    Ok(())
}

/// Access token from the Authorization header or the auth cookie
pub fn extract_access_token(headers: &HeaderMap, config: &AuthConfig) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.to_string());

    bearer.or_else(|| extract_cookie(headers, &config.access_cookie.name))
}

// ============================================================================
// Sign Up / Sign In / Refresh / Sign Out
// ============================================================================

/// POST /auth/signup
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    enforce_auth_rate_limit(&state, &headers, addr)?;

    let input = req.validate().map_err(AuthError::Validation)?;

    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case.execute(input).await?;

    let cookies = auth_cookie_headers(&state.config, &output.tokens);
    let body = response::created(UserResponse::from(&output.user));

    Ok((cookies, body).into_response())
}

/// POST /auth/signin
pub async fn sign_in<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<SignInRequest>,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    enforce_auth_rate_limit(&state, &headers, addr)?;

    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let cookies = auth_cookie_headers(&state.config, &output.tokens);
    let body = response::ok(UserResponse::from(&output.user));

    Ok((cookies, body).into_response())
}

/// POST /auth/refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let token = extract_cookie(&headers, &state.config.refresh_cookie.name)
        .ok_or(AuthError::TokenMissing)?;

    let use_case = RefreshUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case.execute(&token).await?;

    let cookies = auth_cookie_headers(&state.config, &output.tokens);
    let body = response::ok(UserResponse::from(&output.user));

    Ok((cookies, body).into_response())
}

/// POST /auth/signout
///
/// Stateless tokens cannot be revoked server side, so signing out just
/// clears both cookies.
pub async fn sign_out<R>(State(state): State<AuthAppState<R>>) -> Response
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let cookies = AppendHeaders([
        (
            header::SET_COOKIE,
            delete_cookie_header(&state.config.access_cookie),
        ),
        (
            header::SET_COOKIE,
            delete_cookie_header(&state.config.refresh_cookie),
        ),
    ]);

    (cookies, response::ok(json!({ "message": "Signed out" }))).into_response()
}

/// GET /auth/me
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let token =
        extract_access_token(&headers, &state.config).ok_or(AuthError::TokenMissing)?;

    let use_case = CurrentUserUseCase::new(state.repo.clone(), state.config.clone());
    let user = use_case.execute(&token).await?;

    Ok(response::ok(UserResponse::from(&user)))
}

// ============================================================================
// Onboarding
// ============================================================================

/// POST /onboarding/student
pub async fn onboard_student<R>(
    State(state): State<AuthAppState<R>>,
    actor: CurrentUser,
    Json(req): Json<StudentOnboardingRequest>,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let data = req.validate().map_err(AuthError::Validation)?;

    let use_case = OnboardingUseCase::new(state.repo.clone());
    let user = use_case.onboard_student(&actor, data).await?;

    Ok(response::ok(UserResponse::from(&user)))
}

/// POST /onboarding/educator
pub async fn onboard_educator<R>(
    State(state): State<AuthAppState<R>>,
    actor: CurrentUser,
    Json(req): Json<EducatorOnboardingRequest>,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let data = req.validate().map_err(AuthError::Validation)?;

    let use_case = OnboardingUseCase::new(state.repo.clone());
    let user = use_case.onboard_educator(&actor, data).await?;

    Ok(response::ok(UserResponse::from(&user)))
}

// ============================================================================
// Profile
// ============================================================================

/// PATCH /users/profile
pub async fn update_profile<R>(
    State(state): State<AuthAppState<R>>,
    actor: CurrentUser,
    Json(req): Json<UpdateProfileRequest>,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let update = req.validate().map_err(AuthError::Validation)?;

    let use_case = ProfileUseCase::new(state.repo.clone(), state.config.clone());
    let user = use_case.update_profile(&actor, update).await?;

    Ok(response::ok(UserResponse::from(&user)))
}

/// PATCH /users/password
pub async fn change_password<R>(
    State(state): State<AuthAppState<R>>,
    actor: CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let (current, new) = req.validate().map_err(AuthError::Validation)?;

    let use_case = ProfileUseCase::new(state.repo.clone(), state.config.clone());
    use_case.change_password(&actor, current, new).await?;

    Ok(response::ok(json!({ "message": "Password updated" })))
}

/// PATCH /users/{id}/role
pub async fn set_role<R>(
    State(state): State<AuthAppState<R>>,
    actor: CurrentUser,
    Path(user_id): Path<String>,
    Json(req): Json<SetRoleRequest>,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let role = req.validate().map_err(AuthError::Validation)?;
    let target = UserId::parse(&user_id).map_err(|_| AuthError::UserNotFound)?;

    let use_case = ProfileUseCase::new(state.repo.clone(), state.config.clone());
    let user = use_case.set_role(&actor, target, role).await?;

    Ok(response::ok(UserResponse::from(&user)))
}
