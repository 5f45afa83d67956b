//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{
    app_error::{AppError, FieldError},
    kind::ErrorKind,
};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// Email already registered
    #[error("An account with this email already exists")]
    EmailTaken,

    /// Invalid credentials (unknown email or wrong password)
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Missing or malformed access token
    #[error("Authentication required")]
    TokenMissing,

    /// Token failed verification
    #[error("Invalid or expired token")]
    TokenInvalid,

    /// Caller lacks the role required for the operation
    #[error("You do not have permission to perform this action")]
    Forbidden,

    /// Request body failed validation
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Onboarding already completed for this account
    #[error("Onboarding has already been completed")]
    AlreadyOnboarded,

    /// Too many attempts from this client
    #[error("Too many attempts, please try again later")]
    RateLimited,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials | AuthError::TokenMissing | AuthError::TokenInvalid => {
                ErrorKind::Unauthorized
            }
            AuthError::Forbidden | AuthError::AlreadyOnboarded => ErrorKind::Forbidden,
            AuthError::Validation(_) => ErrorKind::ValidationError,
            AuthError::RateLimited => ErrorKind::RateLimitExceeded,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Validation(errors) => AppError::validation(errors.clone()),
            AuthError::Database(e) => AppError::from(sqlx_kind(e)),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::RateLimited => {
                tracing::warn!("Rate limited auth attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

// Unique violations on users.email surface as Conflict rather than a 500.
fn sqlx_kind(e: &sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            AppError::conflict("An account with this email already exists")
        }
        sqlx::Error::RowNotFound => AppError::not_found("User not found"),
        _ => AppError::internal("Database error"),
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<platform::token::TokenError> for AuthError {
    fn from(_: platform::token::TokenError) -> Self {
        AuthError::TokenInvalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_expected_status() {
        assert_eq!(AuthError::EmailTaken.kind().status_code(), 409);
        assert_eq!(AuthError::InvalidCredentials.kind().status_code(), 401);
        assert_eq!(AuthError::Forbidden.kind().status_code(), 403);
        assert_eq!(AuthError::RateLimited.kind().status_code(), 429);
        assert_eq!(
            AuthError::Validation(vec![]).kind().status_code(),
            422
        );
    }

    #[test]
    fn validation_carries_field_errors() {
        let err = AuthError::Validation(vec![FieldError::new("email", "Invalid email address")]);
        let app = err.to_app_error();
        assert_eq!(app.field_errors().len(), 1);
        assert_eq!(app.field_errors()[0].field, "email");
    }
}
