//! Community Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{
    app_error::{AppError, FieldError},
    kind::ErrorKind,
};
use thiserror::Error;

/// Community-specific result type alias
pub type CommunityResult<T> = Result<T, CommunityError>;

/// Community-specific error variants
#[derive(Debug, Error)]
pub enum CommunityError {
    #[error("Discussion not found")]
    DiscussionNotFound,

    #[error("Comment not found")]
    CommentNotFound,

    #[error("You do not have permission to perform this action")]
    Forbidden,

    /// Course-scoped threads are open to enrolled students and staff
    #[error("Enrollment required to post in this course")]
    EnrollmentRequired,

    #[error("Replies cannot be nested further")]
    ReplyDepthExceeded,

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CommunityError {
    pub fn kind(&self) -> ErrorKind {
        use CommunityError::*;
        match self {
            DiscussionNotFound | CommentNotFound => ErrorKind::NotFound,
            Forbidden | EnrollmentRequired => ErrorKind::Forbidden,
            ReplyDepthExceeded => ErrorKind::BadRequest,
            Validation(_) => ErrorKind::ValidationError,
            Database(_) | Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            CommunityError::Validation(errors) => AppError::validation(errors.clone()),
            CommunityError::Database(_) => AppError::internal("Database error"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            CommunityError::Database(e) => {
                tracing::error!(error = %e, "Community database error");
            }
            CommunityError::Internal(msg) => {
                tracing::error!(message = %msg, "Community internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Community error");
            }
        }
    }
}

impl IntoResponse for CommunityError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_expected_status() {
        assert_eq!(CommunityError::DiscussionNotFound.kind().status_code(), 404);
        assert_eq!(CommunityError::ReplyDepthExceeded.kind().status_code(), 400);
        assert_eq!(CommunityError::EnrollmentRequired.kind().status_code(), 403);
        assert_eq!(
            CommunityError::Validation(vec![]).kind().status_code(),
            422
        );
    }
}
