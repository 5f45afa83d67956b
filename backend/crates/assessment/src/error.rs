//! Assessment Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{
    app_error::{AppError, FieldError},
    kind::ErrorKind,
};
use thiserror::Error;

/// Assessment-specific result type alias
pub type AssessmentResult<T> = Result<T, AssessmentError>;

/// Assessment-specific error variants
#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error("Quiz not found")]
    QuizNotFound,

    #[error("Assignment not found")]
    AssignmentNotFound,

    #[error("Submission not found")]
    SubmissionNotFound,

    #[error("You do not have permission to perform this action")]
    Forbidden,

    /// Caller must be enrolled to access this content
    #[error("Enrollment required to access this content")]
    EnrollmentRequired,

    #[error("Maximum number of attempts reached")]
    AttemptLimitReached,

    #[error("No attempt in progress for this quiz")]
    NoOngoingAttempt,

    #[error("The time limit for this attempt has expired")]
    TimeLimitExceeded,

    #[error("The due date for this assignment has passed")]
    DueDatePassed,

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AssessmentError {
    pub fn kind(&self) -> ErrorKind {
        use AssessmentError::*;
        match self {
            QuizNotFound | AssignmentNotFound | SubmissionNotFound => ErrorKind::NotFound,
            Forbidden | EnrollmentRequired => ErrorKind::Forbidden,
            AttemptLimitReached | NoOngoingAttempt | TimeLimitExceeded | DueDatePassed => {
                ErrorKind::BadRequest
            }
            Validation(_) => ErrorKind::ValidationError,
            Database(_) | Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            AssessmentError::Validation(errors) => AppError::validation(errors.clone()),
            AssessmentError::Database(_) => AppError::internal("Database error"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            AssessmentError::Database(e) => {
                tracing::error!(error = %e, "Assessment database error");
            }
            AssessmentError::Internal(msg) => {
                tracing::error!(message = %msg, "Assessment internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Assessment error");
            }
        }
    }
}

impl IntoResponse for AssessmentError {
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
        assert_eq!(AssessmentError::QuizNotFound.kind().status_code(), 404);
        assert_eq!(
            AssessmentError::AttemptLimitReached.kind().status_code(),
            400
        );
        assert_eq!(AssessmentError::TimeLimitExceeded.kind().status_code(), 400);
        assert_eq!(
            AssessmentError::EnrollmentRequired.kind().status_code(),
            403
        );
    }

    #[test]
    fn validation_carries_field_errors() {
        let err = AssessmentError::Validation(vec![FieldError::new("title", "required")]);
        let app = err.to_app_error();
        assert_eq!(app.status_code(), 422);
        assert_eq!(app.field_errors()[0].field, "title");
    }
}
