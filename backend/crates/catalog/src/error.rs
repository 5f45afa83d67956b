//! Catalog Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{
    app_error::{AppError, FieldError},
    kind::ErrorKind,
};
use thiserror::Error;

/// Catalog-specific result type alias
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog-specific error variants
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Course not found")]
    CourseNotFound,

    #[error("Section not found")]
    SectionNotFound,

    #[error("Department not found")]
    DepartmentNotFound,

    #[error("Resource not found")]
    ResourceNotFound,

    #[error("You do not have permission to perform this action")]
    Forbidden,

    /// Caller must be enrolled to access this content
    #[error("Enrollment required to access this content")]
    EnrollmentRequired,

    #[error("You are already enrolled in this course")]
    AlreadyEnrolled,

    /// Publish preconditions not met; the message names what is missing
    #[error("Course cannot be published: {0}")]
    PublishBlocked(String),

    #[error("Section cannot be published: {0}")]
    SectionPublishBlocked(String),

    #[error("Course is not available for enrollment")]
    CourseNotPublished,

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        use CatalogError::*;
        match self {
            CourseNotFound | SectionNotFound | DepartmentNotFound | ResourceNotFound => {
                ErrorKind::NotFound
            }
            Forbidden | EnrollmentRequired => ErrorKind::Forbidden,
            AlreadyEnrolled => ErrorKind::Conflict,
            PublishBlocked(_) | SectionPublishBlocked(_) | CourseNotPublished => {
                ErrorKind::BadRequest
            }
            Validation(_) => ErrorKind::ValidationError,
            Database(_) | Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            CatalogError::Validation(errors) => AppError::validation(errors.clone()),
            CatalogError::Database(sqlx::Error::Database(db))
                if db.code().as_deref() == Some("23505") =>
            {
                AppError::conflict("A record with this value already exists")
            }
            CatalogError::Database(_) => AppError::internal("Database error"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            CatalogError::Database(e) => {
                tracing::error!(error = %e, "Catalog database error");
            }
            CatalogError::Internal(msg) => {
                tracing::error!(message = %msg, "Catalog internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Catalog error");
            }
        }
    }
}

impl IntoResponse for CatalogError {
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
        assert_eq!(CatalogError::CourseNotFound.kind().status_code(), 404);
        assert_eq!(CatalogError::AlreadyEnrolled.kind().status_code(), 409);
        assert_eq!(
            CatalogError::PublishBlocked("no sections".into())
                .kind()
                .status_code(),
            400
        );
        assert_eq!(CatalogError::EnrollmentRequired.kind().status_code(), 403);
    }

    #[test]
    fn database_errors_default_to_internal() {
        let err = CatalogError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.to_app_error().status_code(), 500);
    }
}
