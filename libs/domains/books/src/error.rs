use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum BookError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    /// The referenced owner does not exist.
    #[error("User not found: {0}")]
    OwnerNotFound(Uuid),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type BookResult<T> = Result<T, BookError>;

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::Validation(errors) => AppError::ValidationError(errors),
            BookError::OwnerNotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            BookError::Database(msg) => {
                AppError::InternalServerError(format!("Database error: {}", msg))
            }
            BookError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for BookError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<sea_orm::DbErr> for BookError {
    fn from(err: sea_orm::DbErr) -> Self {
        BookError::Database(err.to_string())
    }
}
