use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;
use validator::ValidationErrors;

pub const EVENT_NOT_FOUND: &str = "Event not found";
pub const INVALID_DATE_FORMAT: &str = "Invalid date format";

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event not found: {0}")]
    NotFound(ObjectId),

    #[error("Invalid date filter: {0}")]
    InvalidDateFilter(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

pub type EventResult<T> = Result<T, EventError>;

/// Convert EventError to AppError for standardized error responses
impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::NotFound(_) => AppError::NotFound(EVENT_NOT_FOUND.to_string()),
            EventError::InvalidDateFilter(_) => {
                AppError::BadRequest(INVALID_DATE_FORMAT.to_string())
            }
            EventError::Validation(errors) => AppError::ValidationError(errors),
            EventError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
