/// Error types for Scheduler Service
///
/// Store failures are recovered by the engine on every read path; only the
/// manual weight override (and malformed HTTP input) ever reaches a client as
/// an error response.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for scheduler-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Failure reaching or querying the external store.
///
/// The engine never branches on the subtype; it only distinguishes
/// "succeeded with data", "succeeded empty" and "failed".
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store query failed: {0}")]
    Query(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err.to_string()),
            other => StoreError::Query(other.to_string()),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Admin credential missing or mismatched
    #[error("Unauthorized: invalid admin token")]
    Unauthorized,

    /// Manual override out of range or off the sum tolerance
    #[error("Validation error: {0}")]
    Validation(String),

    /// Body or query string that does not deserialize
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}
