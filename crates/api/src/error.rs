use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tastekid_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds transport-specific
/// variants. Implements [`IntoResponse`] to produce the standard
/// `{ "error": { "code", "message" } }` envelope with stable codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `tastekid_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The request deadline elapsed before the handler finished.
    #[error("Request deadline exceeded")]
    DeadlineExceeded,
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Whether a single retry is worthwhile (read paths only).
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Database(err) if tastekid_db::is_transient(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::MovieNotFound { .. }
                | CoreError::MovieTitleNotFound { .. }
                | CoreError::QueueExhausted { .. } => {
                    (StatusCode::NOT_FOUND, "MOVIE_NOT_FOUND", core.to_string())
                }
                CoreError::UserNotFound { .. } => {
                    (StatusCode::NOT_FOUND, "USER_NOT_FOUND", core.to_string())
                }
                CoreError::EmbeddingNotFound { .. } => (
                    StatusCode::NOT_FOUND,
                    "EMBEDDING_NOT_FOUND",
                    core.to_string(),
                ),
                CoreError::ProfileNotFound { .. } => (
                    StatusCode::NOT_FOUND,
                    "PROFILE_NOT_FOUND",
                    core.to_string(),
                ),
                CoreError::InvalidArgument(msg) => {
                    (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }

            AppError::DeadlineExceeded => (
                StatusCode::REQUEST_TIMEOUT,
                "DEADLINE_EXCEEDED",
                "Request deadline exceeded".to_string(),
            ),
        };

        (status, axum::Json(error_body(code, &message))).into_response()
    }
}

/// The failure envelope: `{ "error": { "code", "message" } }`.
pub fn error_body(code: &str, message: &str) -> serde_json::Value {
    json!({
        "error": {
            "code": code,
            "message": message,
        }
    })
}
