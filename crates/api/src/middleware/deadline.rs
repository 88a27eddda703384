//! Request deadline enforcement.
//!
//! Each request gets a single deadline; when it elapses the in-flight
//! handler future is dropped (cancelling its pending Store/Index queries)
//! and the client receives the standard error envelope with
//! `DEADLINE_EXCEEDED`. Partial results are never returned.

use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::state::AppState;

/// Middleware enforcing the configured per-request deadline.
pub async fn enforce_deadline(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let deadline = Duration::from_secs(state.config.request_timeout_secs);

    match tokio::time::timeout(deadline, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(
                timeout_secs = state.config.request_timeout_secs,
                "Request deadline exceeded",
            );
            AppError::DeadlineExceeded.into_response()
        }
    }
}
