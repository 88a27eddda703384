//! Tests for `AppError` → HTTP response mapping.
//!
//! Each variant must produce the documented status and stable error code
//! in the `{ "error": { "code", "message" } }` envelope. These call
//! `IntoResponse` directly; no HTTP server needed.

use axum::response::IntoResponse;
use http_body_util::BodyExt;
use tastekid_api::error::AppError;
use tastekid_core::error::CoreError;

/// Helper: convert an `AppError` into its status code and parsed body.
async fn error_to_response(err: AppError) -> (axum::http::StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn movie_not_found_maps_to_404() {
    let err = AppError::Core(CoreError::MovieNotFound { id: 42 });
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "MOVIE_NOT_FOUND");
    assert_eq!(json["error"]["message"], "Movie 42 not found");
}

#[tokio::test]
async fn user_not_found_maps_to_404() {
    let err = AppError::Core(CoreError::UserNotFound { id: 7 });
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "USER_NOT_FOUND");
}

#[tokio::test]
async fn embedding_not_found_maps_to_404() {
    let err = AppError::Core(CoreError::EmbeddingNotFound { movie_id: 9 });
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "EMBEDDING_NOT_FOUND");
}

#[tokio::test]
async fn profile_not_found_maps_to_404() {
    let err = AppError::Core(CoreError::ProfileNotFound { user_id: 3 });
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "PROFILE_NOT_FOUND");
}

#[tokio::test]
async fn invalid_argument_maps_to_400() {
    let err = AppError::Core(CoreError::InvalidArgument("k out of range".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "INVALID_ARGUMENT");
    assert_eq!(json["error"]["message"], "k out of range");
}

#[tokio::test]
async fn deadline_exceeded_maps_to_408() {
    let (status, json) = error_to_response(AppError::DeadlineExceeded).await;

    assert_eq!(status, axum::http::StatusCode::REQUEST_TIMEOUT);
    assert_eq!(json["error"]["code"], "DEADLINE_EXCEEDED");
}

#[tokio::test]
async fn internal_errors_are_sanitized() {
    let err = AppError::Core(CoreError::Internal("secret connection string".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "INTERNAL");
    assert!(
        !json.to_string().contains("secret"),
        "internal error responses must not leak details"
    );
}

#[tokio::test]
async fn database_errors_are_sanitized() {
    let err = AppError::Database(sqlx::Error::PoolTimedOut);
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "INTERNAL");
    assert_eq!(json["error"]["message"], "An internal error occurred");
}
