// Shared helpers for API integration tests. Not every test binary uses
// every helper, so dead_code warnings are suppressed at the module level.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use tastekid_api::config::{EngineConfig, ServerConfig};
use tastekid_api::router::build_app_router;
use tastekid_api::state::AppState;
use tastekid_core::types::{DbId, EMBEDDING_DIMENSION};
use tastekid_core::vector::to_vector_literal;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router with all middleware layers, so
/// integration tests exercise the same stack production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        engine: Arc::new(EngineConfig::default()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Shared HTTP test helpers
// ---------------------------------------------------------------------------

/// Collect the response body into a `serde_json::Value`.
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// GET the given URI and return the response.
pub async fn get(app: Router, uri: &str) -> axum::response::Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a JSON request with the given HTTP method.
pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> axum::response::Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST JSON to the given URI and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
) -> axum::response::Response {
    send_json(app, Method::POST, uri, body).await
}

/// PUT JSON to the given URI and return the response.
pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> axum::response::Response {
    send_json(app, Method::PUT, uri, body).await
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// A unit vector along one embedding axis.
pub fn axis_embedding(axis: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; EMBEDDING_DIMENSION];
    v[axis % EMBEDDING_DIMENSION] = 1.0;
    v
}

/// A unit vector between two axes, closer to `a` for small `tilt`.
pub fn tilted_embedding(a: usize, b: usize, tilt: f32) -> Vec<f32> {
    let mut v = vec![0.0f32; EMBEDDING_DIMENSION];
    let norm = (1.0 + tilt * tilt).sqrt();
    v[a % EMBEDDING_DIMENSION] = 1.0 / norm;
    v[b % EMBEDDING_DIMENSION] = tilt / norm;
    v
}

pub async fn insert_movie(
    pool: &PgPool,
    id: DbId,
    title: &str,
    genres: &str,
    vote_count: i64,
) {
    sqlx::query(
        "INSERT INTO movies \
             (id, title, release_date, runtime, original_language, genres, keywords, \
              vote_average, vote_count, poster_path) \
         VALUES ($1, $2, '2012-03-01', 110, 'en', $3, 'heist, neo-noir', 7.2, $4, '/p.jpg')",
    )
    .bind(id)
    .bind(title)
    .bind(genres)
    .bind(vote_count)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn insert_embedding(pool: &PgPool, movie_id: DbId, embedding: &[f32]) {
    sqlx::query(
        "INSERT INTO movie_embeddings (movie_id, embedding, embedding_model, doc_hash) \
         VALUES ($1, $2::vector, 'test-model', 'test-hash')",
    )
    .bind(movie_id)
    .bind(to_vector_literal(embedding))
    .execute(pool)
    .await
    .unwrap();
}

/// Seed a movie together with its embedding.
pub async fn insert_indexed_movie(
    pool: &PgPool,
    id: DbId,
    title: &str,
    genres: &str,
    vote_count: i64,
    embedding: &[f32],
) {
    insert_movie(pool, id, title, genres, vote_count).await;
    insert_embedding(pool, id, embedding).await;
}

/// Create a user through the API and return its id.
pub async fn create_user(app: Router) -> DbId {
    let response = post_json(app, "/v1/users", serde_json::json!({"display_name": "tester"})).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_i64().unwrap()
}

/// PUT a watched rating and assert success.
pub async fn rate(app: Router, user_id: DbId, movie_id: DbId, rating: i16) {
    let response = put_json(
        app,
        &format!("/v1/users/{user_id}/ratings/{movie_id}"),
        serde_json::json!({"rating": rating, "status": "watched"}),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
}

/// Read the stored profile embedding as pgvector text (bit-exact compare).
pub async fn profile_embedding_text(pool: &PgPool, user_id: DbId) -> Option<String> {
    sqlx::query_scalar("SELECT embedding::text FROM user_profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .unwrap()
}
