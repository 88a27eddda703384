//! Integration tests for the rating mutation and its profile invariants.

mod common;

use axum::http::StatusCode;
use common::{
    axis_embedding, body_json, create_user, get, insert_indexed_movie, profile_embedding_text,
    put_json, rate,
};
use sqlx::PgPool;

async fn seed_four_movies(pool: &PgPool) {
    insert_indexed_movie(pool, 1, "Movie A", "drama", 1_000, &axis_embedding(0)).await;
    insert_indexed_movie(pool, 2, "Movie B", "drama", 1_000, &axis_embedding(1)).await;
    insert_indexed_movie(pool, 3, "Movie C", "drama", 1_000, &axis_embedding(2)).await;
    insert_indexed_movie(pool, 4, "Movie D", "horror", 1_000, &axis_embedding(3)).await;
}

// ---------------------------------------------------------------------------
// Profile weighting (scenario S1)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn profile_counts_only_contributors(pool: PgPool) {
    seed_four_movies(&pool).await;
    let user_id = create_user(common::build_test_app(pool.clone())).await;

    rate(common::build_test_app(pool.clone()), user_id, 1, 5).await;
    rate(common::build_test_app(pool.clone()), user_id, 2, 4).await;
    rate(common::build_test_app(pool.clone()), user_id, 3, 3).await;
    rate(common::build_test_app(pool.clone()), user_id, 4, 2).await;

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/v1/users/{user_id}/profile"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    // A=5, B=4, C=3 contribute; D=2 does not.
    assert_eq!(json["data"]["num_ratings"], 3);
    // Likes are rating >= 4.
    assert_eq!(json["data"]["num_liked"], 2);
    // The stored vector is unit-norm.
    let norm = json["data"]["embedding_norm"].as_f64().unwrap();
    assert!((norm - 1.0).abs() < 1e-3, "profile must be L2-normalized, norm={norm}");
    assert!(json["data"]["updated_at"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn profile_weights_favor_strong_likes(pool: PgPool) {
    seed_four_movies(&pool).await;
    let user_id = create_user(common::build_test_app(pool.clone())).await;

    // A=5 (weight 1.0) on axis 0, C=3 (neutral weight 0.2) on axis 2.
    rate(common::build_test_app(pool.clone()), user_id, 1, 5).await;
    rate(common::build_test_app(pool.clone()), user_id, 3, 3).await;

    let text = profile_embedding_text(&pool, user_id).await.unwrap();
    let vec = tastekid_core::vector::parse_vector_text(&text).unwrap();
    assert!(
        vec[0] > vec[2] * 3.0,
        "the 5-rated axis must dominate the 3-rated axis"
    );
}

// ---------------------------------------------------------------------------
// Body normalization and validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn rating_requires_rating_or_status(pool: PgPool) {
    seed_four_movies(&pool).await;
    let user_id = create_user(common::build_test_app(pool.clone())).await;

    let response = put_json(
        common::build_test_app(pool),
        &format!("/v1/users/{user_id}/ratings/1"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "INVALID_ARGUMENT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn rating_rejects_out_of_range_values(pool: PgPool) {
    seed_four_movies(&pool).await;
    let user_id = create_user(common::build_test_app(pool.clone())).await;

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/v1/users/{user_id}/ratings/1"),
        serde_json::json!({"rating": 6}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json(
        common::build_test_app(pool),
        &format!("/v1/users/{user_id}/ratings/1"),
        serde_json::json!({"rating": 3, "status": "seen"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn rating_unknown_movie_or_user_404s(pool: PgPool) {
    seed_four_movies(&pool).await;
    let user_id = create_user(common::build_test_app(pool.clone())).await;

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/v1/users/{user_id}/ratings/999"),
        serde_json::json!({"rating": 4}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "MOVIE_NOT_FOUND");

    let response = put_json(
        common::build_test_app(pool),
        "/v1/users/424242/ratings/1",
        serde_json::json!({"rating": 4}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "USER_NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unwatched_write_clears_the_rating(pool: PgPool) {
    seed_four_movies(&pool).await;
    let user_id = create_user(common::build_test_app(pool.clone())).await;

    rate(common::build_test_app(pool.clone()), user_id, 1, 5).await;

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/v1/users/{user_id}/ratings/1"),
        serde_json::json!({"rating": 5, "status": "unwatched"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(
        common::build_test_app(pool),
        &format!("/v1/users/{user_id}/ratings"),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["status"], "unwatched");
    assert!(json["data"][0]["rating"].is_null());
}

// ---------------------------------------------------------------------------
// Idempotence (property 7) and profile lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn identical_puts_leave_identical_profiles(pool: PgPool) {
    seed_four_movies(&pool).await;
    let user_id = create_user(common::build_test_app(pool.clone())).await;

    rate(common::build_test_app(pool.clone()), user_id, 1, 5).await;
    rate(common::build_test_app(pool.clone()), user_id, 2, 4).await;
    let first = profile_embedding_text(&pool, user_id).await.unwrap();

    // Replay the last PUT verbatim.
    rate(common::build_test_app(pool.clone()), user_id, 2, 4).await;
    let second = profile_embedding_text(&pool, user_id).await.unwrap();

    assert_eq!(first, second, "identical PUTs must be bit-exact no-ops");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn profile_row_is_deleted_with_its_last_contributor(pool: PgPool) {
    seed_four_movies(&pool).await;
    let user_id = create_user(common::build_test_app(pool.clone())).await;

    rate(common::build_test_app(pool.clone()), user_id, 1, 5).await;
    assert!(profile_embedding_text(&pool, user_id).await.is_some());

    // Rewriting the only contributor as unwatched removes the profile.
    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/v1/users/{user_id}/ratings/1"),
        serde_json::json!({"status": "unwatched"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(profile_embedding_text(&pool, user_id).await.is_none());

    // Recommendations surface the missing profile as PROFILE_NOT_FOUND.
    let response = get(
        common::build_test_app(pool),
        &format!("/v1/users/{user_id}/recommendations"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "PROFILE_NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn watched_unrated_contributes_nothing(pool: PgPool) {
    seed_four_movies(&pool).await;
    let user_id = create_user(common::build_test_app(pool.clone())).await;

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/v1/users/{user_id}/ratings/1"),
        serde_json::json!({"status": "watched"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    assert!(
        profile_embedding_text(&pool, user_id).await.is_none(),
        "marked-watched-unrated must not create a profile"
    );
}

// ---------------------------------------------------------------------------
// Ratings listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn ratings_list_orders_by_recency_and_filters(pool: PgPool) {
    seed_four_movies(&pool).await;
    let user_id = create_user(common::build_test_app(pool.clone())).await;

    rate(common::build_test_app(pool.clone()), user_id, 1, 5).await;
    rate(common::build_test_app(pool.clone()), user_id, 2, 2).await;

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/v1/users/{user_id}/ratings"),
    )
    .await;
    let json = body_json(response).await;
    // Most recently updated first.
    assert_eq!(json["data"][0]["id"], 2);
    assert_eq!(json["data"][1]["id"], 1);

    let response = get(
        common::build_test_app(pool),
        &format!("/v1/users/{user_id}/ratings?rating_min=4"),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["id"], 1);
}
