// Shared seed helpers for repository tests. Not every test binary uses
// every helper, so dead_code warnings are suppressed at the module level.
#![allow(dead_code)]

use sqlx::PgPool;
use tastekid_core::types::{DbId, EMBEDDING_DIMENSION};
use tastekid_core::vector::to_vector_literal;

/// A unit vector along one embedding axis; distinct axes are orthogonal,
/// which makes expected kNN orderings easy to reason about.
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
    vote_average: f64,
) {
    sqlx::query(
        "INSERT INTO movies \
             (id, title, release_date, runtime, original_language, genres, keywords, \
              vote_average, vote_count) \
         VALUES ($1, $2, '2010-06-01', 110, 'en', $3, 'heist, los angeles', $4, $5)",
    )
    .bind(id)
    .bind(title)
    .bind(genres)
    .bind(vote_average)
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

pub async fn insert_user(pool: &PgPool, display_name: &str) -> DbId {
    sqlx::query_scalar("INSERT INTO users (display_name) VALUES ($1) RETURNING id")
        .bind(display_name)
        .fetch_one(pool)
        .await
        .unwrap()
}
