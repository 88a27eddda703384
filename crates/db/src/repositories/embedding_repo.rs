//! Repository for movie embeddings and the cosine kNN search.
//!
//! The `embedding` column is pgvector `vector(768)`. Because we use
//! runtime queries, vectors are bound as text literals (`'[0.1,...]'`)
//! cast with `::vector` and read back through `::text`.

use sqlx::PgPool;
use tastekid_core::types::DbId;
use tastekid_core::vector::{parse_vector_text, to_vector_literal};

use crate::models::movie::KnnRow;

/// Provides embedding reads and nearest-neighbor queries.
pub struct EmbeddingRepo;

impl EmbeddingRepo {
    /// Fetch a movie's embedding, or `None` when the movie is not
    /// indexable. Callers decide whether absence is an error.
    pub async fn find_for_movie(
        pool: &PgPool,
        movie_id: DbId,
    ) -> Result<Option<Vec<f32>>, sqlx::Error> {
        let text: Option<String> = sqlx::query_scalar(
            "SELECT embedding::text FROM movie_embeddings WHERE movie_id = $1",
        )
        .bind(movie_id)
        .fetch_optional(pool)
        .await?;

        text.map(|t| decode_vector(&t)).transpose()
    }

    /// Batch-fetch embeddings for a set of movies. Missing movies are
    /// simply absent from the result.
    pub async fn for_movies(
        pool: &PgPool,
        movie_ids: &[DbId],
    ) -> Result<Vec<(DbId, Vec<f32>)>, sqlx::Error> {
        if movie_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<(DbId, String)> = sqlx::query_as(
            "SELECT movie_id, embedding::text FROM movie_embeddings WHERE movie_id = ANY($1)",
        )
        .bind(movie_ids)
        .fetch_all(pool)
        .await?;

        rows.into_iter()
            .map(|(id, text)| Ok((id, decode_vector(&text)?)))
            .collect()
    }

    /// k-nearest-neighbor search by cosine distance over the HNSW index.
    ///
    /// Returns `(movie_id, distance)` ascending by distance. When a
    /// dislike centroid is supplied, each hit also carries its distance
    /// to that centroid so the reranker can score the dislike side
    /// without re-fetching vectors.
    pub async fn knn(
        pool: &PgPool,
        query: &[f32],
        dislike_centroid: Option<&[f32]>,
        k: i64,
    ) -> Result<Vec<KnnRow>, sqlx::Error> {
        let query_literal = to_vector_literal(query);

        match dislike_centroid {
            Some(centroid) => {
                let sql = "\
                    SELECT e.movie_id, \
                           (e.embedding <=> $1::vector) AS distance, \
                           (e.embedding <=> $2::vector) AS dislike_distance \
                    FROM movie_embeddings e \
                    ORDER BY e.embedding <=> $1::vector \
                    LIMIT $3";
                sqlx::query_as::<_, KnnRow>(sql)
                    .bind(&query_literal)
                    .bind(to_vector_literal(centroid))
                    .bind(k)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let sql = "\
                    SELECT e.movie_id, \
                           (e.embedding <=> $1::vector) AS distance, \
                           NULL::float8 AS dislike_distance \
                    FROM movie_embeddings e \
                    ORDER BY e.embedding <=> $1::vector \
                    LIMIT $2";
                sqlx::query_as::<_, KnnRow>(sql)
                    .bind(&query_literal)
                    .bind(k)
                    .fetch_all(pool)
                    .await
            }
        }
    }
}

/// Decode pgvector text output, surfacing corruption as a decode error.
fn decode_vector(text: &str) -> Result<Vec<f32>, sqlx::Error> {
    parse_vector_text(text)
        .ok_or_else(|| sqlx::Error::Decode(format!("malformed vector value: {text:?}").into()))
}
