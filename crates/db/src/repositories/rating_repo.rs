//! Repository for rating rows: the single source of truth for taste input.

use std::collections::HashSet;

use sqlx::{PgConnection, PgPool};
use tastekid_core::types::DbId;
use tastekid_core::vector::parse_vector_text;

use crate::models::rating::{
    EmbeddingRatingRow, RatedMovieRow, RatingFilter, RatingStatus, ScoringJoinRow,
};

/// Provides rating reads and the (transaction-scoped) upsert.
pub struct RatingRepo;

impl RatingRepo {
    /// Upsert a rating row, stamping `updated_at` with the transaction
    /// time. Runs on the caller's connection so it lands inside the
    /// mutation transaction.
    pub async fn upsert(
        conn: &mut PgConnection,
        user_id: DbId,
        movie_id: DbId,
        rating: Option<i16>,
        status: RatingStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_movie_ratings (user_id, movie_id, rating, status) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, movie_id) \
             DO UPDATE SET rating = EXCLUDED.rating, \
                           status = EXCLUDED.status, \
                           updated_at = now()",
        )
        .bind(user_id)
        .bind(movie_id)
        .bind(rating)
        .bind(status.as_str())
        .execute(conn)
        .await?;
        Ok(())
    }

    /// List a user's rated movies, newest update first (ties by movie id).
    /// Fetches `limit` rows starting at `offset`; callers over-fetch by
    /// one for pagination.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        filter: &RatingFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RatedMovieRow>, sqlx::Error> {
        let sql = "\
            SELECT m.id, m.title, m.poster_path, m.backdrop_path, \
                   r.rating, r.status, r.updated_at \
            FROM user_movie_ratings r \
            JOIN movies m ON m.id = r.movie_id \
            WHERE r.user_id = $1 \
              AND ($2::text IS NULL OR r.status = $2) \
              AND ($3::smallint IS NULL OR r.rating >= $3) \
              AND ($4::smallint IS NULL OR r.rating <= $4) \
              AND ($5::int IS NULL \
                   OR r.updated_at >= now() - make_interval(days => $5)) \
            ORDER BY r.updated_at DESC, r.movie_id ASC \
            LIMIT $6 \
            OFFSET $7";

        sqlx::query_as::<_, RatedMovieRow>(sql)
            .bind(user_id)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.rating_min)
            .bind(filter.rating_max)
            .bind(filter.since_days)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// The set of movies with ANY rating row for this user (watched or
    /// unwatched). Used for exclusion in sourcing.
    pub async fn seen_movie_ids(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<HashSet<DbId>, sqlx::Error> {
        let ids: Vec<DbId> =
            sqlx::query_scalar("SELECT movie_id FROM user_movie_ratings WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(pool)
                .await?;
        Ok(ids.into_iter().collect())
    }

    /// Count of watched ratings at or above the like threshold.
    pub async fn count_liked(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_movie_ratings \
             WHERE user_id = $1 AND status = 'watched' AND rating >= 4",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// The most recent watched-and-rated rows joined with movie features,
    /// for scoring-context aggregation.
    pub async fn recent_scoring_rows(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<ScoringJoinRow>, sqlx::Error> {
        let sql = "\
            SELECT r.movie_id, m.genres, m.keywords, m.runtime, \
                   m.release_date, m.original_language, r.rating \
            FROM user_movie_ratings r \
            JOIN movies m ON m.id = r.movie_id \
            WHERE r.user_id = $1 \
              AND r.status = 'watched' \
              AND r.rating IS NOT NULL \
            ORDER BY r.updated_at DESC, r.movie_id ASC \
            LIMIT $2";

        sqlx::query_as::<_, ScoringJoinRow>(sql)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Contributor embeddings for profile rebuilding: watched ratings at
    /// or above the profile floor whose movie still has an embedding.
    /// Runs on the caller's connection so the rebuild sees the rating
    /// written earlier in the same transaction.
    pub async fn contributor_embeddings(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<Vec<(Vec<f32>, Option<i16>)>, sqlx::Error> {
        let rows: Vec<EmbeddingRatingRow> = sqlx::query_as(
            "SELECT e.embedding::text AS embedding, r.rating \
             FROM user_movie_ratings r \
             JOIN movie_embeddings e ON e.movie_id = r.movie_id \
             WHERE r.user_id = $1 \
               AND r.status = 'watched' \
               AND r.rating >= 3",
        )
        .bind(user_id)
        .fetch_all(conn)
        .await?;

        rows.into_iter()
            .map(|row| {
                let vec = parse_vector_text(&row.embedding).ok_or_else(|| {
                    sqlx::Error::Decode("malformed profile contributor embedding".into())
                })?;
                Ok((vec, row.rating))
            })
            .collect()
    }
}
