//! Repository for movie reads: detail, title lookup, candidate hydration,
//! and the popularity queue.

use sqlx::PgPool;
use tastekid_core::features::escape_like;
use tastekid_core::types::DbId;

use crate::models::movie::{
    CandidateRow, MovieDetail, MovieLookup, PopularityRow, MOVIE_DETAIL_COLUMNS,
};

/// Column list for candidate hydration queries.
const CANDIDATE_COLUMNS: &str = "\
    m.id, m.title, m.release_date, m.genres, m.keywords, m.runtime, \
    m.original_language, m.vote_count, m.poster_path, m.backdrop_path";

/// Provides movie read operations.
pub struct MovieRepo;

impl MovieRepo {
    /// Fetch full movie detail by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MovieDetail>, sqlx::Error> {
        let sql = format!("SELECT {MOVIE_DETAIL_COLUMNS} FROM movies WHERE id = $1");
        sqlx::query_as::<_, MovieDetail>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Check whether a movie exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM movies WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Resolve a title query to a single movie.
    ///
    /// Match ladder: case-insensitive exact match, then prefix, then
    /// substring. Ties break by vote_count desc, release_date desc, id asc.
    /// LIKE wildcards in the query are escaped so they match literally.
    pub async fn lookup_by_title(
        pool: &PgPool,
        title: &str,
    ) -> Result<Option<MovieLookup>, sqlx::Error> {
        let escaped = escape_like(title);
        let prefix = format!("{escaped}%");
        let substring = format!("%{escaped}%");

        let sql = "\
            SELECT id, title \
            FROM movies \
            WHERE lower(title) = lower($1) \
               OR title ILIKE $2 \
               OR title ILIKE $3 \
            ORDER BY \
                CASE \
                    WHEN lower(title) = lower($1) THEN 0 \
                    WHEN title ILIKE $2 THEN 1 \
                    ELSE 2 \
                END, \
                vote_count DESC NULLS LAST, \
                release_date DESC NULLS LAST, \
                id ASC \
            LIMIT 1";

        sqlx::query_as::<_, MovieLookup>(sql)
            .bind(title)
            .bind(&prefix)
            .bind(&substring)
            .fetch_optional(pool)
            .await
    }

    /// Hydrate candidate ids into feature rows.
    ///
    /// Movies that have lost their embedding since retrieval are dropped
    /// here; they may never appear as similarity results. The caller
    /// restores index order, so no ORDER BY.
    pub async fn fetch_candidates(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<CandidateRow>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {CANDIDATE_COLUMNS} \
             FROM movies m \
             WHERE m.id = ANY($1) \
               AND EXISTS (SELECT 1 FROM movie_embeddings e WHERE e.movie_id = m.id)"
        );
        sqlx::query_as::<_, CandidateRow>(&sql)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Page through movies by popularity, excluding everything the user
    /// has a rating row for. Order: vote_count desc, vote_average desc,
    /// id asc.
    ///
    /// With `require_embedding`, embedding-less movies are skipped (used
    /// by `next` once the user has a taste profile).
    pub async fn popularity_queue(
        pool: &PgPool,
        user_id: DbId,
        require_embedding: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PopularityRow>, sqlx::Error> {
        let sql = "\
            SELECT m.id, m.title, m.release_date, m.genres, m.poster_path, m.backdrop_path \
            FROM movies m \
            LEFT JOIN user_movie_ratings r \
              ON r.movie_id = m.id \
             AND r.user_id = $1 \
            WHERE r.movie_id IS NULL \
              AND ($2 = false OR EXISTS ( \
                    SELECT 1 FROM movie_embeddings e WHERE e.movie_id = m.id)) \
            ORDER BY m.vote_count DESC NULLS LAST, \
                     m.vote_average DESC NULLS LAST, \
                     m.id ASC \
            LIMIT $3 \
            OFFSET $4";

        sqlx::query_as::<_, PopularityRow>(sql)
            .bind(user_id)
            .bind(require_embedding)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
