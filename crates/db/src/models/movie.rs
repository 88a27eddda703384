//! Movie entity rows and candidate DTOs.
//!
//! Movies are written by the ingestion pipeline and immutable on the hot
//! path; the service only reads them. `genres` and `keywords` are stored
//! as comma-separated text and parsed into sets in `tastekid_core`.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use tastekid_core::types::DbId;

/// Column list for full movie detail queries.
pub const MOVIE_DETAIL_COLUMNS: &str = "\
    id, title, original_title, release_date, runtime, original_language, \
    overview, tagline, genres, keywords, vote_average, vote_count, \
    poster_path, backdrop_path";

/// A full row from the `movies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MovieDetail {
    pub id: DbId,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub runtime: Option<i32>,
    pub original_language: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub genres: Option<String>,
    pub keywords: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: i64,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

/// Title-lookup result: just enough to chain into a detail fetch.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MovieLookup {
    pub id: DbId,
    pub title: Option<String>,
}

/// A hydrated similarity/recommendation candidate. Carries the feature
/// columns the reranker consumes plus the display fields.
#[derive(Debug, Clone, FromRow)]
pub struct CandidateRow {
    pub id: DbId,
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub genres: Option<String>,
    pub keywords: Option<String>,
    pub runtime: Option<i32>,
    pub original_language: Option<String>,
    pub vote_count: i64,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

/// A popularity-queue entry (no similarity signal attached).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PopularityRow {
    pub id: DbId,
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub genres: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

/// A kNN hit from the vector index.
#[derive(Debug, Clone, FromRow)]
pub struct KnnRow {
    pub movie_id: DbId,
    pub distance: f64,
    /// Cosine distance to the dislike centroid; present only when the
    /// query supplied one.
    pub dislike_distance: Option<f64>,
}
