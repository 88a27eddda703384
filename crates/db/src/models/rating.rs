//! Rating rows, filters, and scoring-context join rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tastekid_core::scoring::ScoringRow;
use tastekid_core::types::{DbId, Timestamp};

/// Watch status of a rating row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingStatus {
    Watched,
    Unwatched,
}

impl RatingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Watched => "watched",
            Self::Unwatched => "unwatched",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "watched" => Some(Self::Watched),
            "unwatched" => Some(Self::Unwatched),
            _ => None,
        }
    }
}

/// A rated movie as listed on a user's ratings page.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RatedMovieRow {
    pub id: DbId,
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub rating: Option<i16>,
    pub status: String,
    pub updated_at: Timestamp,
}

/// Optional filter dimensions for rating listings.
#[derive(Debug, Clone, Default)]
pub struct RatingFilter {
    pub status: Option<RatingStatus>,
    pub rating_min: Option<i16>,
    pub rating_max: Option<i16>,
    /// Only ratings updated within the last N days.
    pub since_days: Option<i32>,
}

/// A rating joined with the movie feature columns the scoring context
/// aggregates over.
#[derive(Debug, Clone, FromRow)]
pub struct ScoringJoinRow {
    pub movie_id: DbId,
    pub genres: Option<String>,
    pub keywords: Option<String>,
    pub runtime: Option<i32>,
    pub release_date: Option<NaiveDate>,
    pub original_language: Option<String>,
    pub rating: Option<i16>,
}

impl From<ScoringJoinRow> for ScoringRow {
    fn from(row: ScoringJoinRow) -> Self {
        ScoringRow {
            movie_id: row.movie_id,
            genres: row.genres,
            keywords: row.keywords,
            runtime: row.runtime,
            release_date: row.release_date,
            original_language: row.original_language,
            rating: row.rating,
        }
    }
}

/// An embedding (as pgvector text) paired with the rating that selected it.
#[derive(Debug, Clone, FromRow)]
pub struct EmbeddingRatingRow {
    pub embedding: String,
    pub rating: Option<i16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        assert_eq!(RatingStatus::parse("watched"), Some(RatingStatus::Watched));
        assert_eq!(RatingStatus::parse("unwatched"), Some(RatingStatus::Unwatched));
        assert_eq!(RatingStatus::Watched.as_str(), "watched");
        assert_eq!(RatingStatus::parse("seen"), None);
        assert_eq!(RatingStatus::parse("WATCHED"), None);
    }
}
