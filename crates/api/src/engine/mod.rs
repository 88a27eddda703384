//! The query engine: composes the store, the vector index, and the core
//! reranker into the read operations (`similar`, `recommendations`,
//! `feed`, `match`, `next`) and the rating mutation.
//!
//! Handlers stay thin; everything that touches more than one repository
//! lives here.

pub mod context;
pub mod queue;
pub mod ratings;
pub mod recommend;
pub mod retry;
pub mod similar;
pub(crate) mod sourcing;

use chrono::NaiveDate;
use serde::Serialize;
use tastekid_core::rerank::{candidate_features, RankedCandidate, RerankItem};
use tastekid_core::types::DbId;

use crate::config::EngineConfig;
use sourcing::SourcedCandidate;

/// A reranked similarity/recommendation result.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredMovie {
    pub id: DbId,
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub genres: Option<String>,
    /// Cosine distance to the query vector.
    pub distance: f64,
    /// `1 - distance`, for display.
    pub similarity: f64,
    /// Batch-normalized score in `[0, 1]`; absent when reranking is
    /// disabled or no like context exists yet.
    pub score: Option<f64>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

/// Where a feed item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSource {
    Profile,
    Popularity,
}

/// One feed entry: a scored recommendation or a popularity fallback.
#[derive(Debug, Clone, Serialize)]
pub struct FeedItem {
    pub id: DbId,
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub genres: Option<String>,
    pub distance: Option<f64>,
    pub similarity: Option<f64>,
    pub score: Option<f64>,
    pub source: FeedSource,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

/// Index fetch size for user-mode (recommendations/feed) sourcing.
///
/// `k_needed` is `offset + k + 1` so deep cursors still see a fully
/// reranked prefix; the multiplier buys reranking headroom and the cap
/// bounds index load.
pub fn fetch_limit_user(config: &EngineConfig, k_needed: i64) -> i64 {
    config
        .max_fetch_candidates
        .min(k_needed.saturating_mul(config.rerank_fetch_multiplier))
        .max(1)
}

/// Index fetch size for anchor-mode (similar) sourcing. Keeps
/// `SIM_CANDIDATES_K` as a floor so small pages still rerank a deep pool.
pub fn fetch_limit_anchor(config: &EngineConfig, k_needed: i64) -> i64 {
    config
        .max_fetch_candidates
        .min(config.sim_candidates_k.max(k_needed.saturating_mul(config.rerank_fetch_multiplier)))
        .max(1)
}

/// Turn hydrated candidates into reranker inputs.
pub(crate) fn to_rerank_items(candidates: &[SourcedCandidate]) -> Vec<RerankItem> {
    candidates
        .iter()
        .map(|c| RerankItem {
            movie_id: c.row.id,
            distance: c.distance,
            dislike_distance: c.dislike_distance,
            vote_count: c.row.vote_count,
            features: candidate_features(
                c.row.genres.as_deref(),
                c.row.keywords.as_deref(),
                c.row.runtime,
                c.row.release_date,
                c.row.original_language.as_deref(),
            ),
        })
        .collect()
}

/// Rebuild display rows in reranked order, attaching the final scores.
pub(crate) fn assemble_ranked(
    ranked: Vec<RankedCandidate>,
    candidates: Vec<SourcedCandidate>,
) -> Vec<ScoredMovie> {
    let mut by_id: std::collections::HashMap<DbId, SourcedCandidate> =
        candidates.into_iter().map(|c| (c.row.id, c)).collect();

    ranked
        .into_iter()
        .filter_map(|r| by_id.remove(&r.movie_id).map(|c| scored(c, Some(r.score))))
        .collect()
}

/// Map a candidate through in index order with an optional score.
pub(crate) fn scored(c: SourcedCandidate, score: Option<f64>) -> ScoredMovie {
    ScoredMovie {
        id: c.row.id,
        title: c.row.title,
        release_date: c.row.release_date,
        genres: c.row.genres,
        distance: c.distance,
        similarity: 1.0 - c.distance,
        score,
        poster_path: c.row.poster_path,
        backdrop_path: c.row.backdrop_path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_fetch_scales_with_k_and_caps() {
        let config = EngineConfig::default();
        assert_eq!(fetch_limit_user(&config, 21), 105);
        assert_eq!(
            fetch_limit_user(&config, 500),
            config.max_fetch_candidates
        );
    }

    #[test]
    fn anchor_fetch_keeps_candidate_floor() {
        let config = EngineConfig::default();
        // Small page: floor dominates.
        assert_eq!(fetch_limit_anchor(&config, 5), config.sim_candidates_k);
        // Large page: multiplier dominates, cap still applies.
        assert_eq!(
            fetch_limit_anchor(&config, 101),
            config.max_fetch_candidates
        );
    }
}
