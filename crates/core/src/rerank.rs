//! Deterministic feature-weighted reranker.
//!
//! Candidates arrive from the vector index ordered by cosine distance; the
//! reranker blends that similarity with content heuristics (genre/style
//! overlap, runtime/year proximity, language, popularity) and an optional
//! dislike penalty, then re-orders with stable tie-breaking. Identical
//! inputs produce bit-identical output on every replica: set types are
//! ordered, float comparisons use `total_cmp`, and nothing here consults
//! a clock or RNG.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::features::{extract_year, normalize_language, parse_token_set};
use crate::style_keywords::style_subset;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Feature weights
// ---------------------------------------------------------------------------

pub const W_SIMILARITY: f64 = 1.00;
pub const W_GENRE_OVERLAP: f64 = 0.25;
pub const W_STYLE_OVERLAP: f64 = 0.15;
pub const W_RUNTIME_PROXIMITY: f64 = 0.05;
pub const W_YEAR_PROXIMITY: f64 = 0.05;
pub const W_LANGUAGE_MATCH: f64 = 0.05;
pub const W_POPULARITY: f64 = 0.05;
pub const TONAL_MISMATCH_PENALTY: f64 = 0.10;

/// Runtime difference (minutes) at which the proximity bonus reaches zero.
pub const RUNTIME_PROXIMITY_SPAN_MIN: f64 = 60.0;

/// Release-year difference at which the proximity bonus reaches zero.
pub const YEAR_PROXIMITY_SPAN: f64 = 30.0;

/// Genre sets whose pairing signals a tonal mismatch.
const TONAL_DARK: &[&str] = &["horror", "thriller"];
const TONAL_LIGHT: &[&str] = &["family", "animation"];

// ---------------------------------------------------------------------------
// Engine defaults (env-overridable in the API layer)
// ---------------------------------------------------------------------------

pub const DEFAULT_VOTE_COUNT_CAP: i64 = 100_000;
pub const DEFAULT_DISLIKE_WEIGHT: f64 = 0.35;
pub const DEFAULT_DISLIKE_MIN_COUNT: usize = 3;
pub const DEFAULT_RERANK_FETCH_MULTIPLIER: i64 = 5;
pub const DEFAULT_MAX_FETCH_CANDIDATES: i64 = 500;
pub const DEFAULT_SIM_CANDIDATES_K: i64 = 200;
pub const DEFAULT_SIM_TOP_N: i64 = 20;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Feature bundle for one side of a comparison: either the anchor movie /
/// aggregated user context, or a single candidate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScoringContext {
    pub genres: BTreeSet<String>,
    pub style: BTreeSet<String>,
    pub runtime: Option<i32>,
    pub year: Option<i32>,
    pub language: Option<String>,
}

/// One candidate entering the reranker.
#[derive(Debug, Clone)]
pub struct RerankItem {
    pub movie_id: DbId,
    /// Cosine distance to the query vector (profile or anchor embedding).
    pub distance: f64,
    /// Cosine distance to the dislike centroid, when one exists.
    pub dislike_distance: Option<f64>,
    pub vote_count: i64,
    pub features: ScoringContext,
}

/// A candidate with its final batch-normalized score.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub movie_id: DbId,
    pub distance: f64,
    pub vote_count: i64,
    /// Final score in `[0, 1]`.
    pub score: f64,
}

/// Tunables threaded through from the engine configuration.
#[derive(Debug, Clone, Copy)]
pub struct RankParams {
    pub dislike_weight: f64,
    pub vote_count_cap: i64,
}

impl Default for RankParams {
    fn default() -> Self {
        Self {
            dislike_weight: DEFAULT_DISLIKE_WEIGHT,
            vote_count_cap: DEFAULT_VOTE_COUNT_CAP,
        }
    }
}

// ---------------------------------------------------------------------------
// Feature bundle construction
// ---------------------------------------------------------------------------

/// Build a [`ScoringContext`] from raw movie columns.
pub fn candidate_features(
    genres: Option<&str>,
    keywords: Option<&str>,
    runtime: Option<i32>,
    release_date: Option<NaiveDate>,
    language: Option<&str>,
) -> ScoringContext {
    let keywords = parse_token_set(keywords);
    ScoringContext {
        style: style_subset(&keywords),
        genres: parse_token_set(genres),
        runtime,
        year: extract_year(release_date),
        language: normalize_language(language),
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

fn jaccard(left: &BTreeSet<String>, right: &BTreeSet<String>) -> f64 {
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let intersection = left.intersection(right).count() as f64;
    let union = left.union(right).count() as f64;
    intersection / union
}

fn intersects(set: &BTreeSet<String>, tokens: &[&str]) -> bool {
    tokens.iter().any(|t| set.contains(*t))
}

/// Tonal mismatch: 1 when one side is horror/thriller-leaning and the
/// other family/animation-leaning, in either direction.
fn tonal_mismatch(context: &ScoringContext, candidate: &ScoringContext) -> f64 {
    let clash = (intersects(&candidate.genres, TONAL_DARK)
        && intersects(&context.genres, TONAL_LIGHT))
        || (intersects(&candidate.genres, TONAL_LIGHT)
            && intersects(&context.genres, TONAL_DARK));
    if clash {
        1.0
    } else {
        0.0
    }
}

/// Popularity quality in `[0, 1]`: log-scaled vote count against the cap.
fn popularity(vote_count: i64, cap: i64) -> f64 {
    if vote_count <= 0 || cap <= 0 {
        return 0.0;
    }
    let value = ((1 + vote_count) as f64).log10() / ((1 + cap) as f64).log10();
    value.clamp(0.0, 1.0)
}

/// Raw (un-normalized) feature-weighted score of one candidate against a
/// context. Monotone in cosine similarity by construction: the similarity
/// term carries the dominant weight and every other term is bounded.
pub fn raw_score(
    context: &ScoringContext,
    candidate: &ScoringContext,
    distance: f64,
    vote_count: i64,
    vote_count_cap: i64,
) -> f64 {
    // pgvector's <=> yields [0, 2]; similarity below zero is noise for
    // ranking purposes, so clamp into [0, 1].
    let similarity = (1.0 - distance).clamp(0.0, 1.0);

    let runtime_proximity = match (context.runtime, candidate.runtime) {
        (Some(a), Some(b)) => {
            1.0 - (f64::from((a - b).abs()) / RUNTIME_PROXIMITY_SPAN_MIN).min(1.0)
        }
        _ => 0.0,
    };

    let year_proximity = match (context.year, candidate.year) {
        (Some(a), Some(b)) => 1.0 - (f64::from((a - b).abs()) / YEAR_PROXIMITY_SPAN).min(1.0),
        _ => 0.0,
    };

    let language_match = match (&context.language, &candidate.language) {
        (Some(a), Some(b)) if a == b => 1.0,
        _ => 0.0,
    };

    W_SIMILARITY * similarity
        + W_GENRE_OVERLAP * jaccard(&context.genres, &candidate.genres)
        + W_STYLE_OVERLAP * jaccard(&context.style, &candidate.style)
        + W_RUNTIME_PROXIMITY * runtime_proximity
        + W_YEAR_PROXIMITY * year_proximity
        + W_LANGUAGE_MATCH * language_match
        + W_POPULARITY * popularity(vote_count, vote_count_cap)
        - TONAL_MISMATCH_PENALTY * tonal_mismatch(context, candidate)
}

/// Min-max normalize into `[0, 1]`. A degenerate batch (all values equal)
/// maps to 1.0 so a lone candidate is not zeroed out.
fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let Some(min) = values.iter().copied().min_by(f64::total_cmp) else {
        return Vec::new();
    };
    let max = values.iter().copied().max_by(f64::total_cmp).unwrap_or(min);
    if (max - min).abs() < f64::EPSILON {
        return vec![1.0; values.len()];
    }
    values.iter().map(|v| (v - min) / (max - min)).collect()
}

/// Score and order a candidate batch.
///
/// Like scores (and dislike scores, when a dislike context is given) are
/// each min-max normalized within the batch, then
/// `final = clamp(like - dislike_weight * dislike, 0, 1)`.
///
/// Ordering: score desc, distance asc, vote_count desc, movie_id asc.
pub fn rank_candidates(
    like_context: &ScoringContext,
    dislike_context: Option<&ScoringContext>,
    items: &[RerankItem],
    params: RankParams,
) -> Vec<RankedCandidate> {
    let like_raw: Vec<f64> = items
        .iter()
        .map(|item| {
            raw_score(
                like_context,
                &item.features,
                item.distance,
                item.vote_count,
                params.vote_count_cap,
            )
        })
        .collect();
    let like_norm = min_max_normalize(&like_raw);

    let dislike_norm: Vec<f64> = match dislike_context {
        Some(dislike_ctx) => {
            let raw: Vec<f64> = items
                .iter()
                .map(|item| match item.dislike_distance {
                    Some(dislike_distance) => raw_score(
                        dislike_ctx,
                        &item.features,
                        dislike_distance,
                        item.vote_count,
                        params.vote_count_cap,
                    ),
                    None => 0.0,
                })
                .collect();
            min_max_normalize(&raw)
        }
        None => vec![0.0; items.len()],
    };

    let mut ranked: Vec<RankedCandidate> = items
        .iter()
        .zip(like_norm.iter().zip(&dislike_norm))
        .map(|(item, (like, dislike))| RankedCandidate {
            movie_id: item.movie_id,
            distance: item.distance,
            vote_count: item.vote_count,
            score: (like - params.dislike_weight * dislike).clamp(0.0, 1.0),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.distance.total_cmp(&b.distance))
            .then_with(|| b.vote_count.cmp(&a.vote_count))
            .then_with(|| a.movie_id.cmp(&b.movie_id))
    });
    ranked
}

/// Project a single user-vs-movie comparison onto the 0..100 match scale.
///
/// A single candidate has no batch to normalize against, so this uses the
/// raw blended score clamped to `[0, 1]` before scaling.
pub fn match_score(
    like_context: &ScoringContext,
    dislike_context: Option<&ScoringContext>,
    candidate: &ScoringContext,
    distance: f64,
    dislike_distance: Option<f64>,
    vote_count: i64,
    params: RankParams,
) -> i32 {
    let like = raw_score(
        like_context,
        candidate,
        distance,
        vote_count,
        params.vote_count_cap,
    );
    let dislike = match (dislike_context, dislike_distance) {
        (Some(ctx), Some(d)) => raw_score(ctx, candidate, d, vote_count, params.vote_count_cap),
        _ => 0.0,
    };
    let blended = (like - params.dislike_weight * dislike).clamp(0.0, 1.0);
    ((blended * 100.0).round() as i32).clamp(0, 100)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
