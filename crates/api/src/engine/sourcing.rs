//! Candidate sourcing: expand a query vector into a filtered, hydrated
//! candidate pool, preserving index distance order.

use std::collections::HashSet;

use tastekid_core::types::DbId;
use tastekid_db::models::movie::CandidateRow;
use tastekid_db::repositories::{EmbeddingRepo, MovieRepo};
use tastekid_db::DbPool;

use crate::error::AppResult;

/// A hydrated candidate with its index distances attached.
#[derive(Debug, Clone)]
pub struct SourcedCandidate {
    pub row: CandidateRow,
    pub distance: f64,
    pub dislike_distance: Option<f64>,
}

/// Fetch `k_fetch` nearest neighbors of `query`, drop the anchor and any
/// seen movies, and hydrate the survivors.
///
/// Filters run in order: (a) anchor id, (b) seen set, (c) movies whose
/// embedding vanished between retrieval and hydration. Output stays in
/// ascending-distance order; fewer than requested is not an error.
pub async fn source_candidates(
    pool: &DbPool,
    query: &[f32],
    dislike_centroid: Option<&[f32]>,
    k_fetch: i64,
    exclude_anchor: Option<DbId>,
    exclude_seen: Option<&HashSet<DbId>>,
) -> AppResult<Vec<SourcedCandidate>> {
    let hits = EmbeddingRepo::knn(pool, query, dislike_centroid, k_fetch).await?;

    let surviving: Vec<_> = hits
        .into_iter()
        .filter(|hit| exclude_anchor != Some(hit.movie_id))
        .filter(|hit| !exclude_seen.is_some_and(|seen| seen.contains(&hit.movie_id)))
        .collect();

    let ids: Vec<DbId> = surviving.iter().map(|hit| hit.movie_id).collect();
    let mut rows: std::collections::HashMap<DbId, CandidateRow> =
        MovieRepo::fetch_candidates(pool, &ids)
            .await?
            .into_iter()
            .map(|row| (row.id, row))
            .collect();

    Ok(surviving
        .into_iter()
        .filter_map(|hit| {
            rows.remove(&hit.movie_id).map(|row| SourcedCandidate {
                row,
                distance: hit.distance,
                dislike_distance: hit.dislike_distance,
            })
        })
        .collect())
}
