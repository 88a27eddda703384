//! Anchor-mode similarity: movies that feel like a given movie.

use tastekid_core::error::CoreError;
use tastekid_core::pagination::Page;
use tastekid_core::rerank::{candidate_features, rank_candidates};
use tastekid_core::types::DbId;
use tastekid_db::repositories::{EmbeddingRepo, MovieRepo};
use tastekid_db::DbPool;

use crate::config::EngineConfig;
use crate::engine::sourcing::source_candidates;
use crate::engine::{assemble_ranked, fetch_limit_anchor, scored, to_rerank_items, ScoredMovie};
use crate::error::AppResult;

/// Rank movies similar to `movie_id` and return the requested page.
///
/// Fails with `MovieNotFound` for an unknown anchor and
/// `EmbeddingNotFound` for an anchor outside the index. With reranking
/// disabled, candidates keep index order and carry no score.
pub async fn similar(
    pool: &DbPool,
    config: &EngineConfig,
    movie_id: DbId,
    k: i64,
    offset: i64,
) -> AppResult<Page<ScoredMovie>> {
    let anchor = MovieRepo::find_by_id(pool, movie_id)
        .await?
        .ok_or(CoreError::MovieNotFound { id: movie_id })?;

    let anchor_embedding = EmbeddingRepo::find_for_movie(pool, movie_id)
        .await?
        .ok_or(CoreError::EmbeddingNotFound { movie_id })?;

    let k_needed = offset + k + 1;
    let candidates = source_candidates(
        pool,
        &anchor_embedding,
        None,
        fetch_limit_anchor(config, k_needed),
        Some(movie_id),
        None,
    )
    .await?;

    let ordered: Vec<ScoredMovie> = if config.sim_rerank_enabled {
        let anchor_context = candidate_features(
            anchor.genres.as_deref(),
            anchor.keywords.as_deref(),
            anchor.runtime,
            anchor.release_date,
            anchor.original_language.as_deref(),
        );
        let items = to_rerank_items(&candidates);
        let ranked = rank_candidates(&anchor_context, None, &items, config.rank_params());
        assemble_ranked(ranked, candidates)
    } else {
        candidates.into_iter().map(|c| scored(c, None)).collect()
    };

    let page_window: Vec<ScoredMovie> = ordered
        .into_iter()
        .skip(offset as usize)
        .take((k + 1) as usize)
        .collect();
    Ok(Page::from_overfetch(page_window, k, offset))
}
