//! User-mode recommendations, the feed, and the match projection.

use tastekid_core::error::CoreError;
use tastekid_core::pagination::Page;
use tastekid_core::rerank::{candidate_features, match_score, rank_candidates};
use tastekid_core::types::DbId;
use tastekid_core::vector::cosine_distance;
use tastekid_db::repositories::{EmbeddingRepo, MovieRepo, ProfileRepo, RatingRepo, UserRepo};
use tastekid_db::DbPool;

use crate::config::EngineConfig;
use crate::engine::context::build_user_contexts;
use crate::engine::sourcing::source_candidates;
use crate::engine::{
    assemble_ranked, fetch_limit_user, scored, to_rerank_items, FeedItem, FeedSource, ScoredMovie,
};
use crate::error::{AppError, AppResult};

/// Personalized recommendations for a user with a taste profile.
///
/// Fails with `UserNotFound` for unknown users and `ProfileNotFound` when
/// no contributing ratings exist yet (the feed treats that case as a soft
/// fallback instead).
pub async fn recommendations(
    pool: &DbPool,
    config: &EngineConfig,
    user_id: DbId,
    k: i64,
    offset: i64,
) -> AppResult<Page<ScoredMovie>> {
    ensure_user(pool, user_id).await?;

    let profile = ProfileRepo::get(pool, user_id)
        .await?
        .ok_or(CoreError::ProfileNotFound { user_id })?;
    let profile_embedding = profile
        .embedding_vec()
        .ok_or_else(|| CoreError::Internal("stored profile embedding is malformed".into()))?;

    let contexts = build_user_contexts(pool, config, user_id).await?;
    let dislike_centroid = contexts
        .dislike_active()
        .then_some(contexts.dislike_centroid.as_deref())
        .flatten();

    let seen = RatingRepo::seen_movie_ids(pool, user_id).await?;
    let k_needed = offset + k + 1;
    let candidates = source_candidates(
        pool,
        &profile_embedding,
        dislike_centroid,
        fetch_limit_user(config, k_needed),
        None,
        Some(&seen),
    )
    .await?;

    let ordered: Vec<ScoredMovie> = match &contexts.like {
        Some(like_context) => {
            let items = to_rerank_items(&candidates);
            let ranked = rank_candidates(
                like_context,
                dislike_centroid.and(contexts.dislike.as_ref()),
                &items,
                config.rank_params(),
            );
            tracing::debug!(
                user_id,
                candidates = items.len(),
                dislike_active = dislike_centroid.is_some(),
                dislike_count = contexts.dislike_count,
                "Reranked recommendation pool",
            );
            assemble_ranked(ranked, candidates)
        }
        // A profile can exist without any recent strong likes (all 3s);
        // index order is the best signal available then.
        None => candidates.into_iter().map(|c| scored(c, None)).collect(),
    };

    let page_window: Vec<ScoredMovie> = ordered
        .into_iter()
        .skip(offset as usize)
        .take((k + 1) as usize)
        .collect();
    Ok(Page::from_overfetch(page_window, k, offset))
}

/// The discovery feed: reranked recommendations when a profile exists,
/// popularity fallback (null scores) otherwise.
pub async fn feed(
    pool: &DbPool,
    config: &EngineConfig,
    user_id: DbId,
    k: i64,
    offset: i64,
) -> AppResult<Page<FeedItem>> {
    ensure_user(pool, user_id).await?;

    // A missing profile is the one soft case: fall back to popularity.
    // Every other failure surfaces.
    match recommendations(pool, config, user_id, k, offset).await {
        Ok(page) => {
            return Ok(Page {
                items: page.items.into_iter().map(feed_item_from_scored).collect(),
                next_cursor: page.next_cursor,
                has_more: page.has_more,
            })
        }
        Err(AppError::Core(CoreError::ProfileNotFound { .. })) => {}
        Err(err) => return Err(err),
    }

    let rows = MovieRepo::popularity_queue(pool, user_id, false, k + 1, offset).await?;
    let page = Page::from_overfetch(rows, k, offset);
    Ok(Page {
        items: page
            .items
            .into_iter()
            .map(|m| FeedItem {
                id: m.id,
                title: m.title,
                release_date: m.release_date,
                genres: m.genres,
                distance: None,
                similarity: None,
                score: None,
                source: FeedSource::Popularity,
                poster_path: m.poster_path,
                backdrop_path: m.backdrop_path,
            })
            .collect(),
        next_cursor: page.next_cursor,
        has_more: page.has_more,
    })
}

fn feed_item_from_scored(movie: ScoredMovie) -> FeedItem {
    FeedItem {
        id: movie.id,
        title: movie.title,
        release_date: movie.release_date,
        genres: movie.genres,
        distance: Some(movie.distance),
        similarity: Some(movie.similarity),
        score: movie.score,
        source: FeedSource::Profile,
        poster_path: movie.poster_path,
        backdrop_path: movie.backdrop_path,
    }
}

/// How well a single movie matches a user's taste, on the 0..100 scale.
///
/// Soft cases (no profile yet, movie outside the index) yield `None`
/// rather than an error; unknown users and movies still fail hard.
pub async fn user_movie_match(
    pool: &DbPool,
    config: &EngineConfig,
    user_id: DbId,
    movie_id: DbId,
) -> AppResult<Option<i32>> {
    ensure_user(pool, user_id).await?;

    let movie = MovieRepo::find_by_id(pool, movie_id)
        .await?
        .ok_or(CoreError::MovieNotFound { id: movie_id })?;

    let Some(profile) = ProfileRepo::get(pool, user_id).await? else {
        return Ok(None);
    };
    let profile_embedding = profile
        .embedding_vec()
        .ok_or_else(|| CoreError::Internal("stored profile embedding is malformed".into()))?;

    let Some(movie_embedding) = EmbeddingRepo::find_for_movie(pool, movie_id).await? else {
        return Ok(None);
    };

    let distance = cosine_distance(&profile_embedding, &movie_embedding);

    let contexts = build_user_contexts(pool, config, user_id).await?;
    let score = match &contexts.like {
        Some(like_context) => {
            let candidate = candidate_features(
                movie.genres.as_deref(),
                movie.keywords.as_deref(),
                movie.runtime,
                movie.release_date,
                movie.original_language.as_deref(),
            );
            let dislike_distance = contexts
                .dislike_active()
                .then(|| {
                    contexts
                        .dislike_centroid
                        .as_ref()
                        .map(|c| cosine_distance(&movie_embedding, c))
                })
                .flatten();
            match_score(
                like_context,
                contexts.dislike.as_ref().filter(|_| dislike_distance.is_some()),
                &candidate,
                distance,
                dislike_distance,
                movie.vote_count,
                config.rank_params(),
            )
        }
        // No strong likes on record yet: similarity alone.
        None => (((1.0 - distance).clamp(0.0, 1.0) * 100.0).round() as i32).clamp(0, 100),
    };

    Ok(Some(score))
}

/// Fail with `UserNotFound` unless the user row exists.
pub(crate) async fn ensure_user(pool: &DbPool, user_id: DbId) -> AppResult<()> {
    if UserRepo::exists(pool, user_id).await? {
        Ok(())
    } else {
        Err(CoreError::UserNotFound { id: user_id }.into())
    }
}
