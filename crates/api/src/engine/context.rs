//! Per-user scoring context assembly.
//!
//! Loads the user's most recent rated titles, splits them into like and
//! dislike windows, aggregates each side into a feature bundle, and (when
//! enough dislikes exist) derives the dislike embedding centroid.

use tastekid_core::profile::build_dislike_centroid;
use tastekid_core::rerank::ScoringContext;
use tastekid_core::scoring::{aggregate_context, split_likes_dislikes, ScoringRow};
use tastekid_core::types::DbId;
use tastekid_db::repositories::{EmbeddingRepo, RatingRepo};
use tastekid_db::DbPool;

use crate::config::EngineConfig;
use crate::error::AppResult;

/// Everything the reranker needs to know about a user's recent taste.
#[derive(Debug, Default)]
pub struct UserContexts {
    pub like: Option<ScoringContext>,
    pub dislike: Option<ScoringContext>,
    /// Unit-norm centroid of recent dislike embeddings; present only when
    /// the dislike signal is strong enough to act on.
    pub dislike_centroid: Option<Vec<f32>>,
    pub dislike_count: usize,
}

impl UserContexts {
    /// Whether the dislike penalty applies: enough recent dislikes AND a
    /// usable context AND a usable centroid.
    pub fn dislike_active(&self) -> bool {
        self.dislike.is_some() && self.dislike_centroid.is_some()
    }
}

/// Build the like/dislike scoring contexts from the user's most recent
/// rated titles.
pub async fn build_user_contexts(
    pool: &DbPool,
    config: &EngineConfig,
    user_id: DbId,
) -> AppResult<UserContexts> {
    let rows: Vec<ScoringRow> =
        RatingRepo::recent_scoring_rows(pool, user_id, config.scoring_context_limit)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

    let (likes, dislikes) = split_likes_dislikes(&rows);
    let dislike_count = dislikes.len();

    let like = aggregate_context(&likes, config.max_scoring_genres, config.max_scoring_keywords);
    let dislike = aggregate_context(
        &dislikes,
        config.max_scoring_genres,
        config.max_scoring_keywords,
    );

    let dislike_centroid = if dislike_count >= config.dislike_min_count {
        let dislike_ids: Vec<DbId> = dislikes.iter().map(|r| r.movie_id).collect();
        let embeddings = EmbeddingRepo::for_movies(pool, &dislike_ids).await?;

        let rated: Vec<(Vec<f32>, Option<i16>)> = embeddings
            .into_iter()
            .map(|(movie_id, embedding)| {
                let rating = dislikes
                    .iter()
                    .find(|r| r.movie_id == movie_id)
                    .and_then(|r| r.rating);
                (embedding, rating)
            })
            .collect();

        build_dislike_centroid(&rated)
    } else {
        None
    };

    Ok(UserContexts {
        like,
        dislike,
        dislike_centroid,
        dislike_count,
    })
}
