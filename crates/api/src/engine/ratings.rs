//! The rating mutation: one transaction covering the rating upsert and
//! the profile rebuild, so the profile is consistent on the primary the
//! moment the PUT returns.

use tastekid_core::error::CoreError;
use tastekid_core::profile::build_profile;
use tastekid_core::types::DbId;
use tastekid_db::models::rating::RatingStatus;
use tastekid_db::repositories::{MovieRepo, ProfileRepo, RatingRepo, UserRepo};
use tastekid_db::DbPool;

use crate::config::EngineConfig;
use crate::error::AppResult;

/// Apply a rating write and synchronously rebuild the user's taste
/// profile.
///
/// Transaction shape: lock the user row (serializing concurrent writers
/// for the same user), upsert the rating, reload contributor embeddings,
/// then upsert or delete the profile row. Nothing is durable until all of
/// it is. Mutations are never retried internally; an identical PUT is
/// safe to replay from the client.
pub async fn apply_rating(
    pool: &DbPool,
    config: &EngineConfig,
    user_id: DbId,
    movie_id: DbId,
    rating: Option<i16>,
    status: RatingStatus,
) -> AppResult<()> {
    if !MovieRepo::exists(pool, movie_id).await? {
        return Err(CoreError::MovieNotFound { id: movie_id }.into());
    }

    let mut tx = pool.begin().await?;

    if !UserRepo::lock_for_update(&mut tx, user_id).await? {
        return Err(CoreError::UserNotFound { id: user_id }.into());
    }

    RatingRepo::upsert(&mut tx, user_id, movie_id, rating, status).await?;

    let contributors = RatingRepo::contributor_embeddings(&mut tx, user_id).await?;
    match build_profile(&contributors, config.neutral_rating_weight) {
        Some(profile) => {
            ProfileRepo::upsert(&mut tx, user_id, &profile.embedding, profile.num_ratings).await?;
            tracing::info!(
                user_id,
                movie_id,
                num_ratings = profile.num_ratings,
                "Rating applied, profile rebuilt",
            );
        }
        None => {
            ProfileRepo::delete(&mut tx, user_id).await?;
            tracing::info!(user_id, movie_id, "Rating applied, no contributors remain");
        }
    }

    tx.commit().await?;
    Ok(())
}
