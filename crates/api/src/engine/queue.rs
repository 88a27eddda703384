//! Popularity queue: the rating queue page and the single `next` pick.

use tastekid_core::pagination::Page;
use tastekid_core::types::DbId;
use tastekid_db::models::movie::PopularityRow;
use tastekid_db::repositories::{MovieRepo, ProfileRepo};
use tastekid_db::DbPool;

use crate::engine::recommend::ensure_user;
use crate::error::AppResult;

/// Page through unrated movies by popularity.
pub async fn rating_queue(
    pool: &DbPool,
    user_id: DbId,
    k: i64,
    offset: i64,
) -> AppResult<Page<PopularityRow>> {
    ensure_user(pool, user_id).await?;

    let rows = MovieRepo::popularity_queue(pool, user_id, false, k + 1, offset).await?;
    Ok(Page::from_overfetch(rows, k, offset))
}

/// Pop the next movie to rate: the head of the popularity queue minus
/// everything already seen. Once the user has a taste profile, only
/// indexable movies are offered so every new rating can feed it.
pub async fn next_movie(pool: &DbPool, user_id: DbId) -> AppResult<Option<PopularityRow>> {
    ensure_user(pool, user_id).await?;

    let require_embedding = ProfileRepo::exists(pool, user_id).await?;
    let rows = MovieRepo::popularity_queue(pool, user_id, require_embedding, 1, 0).await?;
    Ok(rows.into_iter().next())
}
