//! Handlers for the personalized read surface: recommendations, feed,
//! rating queue, next pick, and the match score.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;
use tastekid_core::error::CoreError;
use tastekid_core::pagination::{decode_cursor, validate_page_size};
use tastekid_core::types::DbId;
use tastekid_db::models::movie::PopularityRow;

use crate::engine::{queue, recommend, retry, FeedItem, FeedSource, ScoredMovie};
use crate::error::AppResult;
use crate::query::PageParams;
use crate::response::{DataResponse, PageMeta};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

/// One recommendation as returned to clients.
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub id: DbId,
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub genres: Option<String>,
    pub distance: f64,
    pub similarity: f64,
    pub score: Option<f64>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
}

/// GET /v1/users/{id}/recommendations?k=&cursor=
///
/// Fails with `PROFILE_NOT_FOUND` until the user has contributing
/// ratings; the feed endpoint is the soft-fallback variant.
pub async fn recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let k = validate_page_size(params.k)?;
    let offset = decode_cursor(params.cursor.as_deref())?;

    let page = retry::read_with_retry(|| async {
        recommend::recommendations(&state.pool, &state.engine, user_id, k, offset).await
    })
    .await?;

    let meta = PageMeta::from(&page);
    let items: Vec<RecommendationResponse> = page
        .items
        .into_iter()
        .map(|m| recommendation_response(&state, m))
        .collect();

    tracing::debug!(user_id, k, offset, results = items.len(), "Recommendations served");

    Ok(Json(DataResponse::page(items, meta)))
}

fn recommendation_response(state: &AppState, movie: ScoredMovie) -> RecommendationResponse {
    let poster_url = state.engine.poster_url(movie.poster_path.as_deref());
    let backdrop_url = state.engine.backdrop_url(movie.backdrop_path.as_deref());
    RecommendationResponse {
        id: movie.id,
        title: movie.title,
        release_date: movie.release_date,
        genres: movie.genres,
        distance: movie.distance,
        similarity: movie.similarity,
        score: movie.score,
        poster_url,
        backdrop_url,
    }
}

// ---------------------------------------------------------------------------
// Feed
// ---------------------------------------------------------------------------

/// One feed entry as returned to clients. `score` is null for the
/// popularity fallback.
#[derive(Debug, Serialize)]
pub struct FeedItemResponse {
    pub id: DbId,
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub genres: Option<String>,
    pub distance: Option<f64>,
    pub similarity: Option<f64>,
    pub score: Option<f64>,
    pub source: FeedSource,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
}

/// GET /v1/users/{id}/feed?k=&cursor=
pub async fn feed(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let k = validate_page_size(params.k)?;
    let offset = decode_cursor(params.cursor.as_deref())?;

    let page = retry::read_with_retry(|| async {
        recommend::feed(&state.pool, &state.engine, user_id, k, offset).await
    })
    .await?;

    let meta = PageMeta::from(&page);
    let items: Vec<FeedItemResponse> = page
        .items
        .into_iter()
        .map(|item| feed_response(&state, item))
        .collect();

    Ok(Json(DataResponse::page(items, meta)))
}

fn feed_response(state: &AppState, item: FeedItem) -> FeedItemResponse {
    let poster_url = state.engine.poster_url(item.poster_path.as_deref());
    let backdrop_url = state.engine.backdrop_url(item.backdrop_path.as_deref());
    FeedItemResponse {
        id: item.id,
        title: item.title,
        release_date: item.release_date,
        genres: item.genres,
        distance: item.distance,
        similarity: item.similarity,
        score: item.score,
        source: item.source,
        poster_url,
        backdrop_url,
    }
}

// ---------------------------------------------------------------------------
// Rating queue + next
// ---------------------------------------------------------------------------

/// One rating-queue entry as returned to clients.
#[derive(Debug, Serialize)]
pub struct QueueItemResponse {
    pub id: DbId,
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub genres: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
}

/// GET /v1/users/{id}/rating-queue?k=&cursor=
pub async fn rating_queue(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let k = validate_page_size(params.k)?;
    let offset = decode_cursor(params.cursor.as_deref())?;

    let page = retry::read_with_retry(|| async {
        queue::rating_queue(&state.pool, user_id, k, offset).await
    })
    .await?;

    let meta = PageMeta::from(&page);
    let items: Vec<QueueItemResponse> = page
        .items
        .into_iter()
        .map(|row| queue_response(&state, row))
        .collect();

    Ok(Json(DataResponse::page(items, meta)))
}

/// GET /v1/users/{id}/next
///
/// Pops the head of the popularity queue; 404s once the catalog is
/// exhausted for this user.
pub async fn next_movie(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let movie = retry::read_with_retry(|| async {
        queue::next_movie(&state.pool, user_id).await
    })
    .await?
    .ok_or(CoreError::QueueExhausted { user_id })?;

    Ok(Json(DataResponse::single(queue_response(&state, movie))))
}

fn queue_response(state: &AppState, row: PopularityRow) -> QueueItemResponse {
    let poster_url = state.engine.poster_url(row.poster_path.as_deref());
    let backdrop_url = state.engine.backdrop_url(row.backdrop_path.as_deref());
    QueueItemResponse {
        id: row.id,
        title: row.title,
        release_date: row.release_date,
        genres: row.genres,
        poster_url,
        backdrop_url,
    }
}

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// GET /v1/users/{id}/movies/{movie_id}/match
///
/// `score` is null for the soft cases (no profile yet, movie outside the
/// index); unknown users and movies fail with their 404 codes.
pub async fn user_movie_match(
    State(state): State<AppState>,
    Path((user_id, movie_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let score = retry::read_with_retry(|| async {
        recommend::user_movie_match(&state.pool, &state.engine, user_id, movie_id).await
    })
    .await?;

    Ok(Json(DataResponse::single(json!({ "score": score }))))
}
