//! Handlers for movie lookup, detail, and anchor-mode similarity.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;
use tastekid_core::error::CoreError;
use tastekid_core::pagination::{decode_cursor, validate_page_size};
use tastekid_core::types::DbId;
use tastekid_db::repositories::MovieRepo;

use crate::engine::{retry, similar::similar, ScoredMovie};
use crate::error::AppResult;
use crate::query::{LookupParams, PageParams};
use crate::response::{DataResponse, PageMeta};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// GET /v1/movies/lookup?title=
///
/// Resolve a free-text title to a single movie id. Exact match wins over
/// prefix, prefix over substring.
pub async fn lookup(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> AppResult<impl IntoResponse> {
    let title = params.title.trim();
    if title.is_empty() {
        return Err(CoreError::InvalidArgument("title must not be empty".into()).into());
    }

    let hit = retry::read_with_retry(|| async {
        MovieRepo::lookup_by_title(&state.pool, title)
            .await
            .map_err(Into::into)
    })
    .await?
    .ok_or_else(|| CoreError::MovieTitleNotFound {
        title: title.to_string(),
    })?;

    Ok(Json(DataResponse::single(hit)))
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

/// Movie detail payload with assembled image URLs.
#[derive(Debug, Serialize)]
pub struct MovieDetailResponse {
    pub id: DbId,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub runtime: Option<i32>,
    pub original_language: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub genres: Option<String>,
    pub keywords: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: i64,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
}

/// GET /v1/movies/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(movie_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let movie = retry::read_with_retry(|| async {
        MovieRepo::find_by_id(&state.pool, movie_id)
            .await
            .map_err(Into::into)
    })
    .await?
    .ok_or(CoreError::MovieNotFound { id: movie_id })?;

    let poster_url = state.engine.poster_url(movie.poster_path.as_deref());
    let backdrop_url = state.engine.backdrop_url(movie.backdrop_path.as_deref());

    Ok(Json(DataResponse::single(MovieDetailResponse {
        id: movie.id,
        title: movie.title,
        original_title: movie.original_title,
        release_date: movie.release_date,
        runtime: movie.runtime,
        original_language: movie.original_language,
        overview: movie.overview,
        tagline: movie.tagline,
        genres: movie.genres,
        keywords: movie.keywords,
        vote_average: movie.vote_average,
        vote_count: movie.vote_count,
        poster_path: movie.poster_path,
        backdrop_path: movie.backdrop_path,
        poster_url,
        backdrop_url,
    })))
}

// ---------------------------------------------------------------------------
// Similar
// ---------------------------------------------------------------------------

/// One similarity result as returned to clients.
#[derive(Debug, Serialize)]
pub struct SimilarMovieResponse {
    pub id: DbId,
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub genres: Option<String>,
    pub distance: f64,
    pub score: Option<f64>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
}

/// GET /v1/movies/{id}/similar?k=&cursor=
///
/// Returns `EMBEDDING_NOT_FOUND` (404) when the anchor exists but was
/// never indexed.
pub async fn similar_movies(
    State(state): State<AppState>,
    Path(movie_id): Path<DbId>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let k = validate_page_size(params.k.or(Some(state.engine.sim_top_n)))?;
    let offset = decode_cursor(params.cursor.as_deref())?;

    let page = retry::read_with_retry(|| async {
        similar(&state.pool, &state.engine, movie_id, k, offset).await
    })
    .await?;

    let meta = PageMeta::from(&page);
    let items: Vec<SimilarMovieResponse> = page
        .items
        .into_iter()
        .map(|m| similar_response(&state, m))
        .collect();

    tracing::debug!(movie_id, k, offset, results = items.len(), "Similar movies served");

    Ok(Json(DataResponse::page(items, meta)))
}

fn similar_response(state: &AppState, movie: ScoredMovie) -> SimilarMovieResponse {
    let poster_url = state.engine.poster_url(movie.poster_path.as_deref());
    let backdrop_url = state.engine.backdrop_url(movie.backdrop_path.as_deref());
    SimilarMovieResponse {
        id: movie.id,
        title: movie.title,
        release_date: movie.release_date,
        genres: movie.genres,
        distance: movie.distance,
        score: movie.score,
        poster_url,
        backdrop_url,
    }
}
