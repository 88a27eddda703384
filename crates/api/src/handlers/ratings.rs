//! Handlers for the rating mutation and the ratings listing.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tastekid_core::error::CoreError;
use tastekid_core::pagination::{decode_cursor, validate_page_size, Page};
use tastekid_core::types::DbId;
use tastekid_db::models::rating::{RatedMovieRow, RatingFilter, RatingStatus};
use tastekid_db::repositories::RatingRepo;

use crate::engine::{ratings::apply_rating, recommend::ensure_user, retry};
use crate::error::AppResult;
use crate::query::RatingListParams;
use crate::response::{DataResponse, PageMeta};
use crate::state::AppState;

/// Request body for PUT /v1/users/{id}/ratings/{movie_id}.
#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub rating: Option<i16>,
    pub status: Option<String>,
}

/// PUT /v1/users/{id}/ratings/{movie_id}
///
/// Body normalization: at least one of `rating` / `status` is required;
/// an omitted status defaults to `watched` when a rating is present and
/// `unwatched` otherwise; an `unwatched` write nulls the rating. The
/// profile rebuild happens inside the same transaction, so a subsequent
/// read observes the new taste vector.
pub async fn put_rating(
    State(state): State<AppState>,
    Path((user_id, movie_id)): Path<(DbId, DbId)>,
    Json(input): Json<RatingRequest>,
) -> AppResult<impl IntoResponse> {
    let (rating, status) = normalize_rating_input(&input)?;

    apply_rating(&state.pool, &state.engine, user_id, movie_id, rating, status).await?;

    Ok(Json(DataResponse::single(json!({ "status": "ok" }))))
}

/// Validate and normalize the rating body.
fn normalize_rating_input(
    input: &RatingRequest,
) -> Result<(Option<i16>, RatingStatus), CoreError> {
    if input.rating.is_none() && input.status.is_none() {
        return Err(CoreError::InvalidArgument(
            "rating or status is required".into(),
        ));
    }

    if let Some(rating) = input.rating {
        if !(0..=5).contains(&rating) {
            return Err(CoreError::InvalidArgument(format!(
                "rating must be between 0 and 5, got {rating}"
            )));
        }
    }

    let status = match input.status.as_deref() {
        Some(raw) => RatingStatus::parse(raw).ok_or_else(|| {
            CoreError::InvalidArgument(format!("status must be watched or unwatched, got {raw:?}"))
        })?,
        None => {
            if input.rating.is_some() {
                RatingStatus::Watched
            } else {
                RatingStatus::Unwatched
            }
        }
    };

    // A skipped/hidden title carries no rating.
    let rating = match status {
        RatingStatus::Watched => input.rating,
        RatingStatus::Unwatched => None,
    };

    Ok((rating, status))
}

/// One rated movie as returned to clients.
#[derive(Debug, Serialize)]
pub struct RatedMovieResponse {
    pub id: DbId,
    pub title: Option<String>,
    pub rating: Option<i16>,
    pub status: String,
    pub updated_at: tastekid_core::types::Timestamp,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
}

/// GET /v1/users/{id}/ratings?k=&cursor=&status=&rating_min=&rating_max=&since_days=
pub async fn list_ratings(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(params): Query<RatingListParams>,
) -> AppResult<impl IntoResponse> {
    let k = validate_page_size(params.k)?;
    let offset = decode_cursor(params.cursor.as_deref())?;
    let filter = build_filter(&params)?;

    ensure_user(&state.pool, user_id).await?;

    let rows = retry::read_with_retry(|| async {
        RatingRepo::list_for_user(&state.pool, user_id, &filter, k + 1, offset)
            .await
            .map_err(Into::into)
    })
    .await?;

    let page = Page::from_overfetch(rows, k, offset);
    let meta = PageMeta::from(&page);
    let items: Vec<RatedMovieResponse> = page
        .items
        .into_iter()
        .map(|row| rated_response(&state, row))
        .collect();

    Ok(Json(DataResponse::page(items, meta)))
}

fn build_filter(params: &RatingListParams) -> Result<RatingFilter, CoreError> {
    let status = params
        .status
        .as_deref()
        .map(|raw| {
            RatingStatus::parse(raw).ok_or_else(|| {
                CoreError::InvalidArgument(format!(
                    "status must be watched or unwatched, got {raw:?}"
                ))
            })
        })
        .transpose()?;

    Ok(RatingFilter {
        status,
        rating_min: params.rating_min,
        rating_max: params.rating_max,
        since_days: params.since_days,
    })
}

fn rated_response(state: &AppState, row: RatedMovieRow) -> RatedMovieResponse {
    let poster_url = state.engine.poster_url(row.poster_path.as_deref());
    let backdrop_url = state.engine.backdrop_url(row.backdrop_path.as_deref());
    RatedMovieResponse {
        id: row.id,
        title: row.title,
        rating: row.rating,
        status: row.status,
        updated_at: row.updated_at,
        poster_url,
        backdrop_url,
    }
}
