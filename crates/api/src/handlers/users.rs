//! Handlers for user creation, summaries, and profile stats.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tastekid_core::error::CoreError;
use tastekid_core::types::{DbId, Timestamp};
use tastekid_core::vector::l2_norm;
use tastekid_db::repositories::{ProfileRepo, RatingRepo, UserRepo};

use crate::engine::retry;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for POST /v1/users.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub display_name: Option<String>,
}

/// POST /v1/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    let user_id = UserRepo::create(&state.pool, input.display_name.as_deref()).await?;

    let summary = UserRepo::summary(&state.pool, user_id)
        .await?
        .ok_or_else(|| CoreError::Internal("freshly created user row is missing".into()))?;

    tracing::info!(user_id, "User created");

    Ok((StatusCode::CREATED, Json(DataResponse::single(summary))))
}

/// GET /v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let summary = retry::read_with_retry(|| async {
        UserRepo::summary(&state.pool, user_id).await.map_err(Into::into)
    })
    .await?
    .ok_or(CoreError::UserNotFound { id: user_id })?;

    Ok(Json(DataResponse::single(summary)))
}

/// Profile bookkeeping exposed to the UI.
#[derive(Debug, Serialize)]
pub struct ProfileStatsResponse {
    pub user_id: DbId,
    /// Ratings currently contributing to the taste vector.
    pub num_ratings: i32,
    /// Watched ratings at or above the like threshold.
    pub num_liked: i64,
    /// L2 norm of the stored taste vector (unit by construction).
    pub embedding_norm: Option<f64>,
    pub updated_at: Option<Timestamp>,
}

/// GET /v1/users/{id}/profile
pub async fn profile_stats(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !UserRepo::exists(&state.pool, user_id).await? {
        return Err(CoreError::UserNotFound { id: user_id }.into());
    }

    let profile = ProfileRepo::get(&state.pool, user_id).await?;
    let num_liked = RatingRepo::count_liked(&state.pool, user_id).await?;

    let stats = match profile {
        Some(row) => ProfileStatsResponse {
            user_id,
            num_ratings: row.num_ratings,
            num_liked,
            embedding_norm: row.embedding_vec().map(|v| l2_norm(&v)),
            updated_at: Some(row.updated_at),
        },
        None => ProfileStatsResponse {
            user_id,
            num_ratings: 0,
            num_liked,
            embedding_norm: None,
            updated_at: None,
        },
    };

    Ok(Json(DataResponse::single(stats)))
}
