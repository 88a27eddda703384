//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?k=&cursor=`).
///
/// `k` is validated (1..100) and `cursor` decoded in the handler via the
/// core pagination helpers; invalid values surface as `INVALID_ARGUMENT`.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub k: Option<i64>,
    pub cursor: Option<String>,
}

/// Query parameters for the ratings listing, pagination plus optional
/// filter dimensions.
#[derive(Debug, Deserialize)]
pub struct RatingListParams {
    pub k: Option<i64>,
    pub cursor: Option<String>,
    pub status: Option<String>,
    pub rating_min: Option<i16>,
    pub rating_max: Option<i16>,
    pub since_days: Option<i32>,
}

/// Query parameters for `GET /v1/movies/lookup`.
#[derive(Debug, Deserialize)]
pub struct LookupParams {
    pub title: String,
}
