//! User summaries.

use serde::Serialize;
use sqlx::FromRow;
use tastekid_core::types::{DbId, Timestamp};

/// User summary joined with profile bookkeeping.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSummaryRow {
    pub id: DbId,
    pub display_name: Option<String>,
    pub num_ratings: i32,
    pub profile_updated_at: Option<Timestamp>,
}
