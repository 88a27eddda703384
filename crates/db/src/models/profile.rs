//! User taste-profile rows.

use sqlx::FromRow;
use tastekid_core::types::{DbId, Timestamp};
use tastekid_core::vector::parse_vector_text;

/// A row from `user_profiles`. The embedding arrives as pgvector text and
/// is decoded on demand.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub user_id: DbId,
    pub embedding: String,
    pub num_ratings: i32,
    pub updated_at: Timestamp,
}

impl ProfileRow {
    /// Decode the stored taste vector.
    pub fn embedding_vec(&self) -> Option<Vec<f32>> {
        parse_vector_text(&self.embedding)
    }
}
