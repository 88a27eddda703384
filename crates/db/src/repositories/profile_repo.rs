//! Repository for user taste profiles.
//!
//! The profile row is rewritten inside the same transaction as the rating
//! mutation that invalidated it; reads are lock-free.

use sqlx::{PgConnection, PgPool};
use tastekid_core::types::DbId;
use tastekid_core::vector::to_vector_literal;

use crate::models::profile::ProfileRow;

/// Provides taste-profile CRUD.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Fetch a user's profile row, embedding included (as pgvector text).
    pub async fn get(pool: &PgPool, user_id: DbId) -> Result<Option<ProfileRow>, sqlx::Error> {
        sqlx::query_as::<_, ProfileRow>(
            "SELECT user_id, embedding::text AS embedding, num_ratings, updated_at \
             FROM user_profiles \
             WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Check whether a profile row exists.
    pub async fn exists(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM user_profiles WHERE user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Write the freshly rebuilt taste vector. Transaction-scoped.
    pub async fn upsert(
        conn: &mut PgConnection,
        user_id: DbId,
        embedding: &[f32],
        num_ratings: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_profiles (user_id, embedding, num_ratings, updated_at) \
             VALUES ($1, $2::vector, $3, now()) \
             ON CONFLICT (user_id) \
             DO UPDATE SET embedding = EXCLUDED.embedding, \
                           num_ratings = EXCLUDED.num_ratings, \
                           updated_at = now()",
        )
        .bind(user_id)
        .bind(to_vector_literal(embedding))
        .bind(num_ratings)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Remove the profile row once its last contributor is gone.
    /// Transaction-scoped.
    pub async fn delete(conn: &mut PgConnection, user_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM user_profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(conn)
            .await?;
        Ok(())
    }
}
