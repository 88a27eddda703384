//! Repository for user rows.

use sqlx::{PgConnection, PgPool};
use tastekid_core::types::DbId;

use crate::models::user::UserSummaryRow;

/// Provides user CRUD and the per-user write lock.
pub struct UserRepo;

impl UserRepo {
    /// Create a user, returning the generated id.
    pub async fn create(
        pool: &PgPool,
        display_name: Option<&str>,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar("INSERT INTO users (display_name) VALUES ($1) RETURNING id")
            .bind(display_name)
            .fetch_one(pool)
            .await
    }

    /// Check whether a user exists.
    pub async fn exists(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Acquire the per-user row lock that serializes concurrent rating
    /// mutations for the same user. Returns false when the user does not
    /// exist. Must run first inside the mutation transaction.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM users WHERE id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(conn)
                .await?;
        Ok(row.is_some())
    }

    /// User summary with profile bookkeeping folded in.
    pub async fn summary(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UserSummaryRow>, sqlx::Error> {
        sqlx::query_as::<_, UserSummaryRow>(
            "SELECT u.id, \
                    u.display_name, \
                    COALESCE(p.num_ratings, 0) AS num_ratings, \
                    p.updated_at AS profile_updated_at \
             FROM users u \
             LEFT JOIN user_profiles p ON p.user_id = u.id \
             WHERE u.id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }
}
