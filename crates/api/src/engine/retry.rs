//! Single-shot retry for read paths.
//!
//! Read operations retry once on transient store errors (connection
//! drops, pool exhaustion). Mutations never retry internally; the rating
//! PUT is idempotent so clients retry those.

use std::future::Future;

use crate::error::AppResult;

/// Run a read operation, retrying exactly once if the first attempt
/// failed with a transient error.
pub async fn read_with_retry<T, F, Fut>(op: F) -> AppResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    match op().await {
        Err(err) if err.is_transient() => {
            tracing::warn!(error = %err, "Transient store error, retrying read once");
            op().await
        }
        result => result,
    }
}
