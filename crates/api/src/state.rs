use std::sync::Arc;

use crate::config::{EngineConfig, ServerConfig};

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable: the pool is internally reference-counted and the
/// configuration structs sit behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: tastekid_db::DbPool,
    /// HTTP server configuration.
    pub config: Arc<ServerConfig>,
    /// Recommendation-engine knobs.
    pub engine: Arc<EngineConfig>,
}
