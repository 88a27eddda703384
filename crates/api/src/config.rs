//! Server and engine configuration.
//!
//! Both structs are loaded once at startup from environment variables and
//! held behind `Arc` in [`crate::state::AppState`]; nothing mutates them
//! afterwards.

use tastekid_core::profile::DEFAULT_NEUTRAL_RATING_WEIGHT;
use tastekid_core::rerank::{
    RankParams, DEFAULT_DISLIKE_MIN_COUNT, DEFAULT_DISLIKE_WEIGHT,
    DEFAULT_MAX_FETCH_CANDIDATES, DEFAULT_RERANK_FETCH_MULTIPLIER, DEFAULT_SIM_CANDIDATES_K,
    DEFAULT_SIM_TOP_N, DEFAULT_VOTE_COUNT_CAP,
};
use tastekid_core::scoring::{
    DEFAULT_MAX_SCORING_GENRES, DEFAULT_MAX_SCORING_KEYWORDS, DEFAULT_SCORING_CONTEXT_LIMIT,
};

/// HTTP server configuration.
///
/// All fields have defaults suitable for local development; override via
/// environment variables in production.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// Per-request deadline in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
        }
    }
}

/// Recommendation-engine knobs, all env-overridable and immutable after
/// startup. Defaults are the core crate's published constants.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Profile weight for a neutral (rating = 3) contributor.
    pub neutral_rating_weight: f64,
    /// Strength of the dislike penalty on final scores.
    pub dislike_weight: f64,
    /// Minimum recent dislikes before the penalty activates.
    pub dislike_min_count: usize,
    /// How many recent ratings feed the scoring contexts.
    pub scoring_context_limit: i64,
    /// Over-fetch multiplier for reranking headroom.
    pub rerank_fetch_multiplier: i64,
    /// Hard ceiling on candidates fetched from the vector index.
    pub max_fetch_candidates: i64,
    /// Genres kept per scoring context.
    pub max_scoring_genres: usize,
    /// Style keywords kept per scoring context.
    pub max_scoring_keywords: usize,
    /// Candidate floor for anchor-mode (similar) queries.
    pub sim_candidates_k: i64,
    /// Default page size for `similar` when `k` is omitted.
    pub sim_top_n: i64,
    /// When false, `similar` returns raw index order with null scores.
    pub sim_rerank_enabled: bool,
    /// Vote count treated as maximal by the popularity feature.
    pub vote_count_cap: i64,
    /// TMDB image CDN base for poster/backdrop URL assembly.
    pub tmdb_image_base_url: String,
    pub tmdb_poster_size: String,
    pub tmdb_backdrop_size: String,
}

impl EngineConfig {
    /// Load engine knobs from environment variables with defaults.
    pub fn from_env() -> Self {
        Self {
            neutral_rating_weight: env_parse("NEUTRAL_RATING_WEIGHT", DEFAULT_NEUTRAL_RATING_WEIGHT),
            dislike_weight: env_parse("DISLIKE_WEIGHT", DEFAULT_DISLIKE_WEIGHT),
            dislike_min_count: env_parse("DISLIKE_MIN_COUNT", DEFAULT_DISLIKE_MIN_COUNT),
            scoring_context_limit: env_parse("SCORING_CONTEXT_LIMIT", DEFAULT_SCORING_CONTEXT_LIMIT),
            rerank_fetch_multiplier: env_parse(
                "RERANK_FETCH_MULTIPLIER",
                DEFAULT_RERANK_FETCH_MULTIPLIER,
            ),
            max_fetch_candidates: env_parse("MAX_FETCH_CANDIDATES", DEFAULT_MAX_FETCH_CANDIDATES),
            max_scoring_genres: env_parse("MAX_SCORING_GENRES", DEFAULT_MAX_SCORING_GENRES),
            max_scoring_keywords: env_parse("MAX_SCORING_KEYWORDS", DEFAULT_MAX_SCORING_KEYWORDS),
            sim_candidates_k: env_parse("SIM_CANDIDATES_K", DEFAULT_SIM_CANDIDATES_K),
            sim_top_n: env_parse("SIM_TOP_N", DEFAULT_SIM_TOP_N),
            sim_rerank_enabled: env_bool("SIM_RERANK_ENABLED", true),
            vote_count_cap: env_parse("VOTE_COUNT_CAP", DEFAULT_VOTE_COUNT_CAP),
            tmdb_image_base_url: std::env::var("TMDB_IMAGE_BASE_URL")
                .unwrap_or_else(|_| "https://image.tmdb.org/t/p/".into()),
            tmdb_poster_size: std::env::var("TMDB_POSTER_SIZE").unwrap_or_else(|_| "w342".into()),
            tmdb_backdrop_size: std::env::var("TMDB_BACKDROP_SIZE")
                .unwrap_or_else(|_| "w780".into()),
        }
    }

    /// The reranker tunables derived from this configuration.
    pub fn rank_params(&self) -> RankParams {
        RankParams {
            dislike_weight: self.dislike_weight,
            vote_count_cap: self.vote_count_cap,
        }
    }

    /// Assemble a poster CDN URL from a stored path.
    pub fn poster_url(&self, poster_path: Option<&str>) -> Option<String> {
        poster_path.map(|p| format!("{}{}{}", self.tmdb_image_base_url, self.tmdb_poster_size, p))
    }

    /// Assemble a backdrop CDN URL from a stored path.
    pub fn backdrop_url(&self, backdrop_path: Option<&str>) -> Option<String> {
        backdrop_path
            .map(|p| format!("{}{}{}", self.tmdb_image_base_url, self.tmdb_backdrop_size, p))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            neutral_rating_weight: DEFAULT_NEUTRAL_RATING_WEIGHT,
            dislike_weight: DEFAULT_DISLIKE_WEIGHT,
            dislike_min_count: DEFAULT_DISLIKE_MIN_COUNT,
            scoring_context_limit: DEFAULT_SCORING_CONTEXT_LIMIT,
            rerank_fetch_multiplier: DEFAULT_RERANK_FETCH_MULTIPLIER,
            max_fetch_candidates: DEFAULT_MAX_FETCH_CANDIDATES,
            max_scoring_genres: DEFAULT_MAX_SCORING_GENRES,
            max_scoring_keywords: DEFAULT_MAX_SCORING_KEYWORDS,
            sim_candidates_k: DEFAULT_SIM_CANDIDATES_K,
            sim_top_n: DEFAULT_SIM_TOP_N,
            sim_rerank_enabled: true,
            vote_count_cap: DEFAULT_VOTE_COUNT_CAP,
            tmdb_image_base_url: "https://image.tmdb.org/t/p/".into(),
            tmdb_poster_size: "w342".into(),
            tmdb_backdrop_size: "w780".into(),
        }
    }
}

/// Parse an env var, falling back to `default` when unset and panicking on
/// malformed values: misconfiguration should fail at startup, not at
/// request time.
fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a valid value, got {raw:?}")),
        Err(_) => default,
    }
}

/// Parse a boolean env var ("1", "true", "yes", "y", "on" are truthy).
fn env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(raw) => matches!(
            raw.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "y" | "on"
        ),
        Err(_) => default,
    }
}
