/// All database primary keys are PostgreSQL BIGSERIAL / BIGINT.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Dimensionality of movie and profile embeddings. The `vector(768)`
/// columns and the HNSW index enforce the same value; changing it requires
/// re-running the ingestion pipeline and rebuilding every profile.
pub const EMBEDDING_DIMENSION: usize = 768;
