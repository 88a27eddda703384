use crate::types::DbId;

/// Domain-level failure taxonomy.
///
/// Repositories and the recommendation engine return these; the API layer
/// performs one central mapping to HTTP status codes and stable error
/// codes. Soft cases (e.g. `match` with no profile) are handled before an
/// error is ever constructed.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Movie {id} not found")]
    MovieNotFound { id: DbId },

    #[error("No movie matches title {title:?}")]
    MovieTitleNotFound { title: String },

    #[error("No more movies to rate for user {user_id}")]
    QueueExhausted { user_id: DbId },

    #[error("User {id} not found")]
    UserNotFound { id: DbId },

    #[error("No embedding for movie {movie_id}")]
    EmbeddingNotFound { movie_id: DbId },

    #[error("No taste profile for user {user_id}")]
    ProfileNotFound { user_id: DbId },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
