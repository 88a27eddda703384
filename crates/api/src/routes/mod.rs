pub mod health;

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{discovery, movies, ratings, users};
use crate::state::AppState;

/// Build the `/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /movies/lookup                         resolve a title to a movie id
/// /movies/{id}                           movie detail
/// /movies/{id}/similar                   anchor-mode similarity
///
/// /users                                 create user (POST)
/// /users/{id}                            user summary
/// /users/{id}/profile                    taste-profile stats
/// /users/{id}/ratings                    list ratings
/// /users/{id}/ratings/{movie_id}         upsert rating (PUT)
/// /users/{id}/rating-queue               popularity queue minus seen
/// /users/{id}/next                       next movie to rate
/// /users/{id}/recommendations            personalized recommendations
/// /users/{id}/feed                       recommendations or popularity fallback
/// /users/{id}/movies/{movie_id}/match    0..100 match score
/// ```
pub fn v1_routes() -> Router<AppState> {
    Router::new()
        .route("/movies/lookup", get(movies::lookup))
        .route("/movies/{id}", get(movies::detail))
        .route("/movies/{id}/similar", get(movies::similar_movies))
        .route("/users", post(users::create_user))
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}/profile", get(users::profile_stats))
        .route("/users/{id}/ratings", get(ratings::list_ratings))
        .route("/users/{id}/ratings/{movie_id}", put(ratings::put_rating))
        .route("/users/{id}/rating-queue", get(discovery::rating_queue))
        .route("/users/{id}/next", get(discovery::next_movie))
        .route("/users/{id}/recommendations", get(discovery::recommendations))
        .route("/users/{id}/feed", get(discovery::feed))
        .route(
            "/users/{id}/movies/{movie_id}/match",
            get(discovery::user_movie_match),
        )
}
