use axum::routing::{get, put};
use axum::Router;

use crate::handlers::artists;
use crate::state::AppState;

/// Routes mounted at `/artists`.
///
/// ```text
/// GET /         -> list_artists
/// PUT /me       -> update_my_profile
/// GET /{id}     -> get_artist
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(artists::list_artists))
        .route("/me", put(artists::update_my_profile))
        .route("/{id}", get(artists::get_artist))
}
