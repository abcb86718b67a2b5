use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reviews;
use crate::state::AppState;

/// Routes mounted at `/reviews`.
///
/// ```text
/// POST /bookings/{id}                 -> create_review
/// GET  /users/{user_id}               -> list_for_user
/// GET  /artists/{artist_id}/summary   -> artist_summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bookings/{id}", post(reviews::create_review))
        .route("/users/{user_id}", get(reviews::list_for_user))
        .route(
            "/artists/{artist_id}/summary",
            get(reviews::artist_summary),
        )
}
