use axum::routing::{get, post};
use axum::Router;

use crate::handlers::disputes;
use crate::state::AppState;

/// Routes mounted at `/disputes`.
///
/// ```text
/// POST /bookings/{id}/report-non-delivery -> report_non_delivery
/// GET  /mine                              -> list_mine
/// GET  /{id}                              -> get_dispute
/// POST /{id}/respond                      -> respond
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/bookings/{id}/report-non-delivery",
            post(disputes::report_non_delivery),
        )
        .route("/mine", get(disputes::list_mine))
        .route("/{id}", get(disputes::get_dispute))
        .route("/{id}/respond", post(disputes::respond))
}
