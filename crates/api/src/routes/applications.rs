use axum::routing::{get, post};
use axum::Router;

use crate::handlers::applications;
use crate::state::AppState;

/// Routes mounted at `/event-applications`.
///
/// ```text
/// GET  /mine                                      -> list_mine
/// POST /{event_id}/apply                          -> apply
/// GET  /{event_id}/applications                   -> list_for_event
/// POST /{event_id}/applications/{id}/approve      -> approve
/// POST /{event_id}/applications/{id}/reject       -> reject
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mine", get(applications::list_mine))
        .route("/{event_id}/apply", post(applications::apply))
        .route(
            "/{event_id}/applications",
            get(applications::list_for_event),
        )
        .route(
            "/{event_id}/applications/{id}/approve",
            post(applications::approve),
        )
        .route(
            "/{event_id}/applications/{id}/reject",
            post(applications::reject),
        )
}
