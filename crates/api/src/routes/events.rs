//! Route definitions for the `/events` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// Static segments are registered before `/{id}`.
///
/// ```text
/// POST             /               -> create_event
/// GET              /browse/all     -> browse_events (public)
/// GET              /mine           -> list_my_events
/// GET              /types          -> list_event_types
/// GET, PUT, DELETE /{id}           -> get_event, update_event, delete_event
/// POST             /{id}/publish   -> publish_event
/// POST             /{id}/unpublish -> unpublish_event
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(events::create_event))
        .route("/browse/all", get(events::browse_events))
        .route("/mine", get(events::list_my_events))
        .route("/types", get(events::list_event_types))
        .route(
            "/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/{id}/publish", post(events::publish_event))
        .route("/{id}/unpublish", post(events::unpublish_event))
}
