//! Route definitions for the `/bookings` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::bookings;
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// GET, POST /               -> list_bookings, create_booking
/// GET       /{id}           -> get_booking
/// POST      /{id}/accept    -> accept_booking
/// POST      /{id}/decline   -> decline_booking
/// POST      /{id}/cancel    -> cancel_booking
/// GET       /{id}/activity  -> booking_activity
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/{id}", get(bookings::get_booking))
        .route("/{id}/accept", post(bookings::accept_booking))
        .route("/{id}/decline", post(bookings::decline_booking))
        .route("/{id}/cancel", post(bookings::cancel_booking))
        .route("/{id}/activity", get(bookings::booking_activity))
}
