use axum::routing::{get, post};
use axum::Router;

use crate::handlers::organizers;
use crate::state::AppState;

/// Routes mounted at `/organizers`.
///
/// ```text
/// GET, PUT /me                     -> get_my_profile, update_my_profile
/// GET      /stats                  -> get_stats
/// POST     /bookings/{id}/payment  -> pay_booking
/// POST     /bookings/{id}/complete -> complete_booking
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/me",
            get(organizers::get_my_profile).put(organizers::update_my_profile),
        )
        .route("/stats", get(organizers::get_stats))
        .route("/bookings/{id}/payment", post(organizers::pay_booking))
        .route("/bookings/{id}/complete", post(organizers::complete_booking))
}
