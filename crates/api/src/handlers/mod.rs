//! HTTP handlers, one module per resource.
//!
//! Handlers validate input, call repositories or the [`engine`](crate::engine),
//! publish activity events and wrap results in
//! [`DataResponse`](crate::response::DataResponse).

pub mod admin;
pub mod applications;
pub mod artists;
pub mod auth;
pub mod bookings;
pub mod disputes;
pub mod events;
pub mod organizers;
pub mod reviews;

use gigbook_core::error::CoreError;
use gigbook_core::types::DbId;
use gigbook_db::models::artist::Artist;
use gigbook_db::models::organizer::Organizer;
use gigbook_db::repositories::{ArtistRepo, OrganizerRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// The artist profile of the calling artist user.
pub(crate) async fn current_artist(state: &AppState, user_id: DbId) -> AppResult<Artist> {
    ArtistRepo::find_by_user_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "No artist profile exists for this account".into(),
            ))
        })
}

/// The organizer profile of the calling organizer user.
pub(crate) async fn current_organizer(state: &AppState, user_id: DbId) -> AppResult<Organizer> {
    OrganizerRepo::find_by_user_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "No organizer profile exists for this account".into(),
            ))
        })
}

/// Today's date in UTC, the reference for "upcoming" and "in the past".
pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}
