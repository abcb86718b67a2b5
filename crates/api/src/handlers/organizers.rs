//! Handlers for the `/organizers` resource: profile, payments, dashboard.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use gigbook_core::booking::BookingAction;
use gigbook_core::error::CoreError;
use gigbook_core::types::DbId;
use gigbook_db::models::organizer::UpdateOrganizer;
use gigbook_db::repositories::{OrganizerRepo, StatsRepo};
use validator::Validate;

use crate::engine::booking_flow;
use crate::error::{AppError, AppResult};
use crate::handlers::{current_organizer, today};
use crate::middleware::rbac::RequireOrganizer;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/organizers/me
pub async fn get_my_profile(
    RequireOrganizer(auth): RequireOrganizer,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let organizer = current_organizer(&state, auth.user_id).await?;
    Ok(Json(DataResponse { data: organizer }))
}

/// PUT /api/organizers/me
pub async fn update_my_profile(
    RequireOrganizer(auth): RequireOrganizer,
    State(state): State<AppState>,
    Json(input): Json<UpdateOrganizer>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let organizer = OrganizerRepo::update_by_user_id(&state.pool, auth.user_id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "No organizer profile exists for this account".into(),
            ))
        })?;
    Ok(Json(DataResponse { data: organizer }))
}

/// POST /api/organizers/bookings/{id}/payment
///
/// Pay a confirmed booking into escrow.
pub async fn pay_booking(
    RequireOrganizer(auth): RequireOrganizer,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let booking = booking_flow::perform(&state, id, BookingAction::Pay, &auth, None).await?;
    Ok(Json(DataResponse { data: booking }))
}

/// POST /api/organizers/bookings/{id}/complete
///
/// Mark a paid booking completed, releasing the escrow to the artist.
pub async fn complete_booking(
    RequireOrganizer(auth): RequireOrganizer,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let booking = booking_flow::perform(&state, id, BookingAction::Complete, &auth, None).await?;
    Ok(Json(DataResponse { data: booking }))
}

/// GET /api/organizers/stats
pub async fn get_stats(
    RequireOrganizer(auth): RequireOrganizer,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let organizer = current_organizer(&state, auth.user_id).await?;
    let stats = StatsRepo::organizer(&state.pool, organizer.id, today()).await?;
    Ok(Json(DataResponse { data: stats }))
}
