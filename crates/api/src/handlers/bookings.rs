//! Handlers for the `/bookings` resource.
//!
//! State changes go through [`booking_flow::perform`]; this module only
//! parses requests and shapes responses.

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use gigbook_core::booking::{
    compute_fees, BookingAction, BookingState, BookingStatus, PaymentStatus,
};
use gigbook_core::error::CoreError;
use gigbook_core::event::validate_schedule;
use gigbook_core::types::DbId;
use gigbook_db::models::booking::{BookingRequest, CancelRequest, CreateBooking};
use gigbook_db::repositories::{ActivityRepo, ArtistRepo, BookingRepo};
use gigbook_events::{catalog, PlatformEvent};
use validator::Validate;

use crate::engine::booking_flow;
use crate::error::{AppError, AppResult};
use crate::handlers::events::load_owned_event;
use crate::handlers::{current_organizer, today};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireArtist, RequireOrganizer};
use crate::query::StatusListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/bookings
///
/// An organizer requests an artist directly. The booking starts `pending`
/// until the artist accepts or declines.
pub async fn create_booking(
    RequireOrganizer(auth): RequireOrganizer,
    State(state): State<AppState>,
    Json(input): Json<BookingRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let organizer = current_organizer(&state, auth.user_id).await?;
    let artist = ArtistRepo::find_by_id(&state.pool, input.artist_id)
        .await?
        .ok_or_else(|| AppError::not_found("Artist", input.artist_id))?;

    // An attached event provides the snapshot; explicit fields win.
    let (event_title, event_date, start_time, end_time, venue_name, venue_address) =
        match input.event_id {
            Some(event_id) => {
                let event = load_owned_event(&state, event_id, auth.user_id).await?;
                (
                    input.event_title.clone().unwrap_or(event.title),
                    input.event_date.unwrap_or(event.event_date),
                    input.start_time.or(event.start_time),
                    input.end_time.or(event.end_time),
                    input.venue_name.clone().or(event.venue_name),
                    input.venue_address.clone().or(event.venue_address),
                )
            }
            None => {
                let (Some(title), Some(date)) = (input.event_title.clone(), input.event_date)
                else {
                    return Err(AppError::Core(CoreError::Validation(
                        "event_title and event_date are required without event_id".into(),
                    )));
                };
                (
                    title,
                    date,
                    input.start_time,
                    input.end_time,
                    input.venue_name.clone(),
                    input.venue_address.clone(),
                )
            }
        };
    validate_schedule(event_date, start_time, end_time, today())?;

    let fees = compute_fees(input.total_amount, state.config.marketplace.platform_fee_percent)?;

    let create = CreateBooking {
        artist_id: artist.id,
        organizer_id: organizer.id,
        event_id: input.event_id,
        application_id: None,
        event_title: event_title.trim().to_string(),
        event_date,
        start_time,
        end_time,
        venue_name,
        venue_address,
        total_amount: input.total_amount,
        fees,
        state: BookingState::new(BookingStatus::Pending, PaymentStatus::Pending),
        notes: input.notes.clone(),
    };
    let booking = BookingRepo::create(&state.pool, &create).await?;

    tracing::info!(
        booking_id = booking.id,
        artist_id = artist.id,
        organizer_id = organizer.id,
        total = %booking.total_amount,
        "Booking requested"
    );
    state.publish(
        PlatformEvent::new(catalog::BOOKING_REQUESTED)
            .with_source(catalog::ENTITY_BOOKING, booking.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({
                "artist_id": artist.id,
                "total_amount": booking.total_amount,
                "platform_fee": booking.platform_fee,
                "net_amount": booking.net_amount,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: booking })))
}

/// GET /api/bookings
///
/// Bookings where the caller is a party; admins see every booking.
pub async fn list_bookings(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<StatusListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = params.status.as_deref() {
        BookingStatus::from_str(status)?;
    }
    let (limit, offset) = params.pagination().resolve();
    let status = params.status.as_deref();

    let bookings = if auth.is_admin() {
        BookingRepo::list_all(&state.pool, status, limit, offset).await?
    } else {
        BookingRepo::list_for_user(&state.pool, auth.user_id, status, limit, offset).await?
    };
    Ok(Json(DataResponse { data: bookings }))
}

/// GET /api/bookings/{id}
pub async fn get_booking(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = booking_flow::load_visible(&state, id, &auth).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// POST /api/bookings/{id}/accept
pub async fn accept_booking(
    RequireArtist(auth): RequireArtist,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let booking = booking_flow::perform(&state, id, BookingAction::Accept, &auth, None).await?;
    Ok(Json(DataResponse { data: booking }))
}

/// POST /api/bookings/{id}/decline
pub async fn decline_booking(
    RequireArtist(auth): RequireArtist,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let booking = booking_flow::perform(&state, id, BookingAction::Decline, &auth, None).await?;
    Ok(Json(DataResponse { data: booking }))
}

/// POST /api/bookings/{id}/cancel
///
/// Either party may cancel. A paid booking is refunded; a booking under
/// dispute cannot be cancelled.
pub async fn cancel_booking(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CancelRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let reason = input.reason.filter(|r| !r.trim().is_empty());
    let booking = booking_flow::perform(&state, id, BookingAction::Cancel, &auth, reason).await?;
    Ok(Json(DataResponse { data: booking }))
}

/// GET /api/bookings/{id}/activity
pub async fn booking_activity(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    booking_flow::load_visible(&state, id, &auth).await?;
    let entries = ActivityRepo::list_for_entity(&state.pool, catalog::ENTITY_BOOKING, id).await?;
    Ok(Json(DataResponse { data: entries }))
}
