//! Handlers for the `/event-applications` resource.
//!
//! Artists apply to published events; the event's organizer approves or
//! rejects. Approval creates a confirmed booking in the same transaction.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use gigbook_core::application::{
    resolve_booking_amount, validate_decision, validate_message, validate_proposed_rate,
    validate_status, STATUS_APPROVED, STATUS_REJECTED,
};
use gigbook_core::booking::{compute_fees, BookingState, BookingStatus, PaymentStatus};
use gigbook_core::error::CoreError;
use gigbook_core::event::{is_open_for_applications, STATUS_PUBLISHED};
use gigbook_core::types::DbId;
use gigbook_db::models::application::{
    ApplyRequest, ApproveRequest, CreateApplication, EventApplication, RejectRequest,
};
use gigbook_db::models::booking::{Booking, CreateBooking};
use gigbook_db::repositories::{ApplicationRepo, EventRepo};
use gigbook_events::{catalog, PlatformEvent};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::events::load_owned_event;
use crate::handlers::{current_artist, today};
use crate::middleware::rbac::{RequireArtist, RequireOrganizer};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ApplicationListParams {
    pub status: Option<String>,
}

/// Response body of a successful approval.
#[derive(Debug, Serialize)]
pub struct ApprovalResponse {
    pub application: EventApplication,
    pub booking: Booking,
}

/// POST /api/event-applications/{event_id}/apply
pub async fn apply(
    RequireArtist(auth): RequireArtist,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<ApplyRequest>,
) -> AppResult<impl IntoResponse> {
    validate_proposed_rate(input.proposed_rate)?;
    validate_message("cover_message", input.cover_message.as_deref())?;

    let artist = current_artist(&state, auth.user_id).await?;
    let event = EventRepo::find_by_id(&state.pool, event_id)
        .await?
        .filter(|e| e.status == STATUS_PUBLISHED && e.is_public)
        .ok_or_else(|| AppError::not_found("Event", event_id))?;

    if !is_open_for_applications(&event.status, event.is_public, event.event_date, today()) {
        return Err(AppError::Core(CoreError::Conflict(
            "Event is no longer open for applications".into(),
        )));
    }

    let create = CreateApplication {
        event_id,
        artist_id: artist.id,
        proposed_rate: input.proposed_rate,
        cover_message: input.cover_message,
    };
    let application = ApplicationRepo::create(&state.pool, &create).await?;

    tracing::info!(
        application_id = application.id,
        event_id,
        artist_id = artist.id,
        "Application submitted"
    );
    state.publish(
        PlatformEvent::new(catalog::APPLICATION_SUBMITTED)
            .with_source(catalog::ENTITY_APPLICATION, application.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({
                "event_id": event_id,
                "proposed_rate": application.proposed_rate,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: application })))
}

/// GET /api/event-applications/{event_id}/applications
pub async fn list_for_event(
    RequireOrganizer(auth): RequireOrganizer,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Query(params): Query<ApplicationListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = params.status.as_deref() {
        validate_status(status)?;
    }
    load_owned_event(&state, event_id, auth.user_id).await?;
    let applications =
        ApplicationRepo::list_for_event(&state.pool, event_id, params.status.as_deref()).await?;
    Ok(Json(DataResponse { data: applications }))
}

/// POST /api/event-applications/{event_id}/applications/{id}/approve
///
/// Approve a pending application and book the artist. The booking total
/// is `total_amount`, else the proposed rate, else the event's budget
/// maximum.
pub async fn approve(
    RequireOrganizer(auth): RequireOrganizer,
    State(state): State<AppState>,
    Path((event_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<ApproveRequest>,
) -> AppResult<impl IntoResponse> {
    validate_message("organizer_response", input.organizer_response.as_deref())?;

    let event = load_owned_event(&state, event_id, auth.user_id).await?;
    let application = ApplicationRepo::find_for_event(&state.pool, event_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("Application", id))?;
    validate_decision(&application.application_status, STATUS_APPROVED)?;

    let total = resolve_booking_amount(
        input.total_amount,
        application.proposed_rate,
        event.budget_max,
    )?;
    let fees = compute_fees(total, state.config.marketplace.platform_fee_percent)?;

    let booking = CreateBooking {
        artist_id: application.artist_id,
        organizer_id: event.organizer_id,
        event_id: Some(event.id),
        application_id: Some(application.id),
        event_title: event.title.clone(),
        event_date: event.event_date,
        start_time: event.start_time,
        end_time: event.end_time,
        venue_name: event.venue_name.clone(),
        venue_address: event.venue_address.clone(),
        total_amount: total,
        fees,
        state: BookingState::new(BookingStatus::Confirmed, PaymentStatus::Pending),
        notes: None,
    };

    let (application, booking) = ApplicationRepo::approve_with_booking(
        &state.pool,
        id,
        input.organizer_response.as_deref(),
        &booking,
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "Application has already been decided".into(),
        ))
    })?;

    tracing::info!(
        application_id = id,
        booking_id = booking.id,
        event_id,
        total = %booking.total_amount,
        "Application approved"
    );
    state.publish(
        PlatformEvent::new(catalog::APPLICATION_APPROVED)
            .with_source(catalog::ENTITY_APPLICATION, application.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({ "booking_id": booking.id })),
    );
    state.publish(
        PlatformEvent::new(catalog::BOOKING_CONFIRMED)
            .with_source(catalog::ENTITY_BOOKING, booking.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({
                "application_id": application.id,
                "total_amount": booking.total_amount,
                "platform_fee": booking.platform_fee,
                "net_amount": booking.net_amount,
            })),
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ApprovalResponse {
                application,
                booking,
            },
        }),
    ))
}

/// POST /api/event-applications/{event_id}/applications/{id}/reject
pub async fn reject(
    RequireOrganizer(auth): RequireOrganizer,
    State(state): State<AppState>,
    Path((event_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<RejectRequest>,
) -> AppResult<impl IntoResponse> {
    validate_message("organizer_response", input.organizer_response.as_deref())?;

    load_owned_event(&state, event_id, auth.user_id).await?;
    let application = ApplicationRepo::find_for_event(&state.pool, event_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("Application", id))?;
    validate_decision(&application.application_status, STATUS_REJECTED)?;

    let application =
        ApplicationRepo::reject(&state.pool, id, input.organizer_response.as_deref())
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Conflict(
                    "Application has already been decided".into(),
                ))
            })?;

    tracing::info!(application_id = id, event_id, "Application rejected");
    state.publish(
        PlatformEvent::new(catalog::APPLICATION_REJECTED)
            .with_source(catalog::ENTITY_APPLICATION, application.id)
            .with_actor(auth.user_id),
    );

    Ok(Json(DataResponse { data: application }))
}

/// GET /api/event-applications/mine
pub async fn list_mine(
    RequireArtist(auth): RequireArtist,
    State(state): State<AppState>,
    Query(params): Query<ApplicationListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = params.status.as_deref() {
        validate_status(status)?;
    }
    let artist = current_artist(&state, auth.user_id).await?;
    let applications =
        ApplicationRepo::list_for_artist(&state.pool, artist.id, params.status.as_deref()).await?;
    Ok(Json(DataResponse { data: applications }))
}
