//! Handlers for the `/disputes` resource.
//!
//! An organizer reports non-delivery on a paid booking, which freezes its
//! escrow. The artist may answer once. Admins resolve disputes; disputes
//! the artist never answered are auto-resolved in the organizer's favour
//! (see [`crate::background::dispute_auto_resolve`]).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use gigbook_core::booking::{authorize, next_state, BookingAction, BookingParty};
use gigbook_core::dispute::{auto_resolve_date, validate_issue_description, STATUS_OPEN};
use gigbook_core::error::CoreError;
use gigbook_core::types::DbId;
use gigbook_db::models::dispute::{CreateDispute, Dispute, ReportNonDelivery, RespondRequest};
use gigbook_db::repositories::DisputeRepo;
use gigbook_events::{catalog, PlatformEvent};
use validator::Validate;

use crate::engine::booking_flow;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireArtist, RequireOrganizer};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/disputes/bookings/{id}/report-non-delivery
pub async fn report_non_delivery(
    RequireOrganizer(auth): RequireOrganizer,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
    Json(input): Json<ReportNonDelivery>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_issue_description(&input.issue_description)?;

    let detail = booking_flow::load_visible(&state, booking_id, &auth).await?;
    authorize(
        BookingAction::OpenDispute,
        booking_flow::party_of(&detail, &auth),
    )?;

    let current = detail.booking.state()?;
    let has_open = DisputeRepo::has_open_for_booking(&state.pool, booking_id).await?;
    next_state(BookingAction::OpenDispute, current, has_open)?;

    let create = CreateDispute {
        booking_id,
        reporter_id: auth.user_id,
        issue_description: input.issue_description,
        evidence: input.evidence,
        auto_resolve_date: auto_resolve_date(
            Utc::now(),
            state.config.marketplace.dispute_window_days,
        ),
    };
    let dispute = DisputeRepo::open(&state.pool, &create, current)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Booking was changed by another request; reload and try again".into(),
            ))
        })?;

    tracing::info!(
        dispute_id = dispute.id,
        booking_id,
        reporter_id = auth.user_id,
        auto_resolve_date = %dispute.auto_resolve_date,
        "Dispute opened"
    );
    state.publish(
        PlatformEvent::new(catalog::DISPUTE_OPENED)
            .with_source(catalog::ENTITY_DISPUTE, dispute.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({
                "booking_id": booking_id,
                "auto_resolve_date": dispute.auto_resolve_date,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: dispute })))
}

/// GET /api/disputes/mine
pub async fn list_mine(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = params.resolve();
    let disputes = DisputeRepo::list_for_user(&state.pool, auth.user_id, limit, offset).await?;
    Ok(Json(DataResponse { data: disputes }))
}

/// GET /api/disputes/{id}
pub async fn get_dispute(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (dispute, _) = load_with_party(&state, id, &auth).await?;
    Ok(Json(DataResponse { data: dispute }))
}

/// POST /api/disputes/{id}/respond
///
/// The booking's artist answers the report. Only once, and only while the
/// dispute is open. An answered dispute is no longer auto-resolved.
pub async fn respond(
    RequireArtist(auth): RequireArtist,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RespondRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let response = input.response.trim();
    if response.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "response must not be blank".into(),
        )));
    }

    let (dispute, party) = load_with_party(&state, id, &auth).await?;
    if party != BookingParty::Artist {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the booked artist can respond to this dispute".into(),
        )));
    }
    if dispute.status != STATUS_OPEN {
        return Err(AppError::Core(CoreError::Conflict(
            "Dispute is already resolved".into(),
        )));
    }
    if dispute.artist_response.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Dispute has already been answered".into(),
        )));
    }

    let dispute = DisputeRepo::respond(&state.pool, id, response)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Dispute was changed by another request".into(),
            ))
        })?;

    tracing::info!(dispute_id = id, artist_user_id = auth.user_id, "Dispute answered");
    state.publish(
        PlatformEvent::new(catalog::DISPUTE_RESPONDED)
            .with_source(catalog::ENTITY_DISPUTE, dispute.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({ "booking_id": dispute.booking_id })),
    );

    Ok(Json(DataResponse { data: dispute }))
}

/// Load a dispute and the caller's relation to its booking.
///
/// Outsiders get 404.
async fn load_with_party(
    state: &AppState,
    id: DbId,
    auth: &AuthUser,
) -> AppResult<(Dispute, BookingParty)> {
    let dispute = DisputeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Dispute", id))?;
    let detail = booking_flow::load_detail(state, dispute.booking_id).await?;
    let party = booking_flow::party_of(&detail, auth);
    if party == BookingParty::Outsider {
        return Err(AppError::not_found("Dispute", id));
    }
    Ok((dispute, party))
}
