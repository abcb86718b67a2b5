//! Handlers for the `/events` resource.
//!
//! Events start as drafts. Drafts and private events are only visible to
//! their organizer (and admins); everyone else gets 404.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use gigbook_core::error::CoreError;
use gigbook_core::event::{
    is_upcoming, validate_budget, validate_event_type, validate_schedule, validate_title,
    validate_transition, EVENT_TYPES, STATUS_DRAFT, STATUS_PUBLISHED, VALID_STATUSES,
};
use gigbook_core::types::DbId;
use gigbook_db::models::event::{BrowseFilter, CreateEvent, Event, UpdateEvent};
use gigbook_db::repositories::{EventRepo, OrganizerRepo};
use gigbook_events::{catalog, PlatformEvent};
use serde::Deserialize;
use sqlx::error::ErrorKind;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::{current_organizer, today};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireOrganizer;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BrowseParams {
    pub event_type: Option<String>,
    pub city: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct MineParams {
    pub status: Option<String>,
}

/// Load an event owned by the calling organizer.
///
/// Missing events are 404; events of another organizer are 403.
pub(crate) async fn load_owned_event(
    state: &AppState,
    event_id: DbId,
    user_id: DbId,
) -> AppResult<Event> {
    let organizer = current_organizer(state, user_id).await?;
    let event = EventRepo::find_by_id(&state.pool, event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event", event_id))?;
    if event.organizer_id != organizer.id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this event".into(),
        )));
    }
    Ok(event)
}

/// POST /api/events
pub async fn create_event(
    RequireOrganizer(auth): RequireOrganizer,
    State(state): State<AppState>,
    Json(input): Json<CreateEvent>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_title(&input.title)?;
    validate_event_type(&input.event_type)?;
    validate_schedule(input.event_date, input.start_time, input.end_time, today())?;
    validate_budget(input.budget_min, input.budget_max)?;

    let organizer = current_organizer(&state, auth.user_id).await?;
    let event = EventRepo::create(&state.pool, organizer.id, &input).await?;

    tracing::info!(event_id = event.id, organizer_id = organizer.id, "Event created");
    state.publish(
        PlatformEvent::new(catalog::EVENT_CREATED)
            .with_source(catalog::ENTITY_EVENT, event.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({ "title": event.title, "event_date": event.event_date })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// GET /api/events/browse/all
///
/// Published, public events from today on. No authentication required.
pub async fn browse_events(
    State(state): State<AppState>,
    Query(params): Query<BrowseParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(event_type) = params.event_type.as_deref() {
        validate_event_type(event_type)?;
    }
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();

    let filter = BrowseFilter {
        event_type: params.event_type,
        city: params.city,
        from_date: today(),
    };
    let events = EventRepo::browse(&state.pool, &filter, limit, offset).await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/events/mine
pub async fn list_my_events(
    RequireOrganizer(auth): RequireOrganizer,
    State(state): State<AppState>,
    Query(params): Query<MineParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = params.status.as_deref() {
        if !VALID_STATUSES.contains(&status) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Invalid event status '{status}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            ))));
        }
    }
    let organizer = current_organizer(&state, auth.user_id).await?;
    let events =
        EventRepo::list_for_organizer(&state.pool, organizer.id, params.status.as_deref()).await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/events/types
pub async fn list_event_types() -> impl IntoResponse {
    Json(DataResponse { data: EVENT_TYPES })
}

/// GET /api/events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let event = EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Event", id))?;

    if event.status == STATUS_PUBLISHED && event.is_public {
        return Ok(Json(DataResponse { data: event }));
    }

    let privileged = match &auth {
        Some(user) if user.is_admin() => true,
        Some(user) => {
            let organizer = OrganizerRepo::find_by_user_id(&state.pool, user.user_id).await?;
            organizer.is_some_and(|o| o.id == event.organizer_id)
        }
        None => false,
    };
    if !privileged {
        return Err(AppError::not_found("Event", id));
    }

    Ok(Json(DataResponse { data: event }))
}

/// PUT /api/events/{id}
pub async fn update_event(
    RequireOrganizer(auth): RequireOrganizer,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEvent>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let existing = load_owned_event(&state, id, auth.user_id).await?;

    if let Some(title) = input.title.as_deref() {
        validate_title(title)?;
    }
    if let Some(event_type) = input.event_type.as_deref() {
        validate_event_type(event_type)?;
    }
    // Cross-field rules are checked against the merged result.
    if input.event_date.is_some() || input.start_time.is_some() || input.end_time.is_some() {
        validate_schedule(
            input.event_date.unwrap_or(existing.event_date),
            input.start_time.or(existing.start_time),
            input.end_time.or(existing.end_time),
            today(),
        )?;
    }
    if input.budget_min.is_some() || input.budget_max.is_some() {
        validate_budget(
            input.budget_min.or(existing.budget_min),
            input.budget_max.or(existing.budget_max),
        )?;
    }

    let event = EventRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Event", id))?;

    tracing::info!(event_id = id, user_id = auth.user_id, "Event updated");
    Ok(Json(DataResponse { data: event }))
}

/// DELETE /api/events/{id}
///
/// Refused with 409 while any booking references the event.
pub async fn delete_event(
    RequireOrganizer(auth): RequireOrganizer,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_owned_event(&state, id, auth.user_id).await?;

    let bookings = EventRepo::count_bookings(&state.pool, id).await?;
    if bookings > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Event has {bookings} booking(s) and cannot be deleted"
        ))));
    }

    // A booking committed after the count still blocks the delete through
    // the RESTRICT foreign key.
    let deleted = EventRepo::delete(&state.pool, id)
        .await
        .map_err(|err| match &err {
            sqlx::Error::Database(db) if matches!(db.kind(), ErrorKind::ForeignKeyViolation) => {
                AppError::Core(CoreError::Conflict(
                    "Event has bookings and cannot be deleted".into(),
                ))
            }
            _ => AppError::Database(err),
        })?;
    if !deleted {
        return Err(AppError::not_found("Event", id));
    }
    tracing::info!(event_id = id, user_id = auth.user_id, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/events/{id}/publish
pub async fn publish_event(
    RequireOrganizer(auth): RequireOrganizer,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let event = load_owned_event(&state, id, auth.user_id).await?;
    if !is_upcoming(event.event_date, today()) {
        return Err(AppError::Core(CoreError::Conflict(
            "Cannot publish an event dated in the past".into(),
        )));
    }
    let event = change_status(&state, event, STATUS_PUBLISHED).await?;

    state.publish(
        PlatformEvent::new(catalog::EVENT_PUBLISHED)
            .with_source(catalog::ENTITY_EVENT, event.id)
            .with_actor(auth.user_id),
    );
    Ok(Json(DataResponse { data: event }))
}

/// POST /api/events/{id}/unpublish
pub async fn unpublish_event(
    RequireOrganizer(auth): RequireOrganizer,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let event = load_owned_event(&state, id, auth.user_id).await?;
    let event = change_status(&state, event, STATUS_DRAFT).await?;

    state.publish(
        PlatformEvent::new(catalog::EVENT_UNPUBLISHED)
            .with_source(catalog::ENTITY_EVENT, event.id)
            .with_actor(auth.user_id),
    );
    Ok(Json(DataResponse { data: event }))
}

async fn change_status(state: &AppState, event: Event, to: &str) -> AppResult<Event> {
    validate_transition(&event.status, to)?;
    let updated = EventRepo::set_status(&state.pool, event.id, &event.status, to)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Event was changed by another request; reload and try again".into(),
            ))
        })?;
    tracing::info!(event_id = event.id, from = %event.status, to, "Event status changed");
    Ok(updated)
}
