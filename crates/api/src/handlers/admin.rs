//! Admin-only handlers mounted under `/admin`.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use gigbook_core::dispute::{validate_status, Resolution};
use gigbook_core::error::CoreError;
use gigbook_core::roles::validate_role;
use gigbook_core::types::DbId;
use gigbook_db::models::booking::Booking;
use gigbook_db::models::dispute::{Dispute, ResolveRequest};
use gigbook_db::models::user::UserResponse;
use gigbook_db::repositories::{ActivityRepo, DisputeRepo, StatsRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::engine::dispute_resolution;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::{PaginationParams, StatusListParams};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserListParams {
    pub role: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ActivityParams {
    pub event_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ResolutionResponse {
    pub dispute: Dispute,
    pub booking: Booking,
}

/// GET /api/admin/users
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<UserListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(role) = params.role.as_deref() {
        validate_role(role)?;
    }
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();
    let users = UserRepo::list(&state.pool, params.role.as_deref(), limit, offset).await?;
    let data: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

/// POST /api/admin/users/{id}/verify
pub async fn verify_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::set_verified(&state.pool, id, true)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;
    tracing::info!(user_id = id, admin_id = admin.user_id, "User verified");
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// POST /api/admin/users/{id}/deactivate
///
/// Deactivates the account and revokes all of its sessions. Admins cannot
/// deactivate themselves.
pub async fn deactivate_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if id == admin.user_id {
        return Err(AppError::BadRequest(
            "Cannot deactivate your own account".into(),
        ));
    }

    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;
    let revoked = UserRepo::deactivate(&state.pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::Conflict(format!(
            "User {} is already deactivated",
            user.id
        )))
    })?;
    tracing::info!(user_id = id, admin_id = admin.user_id, revoked, "User deactivated");

    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// GET /api/admin/disputes
pub async fn list_disputes(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<StatusListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = params.status.as_deref() {
        validate_status(status)?;
    }
    let (limit, offset) = params.pagination().resolve();
    let disputes =
        DisputeRepo::list(&state.pool, params.status.as_deref(), limit, offset).await?;
    Ok(Json(DataResponse { data: disputes }))
}

/// POST /api/admin/disputes/{id}/resolve
pub async fn resolve_dispute(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ResolveRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let resolution = Resolution::parse(&input.resolution)?;

    let (dispute, booking) = dispute_resolution::resolve(
        &state.pool,
        &state.event_bus,
        id,
        resolution,
        input.notes.as_deref(),
        Some(admin.user_id),
    )
    .await?;

    Ok(Json(DataResponse {
        data: ResolutionResponse { dispute, booking },
    }))
}

/// GET /api/admin/stats
pub async fn platform_stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stats = StatsRepo::platform(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/admin/activity
pub async fn recent_activity(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ActivityParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();
    let entries =
        ActivityRepo::list_recent(&state.pool, params.event_type.as_deref(), limit, offset)
            .await?;
    Ok(Json(DataResponse { data: entries }))
}
