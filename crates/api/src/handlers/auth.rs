//! Handlers for the `/auth` resource (register, login, refresh, logout, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use gigbook_core::booking::validate_optional_rate;
use gigbook_core::error::CoreError;
use gigbook_core::roles::{validate_registration_role, ROLE_ARTIST};
use gigbook_core::types::DbId;
use gigbook_db::models::artist::Artist;
use gigbook_db::models::organizer::Organizer;
use gigbook_db::models::session::CreateSession;
use gigbook_db::models::user::{CreateUser, NewProfile, RegisterRequest, User, UserResponse};
use gigbook_db::repositories::{ArtistRepo, OrganizerRepo, SessionRepo, UserRepo};
use gigbook_events::{catalog, PlatformEvent};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::refresh_token_digest;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Consecutive failed logins before the account is locked.
const MAX_FAILED_ATTEMPTS: i32 = 5;

const LOCK_DURATION_MINS: i64 = 15;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Returned by register, login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// The current user together with their role profile.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<Artist>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer: Option<Organizer>,
}

/// POST /api/auth/register
///
/// Create an artist or organizer account together with its profile and
/// log it in.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_registration_role(&input.role)?;
    validate_password_strength(&input.password)?;

    let profile = if input.role == ROLE_ARTIST {
        validate_optional_rate("base_rate", input.base_rate)?;
        NewProfile::Artist {
            stage_name: input.stage_name.clone().unwrap_or_else(|| input.name.clone()),
            genre: input.genre.clone(),
            city: input.city.clone(),
            base_rate: input.base_rate,
        }
    } else {
        NewProfile::Organizer {
            organization_name: input
                .organization_name
                .clone()
                .unwrap_or_else(|| input.name.clone()),
            phone: input.phone.clone(),
        }
    };

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        name: input.name.trim().to_string(),
        email: normalize_email(&input.email),
        password_hash,
        role: input.role.clone(),
    };
    let (user, profile_id) = UserRepo::register(&state.pool, &create, &profile).await?;

    tracing::info!(user_id = user.id, role = %user.role, profile_id, "User registered");
    state.publish(
        PlatformEvent::new(catalog::USER_REGISTERED)
            .with_source(catalog::ENTITY_USER, user.id)
            .with_actor(user.id)
            .with_payload(serde_json::json!({ "role": user.role, "profile_id": profile_id })),
    );

    let response = issue_tokens(&state, &user, None).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login
///
/// Authenticate with email + password. Five consecutive failures lock the
/// account for fifteen minutes.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || {
        AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        ))
    };

    let user = UserRepo::find_by_email(&state.pool, &normalize_email(&input.email))
        .await?
        .ok_or_else(invalid)?;

    // Account state is only revealed to a caller who knows the password.
    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    let locked = user.locked_until.is_some_and(|until| until > Utc::now());

    if !password_valid {
        if !locked {
            let lock_until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
            let failures = UserRepo::record_failed_login(
                &state.pool,
                user.id,
                MAX_FAILED_ATTEMPTS,
                lock_until,
            )
            .await?;
            if failures >= MAX_FAILED_ATTEMPTS {
                tracing::warn!(user_id = user.id, failures, "Account locked after failed logins");
            }
        }
        return Err(invalid());
    }

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }
    if locked {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is temporarily locked. Try again later.".into(),
        )));
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    Ok(Json(issue_tokens(&state, &user, None).await?))
}

/// POST /api/auth/refresh
///
/// Exchange a refresh token for a new token pair. Refresh tokens are
/// single-use: the presented session is revoked.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = refresh_token_digest(&input.refresh_token);

    let session = SessionRepo::find_active(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    Ok(Json(issue_tokens(&state, &user, Some(session.id)).await?))
}

/// POST /api/auth/logout
///
/// Revoke every session of the caller. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, revoked, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", auth.user_id))?;

    let artist = ArtistRepo::find_by_user_id(&state.pool, user.id).await?;
    let organizer = OrganizerRepo::find_by_user_id(&state.pool, user.id).await?;

    Ok(Json(DataResponse {
        data: MeResponse {
            user: UserResponse::from(&user),
            artist,
            organizer,
        },
    }))
}

/// Sign an access token and open a refresh session.
///
/// With `rotate_from`, the old session is revoked atomically with the new
/// one being created; losing that race means the token was already used.
async fn issue_tokens(
    state: &AppState,
    user: &User,
    rotate_from: Option<DbId>,
) -> AppResult<AuthResponse> {
    let tokens = state
        .config
        .jwt
        .issue(user.id, &user.role)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let session = CreateSession {
        user_id: user.id,
        refresh_token_hash: tokens.refresh_hash,
        expires_at: tokens.refresh_expires_at,
        user_agent: None,
        ip_address: None,
    };

    match rotate_from {
        Some(old_id) => {
            SessionRepo::rotate(&state.pool, old_id, &session)
                .await?
                .ok_or_else(|| {
                    AppError::Core(CoreError::Unauthorized(
                        "Refresh token has already been used".into(),
                    ))
                })?;
        }
        None => {
            SessionRepo::create(&state.pool, &session).await?;
        }
    }

    Ok(AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.access_expires_in,
        user: UserResponse::from(user),
    })
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
