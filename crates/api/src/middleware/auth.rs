//! Bearer-token authentication.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use gigbook_core::error::CoreError;
use gigbook_core::roles::ROLE_ADMIN;
use gigbook_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// The caller identified by a valid access token.
///
/// Only the token is consulted: a deactivated account keeps working until
/// its access token expires, after which refresh is refused.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    fn from_token(token: &str, state: &AppState) -> Result<Self, AppError> {
        let claims = state
            .config
            .jwt
            .verify(token)
            .map_err(|_| unauthorized("Invalid or expired token"))?;
        Ok(Self {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

/// `Ok(None)` when the header is absent, an error when it is malformed.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| Some(token.trim()))
        .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or_else(|| unauthorized("Missing Authorization header"))?;
        Self::from_token(token, state)
    }
}

/// Public routes that show more to a signed-in caller take `Option<AuthUser>`.
/// A bad token is still a 401 rather than silently anonymous.
impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        bearer_token(parts)?
            .map(|token| Self::from_token(token, state))
            .transpose()
    }
}
