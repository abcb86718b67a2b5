//! User entity model and DTOs.

use gigbook_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_verified: bool,
    pub is_active: bool,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_verified: bool,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            is_verified: user.is_verified,
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// DTO for inserting a user row. The password is already hashed.
#[derive(Debug)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// Role-specific profile created together with the user at registration.
#[derive(Debug)]
pub enum NewProfile {
    Artist {
        stage_name: String,
        genre: Option<String>,
        city: Option<String>,
        base_rate: Option<Money>,
    },
    Organizer {
        organization_name: String,
        phone: Option<String>,
    },
}

/// Request body for `POST /auth/register`.
///
/// Artist registrations may supply `stage_name` (defaults to `name`);
/// organizer registrations may supply `organization_name` (defaults to `name`).
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub password: String,
    pub role: String,
    #[validate(length(min = 1, max = 100))]
    pub stage_name: Option<String>,
    #[validate(length(max = 50))]
    pub genre: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    pub base_rate: Option<Money>,
    #[validate(length(min = 1, max = 200))]
    pub organization_name: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
}
