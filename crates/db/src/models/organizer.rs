//! Organizer profile model and DTOs.

use gigbook_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `organizers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Organizer {
    pub id: DbId,
    pub user_id: DbId,
    pub organization_name: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `PUT /organizers/me`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOrganizer {
    #[validate(length(min = 1, max = 200))]
    pub organization_name: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
}
