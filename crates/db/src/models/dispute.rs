//! Dispute model and DTOs.

use gigbook_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `disputes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Dispute {
    pub id: DbId,
    pub booking_id: DbId,
    pub reporter_id: DbId,
    pub issue_description: String,
    pub evidence: Option<String>,
    pub auto_resolve_date: Timestamp,
    pub status: String,
    pub artist_response: Option<String>,
    pub responded_at: Option<Timestamp>,
    pub resolution: Option<String>,
    pub resolution_notes: Option<String>,
    /// `None` on a resolved dispute means it was auto-resolved.
    pub resolved_by: Option<DbId>,
    pub resolved_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /disputes/bookings/{id}/report-non-delivery`.
#[derive(Debug, Deserialize, Validate)]
pub struct ReportNonDelivery {
    pub issue_description: String,
    #[validate(length(max = 5000))]
    pub evidence: Option<String>,
}

/// Request body for `POST /disputes/{id}/respond`.
#[derive(Debug, Deserialize, Validate)]
pub struct RespondRequest {
    #[validate(length(min = 1, max = 5000, message = "response must be 1-5000 characters"))]
    pub response: String,
}

/// Request body for `POST /admin/disputes/{id}/resolve`.
#[derive(Debug, Deserialize, Validate)]
pub struct ResolveRequest {
    pub resolution: String,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

/// Insert DTO for a new dispute.
#[derive(Debug)]
pub struct CreateDispute {
    pub booking_id: DbId,
    pub reporter_id: DbId,
    pub issue_description: String,
    pub evidence: Option<String>,
    pub auto_resolve_date: Timestamp,
}
