//! Review model and DTOs.

use gigbook_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub booking_id: DbId,
    pub reviewer_id: DbId,
    pub reviewee_id: DbId,
    pub rating: i16,
    pub professionalism: Option<i16>,
    pub communication: Option<i16>,
    pub punctuality: Option<i16>,
    pub quality: Option<i16>,
    pub review_text: Option<String>,
    pub would_recommend: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A received review with the reviewer's display name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewWithReviewer {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub review: Review,
    pub reviewer_name: String,
}

/// Request body for `POST /reviews/bookings/{id}`.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: i16,
    pub professionalism: Option<i16>,
    pub communication: Option<i16>,
    pub punctuality: Option<i16>,
    pub quality: Option<i16>,
    pub review_text: Option<String>,
    pub would_recommend: Option<bool>,
}

/// Insert DTO for a review; the reviewee is derived from the booking.
#[derive(Debug)]
pub struct CreateReview {
    pub booking_id: DbId,
    pub reviewer_id: DbId,
    pub reviewee_id: DbId,
    pub rating: i16,
    pub professionalism: Option<i16>,
    pub communication: Option<i16>,
    pub punctuality: Option<i16>,
    pub quality: Option<i16>,
    pub review_text: Option<String>,
    pub would_recommend: bool,
}
