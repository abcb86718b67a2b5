//! Booking model and DTOs.

use chrono::{NaiveDate, NaiveTime};
use gigbook_core::booking::{BookingState, Fees};
use gigbook_core::error::CoreError;
use gigbook_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub artist_id: DbId,
    pub organizer_id: DbId,
    pub event_id: Option<DbId>,
    pub application_id: Option<DbId>,
    pub event_title: String,
    pub event_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub venue_name: Option<String>,
    pub venue_address: Option<String>,
    pub total_amount: Money,
    pub platform_fee: Money,
    pub net_amount: Money,
    pub status: String,
    pub payment_status: String,
    pub notes: Option<String>,
    pub paid_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub released_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    pub cancelled_by: Option<DbId>,
    pub cancellation_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Booking {
    /// Parse the stored status pair into the domain state.
    pub fn state(&self) -> Result<BookingState, CoreError> {
        BookingState::parse(&self.status, &self.payment_status)
    }
}

/// A booking with both parties resolved to their user ids and display names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookingDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub booking: Booking,
    pub artist_user_id: DbId,
    pub artist_stage_name: String,
    pub organizer_user_id: DbId,
    pub organization_name: String,
}

/// Request body for `POST /bookings` (an organizer booking an artist directly).
///
/// With `event_id` the event snapshot is copied from the organizer's event;
/// otherwise `event_title` and `event_date` are required.
#[derive(Debug, Deserialize, Validate)]
pub struct BookingRequest {
    pub artist_id: DbId,
    pub event_id: Option<DbId>,
    #[validate(length(min = 1, max = 200))]
    pub event_title: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    #[validate(length(max = 200))]
    pub venue_name: Option<String>,
    #[validate(length(max = 500))]
    pub venue_address: Option<String>,
    pub total_amount: Money,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Request body for `POST /bookings/{id}/cancel`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CancelRequest {
    #[validate(length(max = 2000))]
    pub reason: Option<String>,
}

/// Insert DTO for a booking. Fees are computed before insertion.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub artist_id: DbId,
    pub organizer_id: DbId,
    pub event_id: Option<DbId>,
    pub application_id: Option<DbId>,
    pub event_title: String,
    pub event_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub venue_name: Option<String>,
    pub venue_address: Option<String>,
    pub total_amount: Money,
    pub fees: Fees,
    pub state: BookingState,
    pub notes: Option<String>,
}

/// A conditional status change: applied only while the row is still `from`.
#[derive(Debug, Clone)]
pub struct BookingTransition {
    pub from: BookingState,
    pub to: BookingState,
    /// Recorded on cancellation.
    pub actor_user_id: Option<DbId>,
    pub reason: Option<String>,
}

impl BookingTransition {
    pub fn new(from: BookingState, to: BookingState) -> Self {
        Self {
            from,
            to,
            actor_user_id: None,
            reason: None,
        }
    }

    pub fn by(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    pub fn with_reason(mut self, reason: Option<String>) -> Self {
        self.reason = reason;
        self
    }
}
