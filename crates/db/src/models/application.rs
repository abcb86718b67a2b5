//! Event application model and DTOs.

use chrono::NaiveDate;
use gigbook_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `event_applications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventApplication {
    pub id: DbId,
    pub event_id: DbId,
    pub artist_id: DbId,
    pub proposed_rate: Option<Money>,
    pub cover_message: Option<String>,
    pub application_status: String,
    pub organizer_response: Option<String>,
    pub responded_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An application as the event owner sees it: with the applying artist.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApplicationWithArtist {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: EventApplication,
    pub stage_name: String,
    pub genre: Option<String>,
    pub base_rate: Option<Money>,
}

/// An application as the artist sees it: with the event applied to.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApplicationWithEvent {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: EventApplication,
    pub event_title: String,
    pub event_date: NaiveDate,
    pub event_city: Option<String>,
}

/// Request body for `POST /event-applications/{event_id}/apply`.
#[derive(Debug, Default, Deserialize)]
pub struct ApplyRequest {
    pub proposed_rate: Option<Money>,
    pub cover_message: Option<String>,
}

/// Request body for the approve endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ApproveRequest {
    pub organizer_response: Option<String>,
    /// Overrides the proposed rate / event budget as the booking total.
    pub total_amount: Option<Money>,
}

/// Request body for the reject endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct RejectRequest {
    pub organizer_response: Option<String>,
}

/// Insert DTO for a new application.
#[derive(Debug)]
pub struct CreateApplication {
    pub event_id: DbId,
    pub artist_id: DbId,
    pub proposed_rate: Option<Money>,
    pub cover_message: Option<String>,
}
