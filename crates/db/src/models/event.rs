//! Gig event model and DTOs.

use chrono::{NaiveDate, NaiveTime};
use gigbook_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub organizer_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub event_type: String,
    pub event_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub venue_name: Option<String>,
    pub venue_address: Option<String>,
    pub city: Option<String>,
    pub budget_min: Option<Money>,
    pub budget_max: Option<Money>,
    pub status: String,
    pub is_public: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An event in the public browse listing, with the hosting organization.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub event: Event,
    pub organization_name: String,
}

/// Request body for `POST /events`. New events always start as drafts.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEvent {
    pub title: String,
    #[validate(length(max = 10000))]
    pub description: Option<String>,
    pub event_type: String,
    pub event_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    #[validate(length(max = 200))]
    pub venue_name: Option<String>,
    #[validate(length(max = 500))]
    pub venue_address: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    pub budget_min: Option<Money>,
    pub budget_max: Option<Money>,
    pub is_public: Option<bool>,
}

/// Request body for `PUT /events/{id}`. Only non-`None` fields are applied.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateEvent {
    pub title: Option<String>,
    #[validate(length(max = 10000))]
    pub description: Option<String>,
    pub event_type: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    #[validate(length(max = 200))]
    pub venue_name: Option<String>,
    #[validate(length(max = 500))]
    pub venue_address: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    pub budget_min: Option<Money>,
    pub budget_max: Option<Money>,
    pub is_public: Option<bool>,
}

/// Filters for the public browse listing.
#[derive(Debug, Default)]
pub struct BrowseFilter {
    pub event_type: Option<String>,
    pub city: Option<String>,
    /// Earliest event date to include (normally today).
    pub from_date: NaiveDate,
}
