//! Artist profile model and DTOs.

use gigbook_core::review::RatingSummary;
use gigbook_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `artists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Artist {
    pub id: DbId,
    pub user_id: DbId,
    pub stage_name: String,
    pub genre: Option<String>,
    pub bio: Option<String>,
    pub base_rate: Option<Money>,
    pub city: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public artist profile enriched with the ratings the artist has received.
#[derive(Debug, Clone, Serialize)]
pub struct ArtistProfile {
    #[serde(flatten)]
    pub artist: Artist,
    pub is_verified: bool,
    pub rating: RatingSummary,
}

/// Request body for `PUT /artists/me`. All fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateArtist {
    #[validate(length(min = 1, max = 100))]
    pub stage_name: Option<String>,
    #[validate(length(max = 50))]
    pub genre: Option<String>,
    #[validate(length(max = 5000))]
    pub bio: Option<String>,
    pub base_rate: Option<Money>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
}

/// Filters for the artist directory listing.
#[derive(Debug, Default)]
pub struct ArtistFilter {
    pub genre: Option<String>,
    pub city: Option<String>,
}
