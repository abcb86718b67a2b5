//! Post-booking ratings.
//!
//! Once a booking is completed each party may rate the other exactly once.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::booking::BookingStatus;
use crate::error::CoreError;
use crate::types::DbId;

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;
pub const MAX_REVIEW_TEXT_LENGTH: usize = 2_000;

/// Validate a single star rating.
pub fn validate_rating(field: &str, rating: i16) -> Result<(), CoreError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{field} must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )))
    }
}

/// Validate the overall rating and every sub-rating that was provided.
pub fn validate_ratings(overall: i16, sub_ratings: &[(&str, Option<i16>)]) -> Result<(), CoreError> {
    validate_rating("rating", overall)?;
    for (field, value) in sub_ratings {
        if let Some(v) = value {
            validate_rating(field, *v)?;
        }
    }
    Ok(())
}

pub fn validate_review_text(text: Option<&str>) -> Result<(), CoreError> {
    match text {
        Some(t) if t.chars().count() > MAX_REVIEW_TEXT_LENGTH => Err(CoreError::Validation(
            format!("Review text exceeds {MAX_REVIEW_TEXT_LENGTH} characters"),
        )),
        _ => Ok(()),
    }
}

/// Decide who is being reviewed when `reviewer_id` rates a booking.
///
/// Only the two parties of a completed booking may leave a review; the
/// reviewee is always the other party.
pub fn reviewee_for(
    booking_status: BookingStatus,
    reviewer_id: DbId,
    artist_user_id: DbId,
    organizer_user_id: DbId,
) -> Result<DbId, CoreError> {
    if booking_status != BookingStatus::Completed {
        return Err(CoreError::Conflict(format!(
            "Only completed bookings can be reviewed (booking is '{booking_status}')"
        )));
    }
    if reviewer_id == artist_user_id {
        Ok(organizer_user_id)
    } else if reviewer_id == organizer_user_id {
        Ok(artist_user_id)
    } else {
        Err(CoreError::Forbidden(
            "Only the parties of a booking can review it".into(),
        ))
    }
}

/// Aggregate view of the ratings a user has received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingSummary {
    pub review_count: i64,
    /// Mean of overall ratings rounded to two decimals, `None` without reviews.
    pub average_rating: Option<Decimal>,
    /// Share of reviews that would recommend, in percent, two decimals.
    pub recommend_percent: Option<Decimal>,
}

impl RatingSummary {
    /// Build a summary from `(rating, would_recommend)` pairs.
    pub fn from_ratings(ratings: &[(i16, bool)]) -> Self {
        let count = ratings.len() as i64;
        if count == 0 {
            return Self {
                review_count: 0,
                average_rating: None,
                recommend_percent: None,
            };
        }

        let total: i64 = ratings.iter().map(|(r, _)| i64::from(*r)).sum();
        let recommends = ratings.iter().filter(|(_, rec)| *rec).count() as i64;

        Self {
            review_count: count,
            average_rating: Some(ratio(total, count, Decimal::ONE)),
            recommend_percent: Some(ratio(recommends, count, Decimal::ONE_HUNDRED)),
        }
    }
}

/// Rounded and padded to exactly two decimals, so `50` renders as `50.00`.
fn ratio(numerator: i64, denominator: i64, scale: Decimal) -> Decimal {
    let mut value = (Decimal::from(numerator) * scale / Decimal::from(denominator))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(2);
    value
}
