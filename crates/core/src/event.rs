//! Gig event status constants and validation.
//!
//! An event is created as a `draft` by its organizer and becomes visible to
//! artists once `published`. Only published, public events dated today or
//! later show up in the browse listing.

use chrono::{NaiveDate, NaiveTime};

use crate::booking::validate_amount_ceiling;
use crate::error::CoreError;
use crate::types::Money;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_PUBLISHED: &str = "published";

pub const VALID_STATUSES: &[&str] = &[STATUS_DRAFT, STATUS_PUBLISHED];

/// Event categories accepted on create/update.
pub const EVENT_TYPES: &[&str] = &[
    "concert",
    "wedding",
    "corporate",
    "festival",
    "private_party",
    "club",
    "other",
];

/// Maximum title length in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// Returns the set of statuses that `from_status` may transition to.
///
/// - `draft`     -> `published`
/// - `published` -> `draft` (unpublish)
pub fn valid_transitions(from_status: &str) -> &'static [&'static str] {
    match from_status {
        STATUS_DRAFT => &[STATUS_PUBLISHED],
        STATUS_PUBLISHED => &[STATUS_DRAFT],
        _ => &[],
    }
}

/// Validate that an event may move from `current` to `next`.
pub fn validate_transition(current: &str, next: &str) -> Result<(), CoreError> {
    if valid_transitions(current).contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Event is already '{current}', cannot move it to '{next}'"
        )))
    }
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Validate the event title: non-blank and at most [`MAX_TITLE_LENGTH`] chars.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Event title must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Event title exceeds {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate the event category against [`EVENT_TYPES`].
pub fn validate_event_type(event_type: &str) -> Result<(), CoreError> {
    if EVENT_TYPES.contains(&event_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown event type '{event_type}'. Must be one of: {}",
            EVENT_TYPES.join(", ")
        )))
    }
}

/// Validate the date/time window of an event.
///
/// The date must not be before `today`. When both times are given the end
/// must be strictly after the start; events do not span midnight.
pub fn validate_schedule(
    event_date: NaiveDate,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    today: NaiveDate,
) -> Result<(), CoreError> {
    if event_date < today {
        return Err(CoreError::Validation(format!(
            "Event date {event_date} is in the past"
        )));
    }
    if let (Some(start), Some(end)) = (start_time, end_time) {
        if end <= start {
            return Err(CoreError::Validation(
                "Event end time must be after its start time".into(),
            ));
        }
    }
    Ok(())
}

/// Validate the budget range. Either bound may be absent.
pub fn validate_budget(min: Option<Money>, max: Option<Money>) -> Result<(), CoreError> {
    for bound in [min, max].into_iter().flatten() {
        if bound.is_sign_negative() {
            return Err(CoreError::Validation("Budget must not be negative".into()));
        }
        validate_amount_ceiling("Budget", bound)?;
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(CoreError::Validation(format!(
                "Budget minimum {min} exceeds maximum {max}"
            )));
        }
    }
    Ok(())
}

/// Whether an event dated `event_date` still counts as upcoming on `today`.
///
/// Events happening today are upcoming for the whole day.
pub fn is_upcoming(event_date: NaiveDate, today: NaiveDate) -> bool {
    event_date >= today
}

/// Whether artists may see and apply to an event in this state.
pub fn is_open_for_applications(
    status: &str,
    is_public: bool,
    event_date: NaiveDate,
    today: NaiveDate,
) -> bool {
    status == STATUS_PUBLISHED && is_public && is_upcoming(event_date, today)
}
