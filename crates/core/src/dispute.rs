//! Non-delivery disputes and their auto-resolution rule.

use chrono::Duration;

use crate::booking::BookingAction;
use crate::error::CoreError;
use crate::types::Timestamp;

pub const STATUS_OPEN: &str = "open";
pub const STATUS_RESOLVED: &str = "resolved";

pub const VALID_STATUSES: &[&str] = &[STATUS_OPEN, STATUS_RESOLVED];

/// Days an organizer's report stays open before it auto-resolves.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;
pub const MAX_WINDOW_DAYS: i64 = 365;

pub const MIN_DESCRIPTION_LENGTH: usize = 10;
pub const MAX_DESCRIPTION_LENGTH: usize = 5_000;

/// How a dispute was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Escrow goes back to the organizer; the booking is cancelled.
    RefundOrganizer,
    /// Escrow is released to the artist; the booking is completed.
    ReleaseArtist,
}

impl Resolution {
    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::RefundOrganizer => "refund_organizer",
            Resolution::ReleaseArtist => "release_artist",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "refund_organizer" => Ok(Resolution::RefundOrganizer),
            "release_artist" => Ok(Resolution::ReleaseArtist),
            other => Err(CoreError::Validation(format!(
                "Invalid resolution '{other}'. Must be one of: refund_organizer, release_artist"
            ))),
        }
    }

    /// The booking action that carries out this resolution.
    pub fn booking_action(self) -> BookingAction {
        match self {
            Resolution::RefundOrganizer => BookingAction::ResolveRefund,
            Resolution::ReleaseArtist => BookingAction::ResolveRelease,
        }
    }
}

/// A configured auto-resolution window must be 1 to [`MAX_WINDOW_DAYS`] days.
pub fn validate_window_days(days: i64) -> Result<(), CoreError> {
    if (1..=MAX_WINDOW_DAYS).contains(&days) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Dispute window must be between 1 and {MAX_WINDOW_DAYS} days, got {days}"
        )))
    }
}

/// When a dispute opened at `opened_at` becomes eligible for auto-resolution.
///
/// The window is clamped to `0..=MAX_WINDOW_DAYS`.
pub fn auto_resolve_date(opened_at: Timestamp, window_days: i64) -> Timestamp {
    opened_at + Duration::days(window_days.clamp(0, MAX_WINDOW_DAYS))
}

/// The outcome the sweeper applies to an expired open dispute.
///
/// Silence from the artist confirms the organizer's report. Once the artist
/// has answered, the dispute needs an admin and is left open.
pub fn auto_resolution(has_artist_response: bool) -> Option<Resolution> {
    if has_artist_response {
        None
    } else {
        Some(Resolution::RefundOrganizer)
    }
}

/// Whether an open dispute is due for the auto-resolution sweep at `now`.
pub fn is_due(status: &str, auto_resolve_date: Timestamp, now: Timestamp) -> bool {
    status == STATUS_OPEN && auto_resolve_date <= now
}

/// Validate the organizer's issue description (trimmed length).
pub fn validate_issue_description(description: &str) -> Result<(), CoreError> {
    let len = description.trim().chars().count();
    if len < MIN_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Issue description must be at least {MIN_DESCRIPTION_LENGTH} characters"
        )));
    }
    if len > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Issue description exceeds {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a status filter from a query string.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid dispute status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}
