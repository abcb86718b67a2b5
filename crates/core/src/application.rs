//! Event application statuses and decision rules.

use crate::booking::validate_amount_ceiling;
use crate::error::CoreError;
use crate::types::Money;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_APPROVED, STATUS_REJECTED];

/// Maximum length of an artist's cover message or an organizer's response.
pub const MAX_MESSAGE_LENGTH: usize = 2_000;

/// Only pending applications can be decided; decisions are final.
pub fn validate_decision(current: &str, next: &str) -> Result<(), CoreError> {
    if next != STATUS_APPROVED && next != STATUS_REJECTED {
        return Err(CoreError::Validation(format!(
            "Invalid application decision '{next}'"
        )));
    }
    if current != STATUS_PENDING {
        return Err(CoreError::Conflict(format!(
            "Application has already been {current}"
        )));
    }
    Ok(())
}

/// Validate an optional status filter from a query string.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid application status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// A proposed rate, when given, must be strictly positive and storable.
pub fn validate_proposed_rate(rate: Option<Money>) -> Result<(), CoreError> {
    match rate {
        Some(r) if r.is_sign_negative() || r.is_zero() => Err(CoreError::Validation(
            "Proposed rate must be greater than zero".into(),
        )),
        Some(r) => validate_amount_ceiling("Proposed rate", r),
        None => Ok(()),
    }
}

/// Validate the length of a free-text message.
pub fn validate_message(field: &str, message: Option<&str>) -> Result<(), CoreError> {
    if let Some(m) = message {
        if m.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(CoreError::Validation(format!(
                "{field} exceeds {MAX_MESSAGE_LENGTH} characters"
            )));
        }
    }
    Ok(())
}

/// Pick the booking total for an approved application.
///
/// An explicit amount from the organizer wins, then the artist's proposed
/// rate, then the top of the event budget.
pub fn resolve_booking_amount(
    explicit: Option<Money>,
    proposed_rate: Option<Money>,
    budget_max: Option<Money>,
) -> Result<Money, CoreError> {
    explicit.or(proposed_rate).or(budget_max).ok_or_else(|| {
        CoreError::Validation(
            "total_amount is required: the application has no proposed rate \
             and the event has no budget"
                .into(),
        )
    })
}
