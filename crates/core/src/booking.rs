//! Booking lifecycle and escrow payment status machine.
//!
//! A booking carries two status columns that only ever change together,
//! through [`next_state`]:
//!
//! ```text
//! status:          pending -> confirmed -> completed
//!                        \          \
//!                         -> cancelled <-
//! payment_status:  pending -> paid -> released
//!                                \
//!                                 -> refunded
//! ```
//!
//! The repository layer applies the computed state with a conditional
//! update on the previous state, so two racing transitions cannot both win.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Money};

// ---------------------------------------------------------------------------
// Statuses
// ---------------------------------------------------------------------------

/// Lifecycle status of a booking (`bookings.status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

/// Escrow status of the booking payment (`bookings.payment_status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Released,
    Refunded,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Terminal statuses accept no further lifecycle actions.
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Released => "released",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Invalid booking status '{other}'"
            ))),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "released" => Ok(PaymentStatus::Released),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(CoreError::Validation(format!(
                "Invalid payment status '{other}'"
            ))),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The pair of status columns that together describe where a booking is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingState {
    pub status: BookingStatus,
    pub payment: PaymentStatus,
}

impl BookingState {
    pub const fn new(status: BookingStatus, payment: PaymentStatus) -> Self {
        Self { status, payment }
    }

    /// Parse the raw column values of a booking row.
    pub fn parse(status: &str, payment_status: &str) -> Result<Self, CoreError> {
        Ok(Self {
            status: status.parse()?,
            payment: payment_status.parse()?,
        })
    }

    /// Whether the escrow currently holds the organizer's money.
    pub fn holds_funds(self) -> bool {
        self.payment == PaymentStatus::Paid
    }
}

impl fmt::Display for BookingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.status, self.payment)
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Every operation that may change a booking's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    /// Artist accepts a direct booking request.
    Accept,
    /// Artist declines a direct booking request.
    Decline,
    /// Organizer pays the booking total into escrow.
    Pay,
    /// Organizer confirms delivery; escrow is released to the artist.
    Complete,
    /// Either party calls the booking off; paid escrow is refunded.
    Cancel,
    /// Organizer reports non-delivery.
    OpenDispute,
    /// Dispute resolved in the organizer's favour.
    ResolveRefund,
    /// Dispute resolved in the artist's favour.
    ResolveRelease,
}

impl BookingAction {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingAction::Accept => "accept",
            BookingAction::Decline => "decline",
            BookingAction::Pay => "pay",
            BookingAction::Complete => "complete",
            BookingAction::Cancel => "cancel",
            BookingAction::OpenDispute => "dispute",
            BookingAction::ResolveRefund => "refund",
            BookingAction::ResolveRelease => "release",
        }
    }
}

/// Compute the state a booking moves to when `action` is applied.
///
/// `has_open_dispute` freezes the escrow: while a dispute is open only the
/// two resolution actions may touch a paid booking.
pub fn next_state(
    action: BookingAction,
    current: BookingState,
    has_open_dispute: bool,
) -> Result<BookingState, CoreError> {
    use BookingAction as A;
    use BookingStatus as S;
    use PaymentStatus as P;

    let frozen = || {
        CoreError::Conflict(format!(
            "Cannot {} booking while a dispute is open",
            action.as_str()
        ))
    };

    let next = match (action, current.status, current.payment) {
        (A::Accept, S::Pending, P::Pending) => BookingState::new(S::Confirmed, P::Pending),
        (A::Decline, S::Pending, P::Pending) => BookingState::new(S::Cancelled, P::Pending),
        (A::Pay, S::Confirmed, P::Pending) => BookingState::new(S::Confirmed, P::Paid),

        (A::Complete, S::Confirmed, P::Paid) => {
            if has_open_dispute {
                return Err(frozen());
            }
            BookingState::new(S::Completed, P::Released)
        }

        (A::Cancel, S::Pending | S::Confirmed, P::Pending) => {
            BookingState::new(S::Cancelled, P::Pending)
        }
        (A::Cancel, S::Confirmed, P::Paid) => {
            if has_open_dispute {
                return Err(frozen());
            }
            BookingState::new(S::Cancelled, P::Refunded)
        }

        (A::OpenDispute, S::Confirmed, P::Paid) => {
            if has_open_dispute {
                return Err(CoreError::Conflict(
                    "A dispute is already open for this booking".into(),
                ));
            }
            current
        }

        (A::ResolveRefund | A::ResolveRelease, S::Confirmed, P::Paid) => {
            if !has_open_dispute {
                return Err(CoreError::Conflict(
                    "Booking has no open dispute to resolve".into(),
                ));
            }
            if action == A::ResolveRefund {
                BookingState::new(S::Cancelled, P::Refunded)
            } else {
                BookingState::new(S::Completed, P::Released)
            }
        }

        _ => {
            return Err(CoreError::invalid_transition(
                "booking",
                action.as_str(),
                &current.to_string(),
            ))
        }
    };

    Ok(next)
}

// ---------------------------------------------------------------------------
// Actor rules
// ---------------------------------------------------------------------------

/// Who is attempting an action, relative to a specific booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingParty {
    Artist,
    Organizer,
    Admin,
    /// Authenticated but not a party to this booking.
    Outsider,
}

/// Resolve the caller's relation to a booking from user ids and role.
pub fn party_for(
    user_id: DbId,
    is_admin: bool,
    artist_user_id: DbId,
    organizer_user_id: DbId,
) -> BookingParty {
    if user_id == artist_user_id {
        BookingParty::Artist
    } else if user_id == organizer_user_id {
        BookingParty::Organizer
    } else if is_admin {
        BookingParty::Admin
    } else {
        BookingParty::Outsider
    }
}

/// Check that `party` is allowed to perform `action`.
pub fn authorize(action: BookingAction, party: BookingParty) -> Result<(), CoreError> {
    use BookingAction as A;
    use BookingParty as P;

    let allowed = match action {
        A::Accept | A::Decline => party == P::Artist,
        A::Pay | A::Complete | A::OpenDispute => party == P::Organizer,
        A::Cancel => matches!(party, P::Artist | P::Organizer),
        A::ResolveRefund | A::ResolveRelease => party == P::Admin,
    };

    if allowed {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Not allowed to {} this booking",
            action.as_str()
        )))
    }
}

// ---------------------------------------------------------------------------
// Money
// ---------------------------------------------------------------------------

/// Default platform commission, in percent of the booking total.
pub const DEFAULT_PLATFORM_FEE_PERCENT: u32 = 10;

/// Platform fee split of a booking total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fees {
    pub platform_fee: Money,
    pub net_amount: Money,
}

/// Largest value the `NUMERIC(12,2)` money columns hold.
pub fn max_amount() -> Money {
    Decimal::new(999_999_999_999, 2)
}

/// Reject amounts the money columns cannot store.
pub fn validate_amount_ceiling(label: &str, amount: Money) -> Result<(), CoreError> {
    if amount > max_amount() {
        return Err(CoreError::Validation(format!(
            "{label} must not exceed {}",
            max_amount()
        )));
    }
    Ok(())
}

/// An optional rate such as an artist's `base_rate`: zero or more, within
/// the money column range.
pub fn validate_optional_rate(label: &str, rate: Option<Money>) -> Result<(), CoreError> {
    let Some(rate) = rate else {
        return Ok(());
    };
    if rate.is_sign_negative() {
        return Err(CoreError::Validation(format!("{label} must not be negative")));
    }
    validate_amount_ceiling(label, rate)
}

/// Validate a booking total: strictly positive, storable, with at most two
/// decimals.
pub fn validate_total_amount(total: Money) -> Result<(), CoreError> {
    if total.is_sign_negative() || total.is_zero() {
        return Err(CoreError::Validation(
            "Booking amount must be greater than zero".into(),
        ));
    }
    validate_amount_ceiling("Booking amount", total)?;
    if total.normalize().scale() > 2 {
        return Err(CoreError::Validation(
            "Booking amount must have at most two decimal places".into(),
        ));
    }
    Ok(())
}

/// Split `total` into platform fee and artist net amount.
///
/// The fee is rounded half away from zero to cents; the net amount is the
/// remainder, so `platform_fee + net_amount == total` always holds.
pub fn compute_fees(total: Money, fee_percent: Decimal) -> Result<Fees, CoreError> {
    validate_total_amount(total)?;
    if fee_percent.is_sign_negative() || fee_percent > Decimal::ONE_HUNDRED {
        return Err(CoreError::Validation(format!(
            "Platform fee percent {fee_percent} must be between 0 and 100"
        )));
    }

    let platform_fee = (total * fee_percent / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let net_amount = total - platform_fee;

    Ok(Fees {
        platform_fee,
        net_amount,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
