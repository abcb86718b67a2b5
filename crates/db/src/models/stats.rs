//! Dashboard aggregates.

use gigbook_core::types::Money;
use serde::Serialize;
use sqlx::FromRow;

/// Platform-wide counts and escrow totals for the admin dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlatformStats {
    pub total_users: i64,
    pub total_artists: i64,
    pub total_organizers: i64,
    pub total_events: i64,
    pub published_events: i64,
    pub total_bookings: i64,
    pub pending_bookings: i64,
    pub confirmed_bookings: i64,
    pub completed_bookings: i64,
    pub cancelled_bookings: i64,
    pub open_disputes: i64,
    /// Sum of totals currently paid into escrow.
    pub escrow_held: Money,
    /// Sum of net amounts released to artists.
    pub released_to_artists: Money,
    pub refunded_to_organizers: Money,
    /// Fees earned on released bookings.
    pub platform_fees_earned: Money,
}

/// Per-organizer counts for the organizer dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrganizerStats {
    pub total_events: i64,
    pub published_events: i64,
    pub upcoming_events: i64,
    pub pending_applications: i64,
    pub total_bookings: i64,
    pub confirmed_bookings: i64,
    pub completed_bookings: i64,
    pub open_disputes: i64,
    pub total_spent: Money,
    pub escrow_held: Money,
}
