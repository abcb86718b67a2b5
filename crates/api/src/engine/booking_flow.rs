//! Party-initiated booking actions.
//!
//! Every action follows the same steps: resolve the caller's relation to
//! the booking, check the actor rules, compute the next state with
//! [`next_state`], then persist it conditionally so that a concurrent
//! change makes this request fail with 409 instead of overwriting it.

use gigbook_core::booking::{
    authorize, next_state, party_for, BookingAction, BookingParty, PaymentStatus,
};
use gigbook_core::error::CoreError;
use gigbook_core::types::DbId;
use gigbook_db::models::booking::{Booking, BookingDetail, BookingTransition};
use gigbook_db::repositories::{BookingRepo, DisputeRepo};
use gigbook_events::{catalog, PlatformEvent};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Load a booking with its parties, or 404.
pub async fn load_detail(state: &AppState, booking_id: DbId) -> AppResult<BookingDetail> {
    BookingRepo::find_detail(&state.pool, booking_id)
        .await?
        .ok_or_else(|| AppError::not_found("Booking", booking_id))
}

/// The caller's relation to a booking.
pub fn party_of(detail: &BookingDetail, user: &AuthUser) -> BookingParty {
    party_for(
        user.user_id,
        user.is_admin(),
        detail.artist_user_id,
        detail.organizer_user_id,
    )
}

/// Load a booking the caller may see: its two parties and admins.
///
/// Outsiders get 404 rather than learning that the booking exists.
pub async fn load_visible(
    state: &AppState,
    booking_id: DbId,
    user: &AuthUser,
) -> AppResult<BookingDetail> {
    let detail = load_detail(state, booking_id).await?;
    if party_of(&detail, user) == BookingParty::Outsider {
        return Err(AppError::not_found("Booking", booking_id));
    }
    Ok(detail)
}

/// Perform `action` on a booking on behalf of `user`.
///
/// `reason` is recorded only when the action cancels the booking.
pub async fn perform(
    state: &AppState,
    booking_id: DbId,
    action: BookingAction,
    user: &AuthUser,
    reason: Option<String>,
) -> AppResult<Booking> {
    let detail = load_visible(state, booking_id, user).await?;
    authorize(action, party_of(&detail, user))?;

    let current = detail.booking.state()?;
    let has_open_dispute = DisputeRepo::has_open_for_booking(&state.pool, booking_id).await?;
    let next = next_state(action, current, has_open_dispute)?;

    let transition = BookingTransition::new(current, next)
        .by(user.user_id)
        .with_reason(reason);
    let booking = BookingRepo::apply_transition(&state.pool, booking_id, &transition)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Booking was changed by another request; reload and try again".into(),
            ))
        })?;

    tracing::info!(
        booking_id,
        user_id = user.user_id,
        action = action.as_str(),
        from = %current,
        to = %next,
        "Booking transitioned"
    );

    for event_type in events_for(action, next.payment) {
        state.publish(
            PlatformEvent::new(event_type)
                .with_source(catalog::ENTITY_BOOKING, booking.id)
                .with_actor(user.user_id)
                .with_payload(serde_json::json!({
                    "status": booking.status,
                    "payment_status": booking.payment_status,
                    "total_amount": booking.total_amount,
                    "net_amount": booking.net_amount,
                })),
        );
    }

    Ok(booking)
}

/// Activity events announcing a completed booking action.
fn events_for(action: BookingAction, payment_after: PaymentStatus) -> Vec<&'static str> {
    match action {
        BookingAction::Accept => vec![catalog::BOOKING_CONFIRMED],
        BookingAction::Decline => vec![catalog::BOOKING_DECLINED],
        BookingAction::Pay => vec![catalog::BOOKING_PAID],
        BookingAction::Complete => vec![catalog::BOOKING_COMPLETED, catalog::PAYMENT_RELEASED],
        BookingAction::Cancel if payment_after == PaymentStatus::Refunded => {
            vec![catalog::BOOKING_CANCELLED, catalog::PAYMENT_REFUNDED]
        }
        BookingAction::Cancel => vec![catalog::BOOKING_CANCELLED],
        BookingAction::ResolveRefund => vec![catalog::PAYMENT_REFUNDED],
        BookingAction::ResolveRelease => vec![catalog::PAYMENT_RELEASED],
        BookingAction::OpenDispute => vec![catalog::DISPUTE_OPENED],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completing_announces_release() {
        assert_eq!(
            events_for(BookingAction::Complete, PaymentStatus::Released),
            vec!["booking.completed", "payment.released"]
        );
    }

    #[test]
    fn cancelling_a_paid_booking_announces_refund() {
        assert_eq!(
            events_for(BookingAction::Cancel, PaymentStatus::Refunded),
            vec!["booking.cancelled", "payment.refunded"]
        );
        assert_eq!(
            events_for(BookingAction::Cancel, PaymentStatus::Pending),
            vec!["booking.cancelled"]
        );
    }
}
