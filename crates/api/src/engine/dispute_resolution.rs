//! Settling a dispute: the dispute is closed and the escrow is moved in one
//! transaction, for both admin decisions and the auto-resolution sweep.

use gigbook_core::booking::next_state;
use gigbook_core::dispute::{Resolution, STATUS_OPEN};
use gigbook_core::error::CoreError;
use gigbook_core::types::DbId;
use gigbook_db::models::booking::{Booking, BookingTransition};
use gigbook_db::models::dispute::Dispute;
use gigbook_db::repositories::dispute_repo::DisputeResolution;
use gigbook_db::repositories::{BookingRepo, DisputeRepo};
use gigbook_db::DbPool;
use gigbook_events::{catalog, EventBus, PlatformEvent};

use crate::error::{AppError, AppResult};

/// Resolve an open dispute.
///
/// `resolved_by` is the admin's user id, or `None` for auto-resolution.
pub async fn resolve(
    pool: &DbPool,
    bus: &EventBus,
    dispute_id: DbId,
    resolution: Resolution,
    notes: Option<&str>,
    resolved_by: Option<DbId>,
) -> AppResult<(Dispute, Booking)> {
    let dispute = DisputeRepo::find_by_id(pool, dispute_id)
        .await?
        .ok_or_else(|| AppError::not_found("Dispute", dispute_id))?;
    if dispute.status != STATUS_OPEN {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Dispute {dispute_id} is already resolved"
        ))));
    }

    let booking = BookingRepo::find_by_id(pool, dispute.booking_id)
        .await?
        .ok_or_else(|| AppError::not_found("Booking", dispute.booking_id))?;
    let current = booking.state()?;
    let next = next_state(resolution.booking_action(), current, true)?;

    let mut transition = BookingTransition::new(current, next).with_reason(Some(format!(
        "Dispute {dispute_id} resolved: {}",
        resolution.as_str()
    )));
    if let Some(admin_id) = resolved_by {
        transition = transition.by(admin_id);
    }

    let closing = DisputeResolution {
        resolution: resolution.as_str(),
        notes,
        resolved_by,
    };
    let (dispute, booking) = DisputeRepo::resolve(pool, dispute_id, &closing, &transition)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Dispute or booking was changed by another request".into(),
            ))
        })?;

    tracing::info!(
        dispute_id,
        booking_id = booking.id,
        resolution = resolution.as_str(),
        resolved_by = ?resolved_by,
        to = %next,
        "Dispute resolved"
    );

    let payment_event = match resolution {
        Resolution::RefundOrganizer => catalog::PAYMENT_REFUNDED,
        Resolution::ReleaseArtist => catalog::PAYMENT_RELEASED,
    };
    let auto_resolved = resolved_by.is_none();

    let mut resolved = PlatformEvent::new(catalog::DISPUTE_RESOLVED)
        .with_source(catalog::ENTITY_DISPUTE, dispute.id)
        .with_payload(serde_json::json!({
            "booking_id": booking.id,
            "resolution": resolution.as_str(),
            "auto_resolved": auto_resolved,
        }));
    let mut payment = PlatformEvent::new(payment_event)
        .with_source(catalog::ENTITY_BOOKING, booking.id)
        .with_payload(serde_json::json!({
            "dispute_id": dispute.id,
            "total_amount": booking.total_amount,
            "net_amount": booking.net_amount,
        }));
    if let Some(admin_id) = resolved_by {
        resolved = resolved.with_actor(admin_id);
        payment = payment.with_actor(admin_id);
    }
    bus.publish(resolved);
    bus.publish(payment);

    Ok((dispute, booking))
}
