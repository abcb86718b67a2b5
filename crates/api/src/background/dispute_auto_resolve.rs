//! Periodic auto-resolution of unanswered disputes.
//!
//! An open dispute whose `auto_resolve_date` has passed without an artist
//! response is resolved in the organizer's favour: the booking is
//! cancelled and its escrow refunded. Disputes the artist answered stay
//! open for an admin.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use gigbook_core::dispute::{auto_resolution, is_due};
use gigbook_core::types::Timestamp;
use gigbook_db::repositories::DisputeRepo;
use gigbook_db::DbPool;
use gigbook_events::EventBus;
use tokio_util::sync::CancellationToken;

use crate::engine::dispute_resolution;
use crate::error::AppResult;

/// Disputes handled per sweep; the rest wait for the next tick.
const BATCH_SIZE: i64 = 100;

/// Run the sweep every `interval` until `cancel` is triggered.
pub async fn run(
    pool: DbPool,
    bus: Arc<EventBus>,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Dispute auto-resolution job started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Dispute auto-resolution job stopping");
                break;
            }
            _ = ticker.tick() => {
                match sweep(&pool, &bus, Utc::now()).await {
                    Ok(0) => tracing::debug!("Dispute sweep: nothing due"),
                    Ok(resolved) => tracing::info!(resolved, "Dispute sweep: auto-resolved disputes"),
                    Err(e) => tracing::error!(error = %e, "Dispute sweep failed"),
                }
            }
        }
    }
}

/// Resolve every dispute due at `now`. Returns how many were resolved.
///
/// A dispute that fails (for instance because an admin resolved it
/// concurrently) is logged and skipped; the others still run.
pub async fn sweep(pool: &DbPool, bus: &EventBus, now: Timestamp) -> AppResult<usize> {
    let due = DisputeRepo::list_due(pool, now, BATCH_SIZE).await?;
    let mut resolved = 0;

    for dispute in due {
        if !is_due(&dispute.status, dispute.auto_resolve_date, now) {
            continue;
        }
        let Some(resolution) = auto_resolution(dispute.artist_response.is_some()) else {
            continue;
        };

        match dispute_resolution::resolve(
            pool,
            bus,
            dispute.id,
            resolution,
            Some("Auto-resolved: no artist response within the dispute window"),
            None,
        )
        .await
        {
            Ok(_) => resolved += 1,
            Err(e) => {
                tracing::warn!(dispute_id = dispute.id, error = %e, "Auto-resolution skipped");
            }
        }
    }

    Ok(resolved)
}
