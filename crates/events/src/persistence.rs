//! Durable activity persistence.
//!
//! [`EventPersistence`] subscribes to the [`EventBus`](crate::EventBus) and
//! appends every received [`PlatformEvent`] to `activity_log`, where the
//! booking timeline and the admin activity feed read it back.

use gigbook_core::types::DbId;
use gigbook_db::models::activity::CreateActivity;
use gigbook_db::repositories::ActivityRepo;
use gigbook_db::DbPool;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::bus::PlatformEvent;

pub struct EventPersistence;

impl EventPersistence {
    /// Run the persistence loop until `cancel` fires or the bus is dropped.
    ///
    /// Events still buffered when cancellation arrives are drained first.
    pub async fn run(
        pool: DbPool,
        mut receiver: broadcast::Receiver<PlatformEvent>,
        cancel: CancellationToken,
    ) {
        tracing::info!("Activity persistence started");

        loop {
            let received = tokio::select! {
                _ = cancel.cancelled() => break,
                received = receiver.recv() => received,
            };
            match received {
                Ok(event) => Self::persist_logged(&pool, &event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Activity persistence lagged, events lost");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, activity persistence stopping");
                    return;
                }
            }
        }

        while let Ok(event) = receiver.try_recv() {
            Self::persist_logged(&pool, &event).await;
        }
        tracing::info!("Activity persistence stopped");
    }

    async fn persist_logged(pool: &DbPool, event: &PlatformEvent) {
        if let Err(e) = Self::persist(pool, event).await {
            tracing::error!(
                error = %e,
                event_type = %event.event_type,
                "Failed to persist activity"
            );
        }
    }

    /// Append a single event to `activity_log`.
    pub async fn persist(pool: &DbPool, event: &PlatformEvent) -> Result<DbId, sqlx::Error> {
        ActivityRepo::insert(
            pool,
            &CreateActivity {
                event_type: &event.event_type,
                source_entity_type: event.source_entity_type.as_deref(),
                source_entity_id: event.source_entity_id,
                actor_user_id: event.actor_user_id,
                payload: &event.payload,
            },
        )
        .await
    }
}
