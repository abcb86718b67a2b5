//! Repository for the `activity_log` table.

use gigbook_core::types::DbId;
use sqlx::PgPool;

use crate::models::activity::{ActivityEntry, CreateActivity};

const COLUMNS: &str = "id, event_type, source_entity_type, source_entity_id, actor_user_id, \
                        payload, created_at";

/// Append-only store of platform events.
pub struct ActivityRepo;

impl ActivityRepo {
    /// Append one entry, returning its id.
    pub async fn insert(pool: &PgPool, input: &CreateActivity<'_>) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO activity_log (event_type, source_entity_type, source_entity_id,
                                       actor_user_id, payload)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(input.event_type)
        .bind(input.source_entity_type)
        .bind(input.source_entity_id)
        .bind(input.actor_user_id)
        .bind(input.payload)
        .fetch_one(pool)
        .await
    }

    /// Timeline of one entity, oldest first.
    pub async fn list_for_entity(
        pool: &PgPool,
        entity_type: &str,
        entity_id: DbId,
    ) -> Result<Vec<ActivityEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_log
             WHERE source_entity_type = $1 AND source_entity_id = $2
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, ActivityEntry>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .fetch_all(pool)
            .await
    }

    /// Most recent entries first, optionally filtered by event type.
    pub async fn list_recent(
        pool: &PgPool,
        event_type: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActivityEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_log
             WHERE ($1::TEXT IS NULL OR event_type = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ActivityEntry>(&query)
            .bind(event_type)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
