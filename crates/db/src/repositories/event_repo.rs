//! Repository for the `events` table.

use gigbook_core::types::DbId;
use sqlx::PgPool;

use crate::models::event::{BrowseFilter, CreateEvent, Event, EventListing, UpdateEvent};
use crate::repositories::qualify;

const COLUMNS: &str = "id, organizer_id, title, description, event_type, event_date, \
                        start_time, end_time, venue_name, venue_address, city, \
                        budget_min, budget_max, status, is_public, created_at, updated_at";

/// Provides CRUD, publishing and browse queries for gig events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new draft event owned by `organizer_id`.
    pub async fn create(
        pool: &PgPool,
        organizer_id: DbId,
        input: &CreateEvent,
    ) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events (organizer_id, title, description, event_type, event_date,
                                 start_time, end_time, venue_name, venue_address, city,
                                 budget_min, budget_max, is_public)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, COALESCE($13, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(organizer_id)
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(&input.event_type)
            .bind(input.event_date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(&input.venue_name)
            .bind(&input.venue_address)
            .bind(&input.city)
            .bind(input.budget_min)
            .bind(input.budget_max)
            .bind(input.is_public)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All events of one organizer, soonest first.
    pub async fn list_for_organizer(
        pool: &PgPool,
        organizer_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE organizer_id = $1 AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY event_date, start_time NULLS LAST, id"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(organizer_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Published, public events dated on or after `filter.from_date`,
    /// ordered by date.
    pub async fn browse(
        pool: &PgPool,
        filter: &BrowseFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<EventListing>, sqlx::Error> {
        let query = format!(
            "SELECT {cols}, o.organization_name
             FROM events e
             JOIN organizers o ON o.id = e.organizer_id
             WHERE e.status = 'published'
               AND e.is_public = true
               AND e.event_date >= $1
               AND ($2::TEXT IS NULL OR e.event_type = $2)
               AND ($3::TEXT IS NULL OR LOWER(e.city) = LOWER($3))
             ORDER BY e.event_date, e.start_time NULLS LAST, e.id
             LIMIT $4 OFFSET $5",
            cols = qualify(COLUMNS, "e")
        );
        sqlx::query_as::<_, EventListing>(&query)
            .bind(filter.from_date)
            .bind(&filter.event_type)
            .bind(&filter.city)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update an event. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                event_type = COALESCE($4, event_type),
                event_date = COALESCE($5, event_date),
                start_time = COALESCE($6, start_time),
                end_time = COALESCE($7, end_time),
                venue_name = COALESCE($8, venue_name),
                venue_address = COALESCE($9, venue_address),
                city = COALESCE($10, city),
                budget_min = COALESCE($11, budget_min),
                budget_max = COALESCE($12, budget_max),
                is_public = COALESCE($13, is_public)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(&input.event_type)
            .bind(input.event_date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(&input.venue_name)
            .bind(&input.venue_address)
            .bind(&input.city)
            .bind(input.budget_min)
            .bind(input.budget_max)
            .bind(input.is_public)
            .fetch_optional(pool)
            .await
    }

    /// Move an event from status `from` to `to`.
    ///
    /// Returns `None` if the event is no longer in `from`.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        from: &str,
        to: &str,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET status = $3
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .fetch_optional(pool)
            .await
    }

    /// Number of bookings that reference the event.
    pub async fn count_bookings(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE event_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Hard-delete an event. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
