//! Repository for the `event_applications` table.

use gigbook_core::application::{STATUS_APPROVED, STATUS_PENDING, STATUS_REJECTED};
use gigbook_core::types::DbId;
use sqlx::PgPool;

use crate::models::application::{
    ApplicationWithArtist, ApplicationWithEvent, CreateApplication, EventApplication,
};
use crate::models::booking::{Booking, CreateBooking};
use crate::repositories::{qualify, BookingRepo};

const COLUMNS: &str = "id, event_id, artist_id, proposed_rate, cover_message, \
                        application_status, organizer_response, responded_at, \
                        created_at, updated_at";

pub struct ApplicationRepo;

impl ApplicationRepo {
    /// Insert a pending application. A second application by the same
    /// artist to the same event violates `uq_event_applications_event_artist`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateApplication,
    ) -> Result<EventApplication, sqlx::Error> {
        let query = format!(
            "INSERT INTO event_applications (event_id, artist_id, proposed_rate, cover_message)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventApplication>(&query)
            .bind(input.event_id)
            .bind(input.artist_id)
            .bind(input.proposed_rate)
            .bind(&input.cover_message)
            .fetch_one(pool)
            .await
    }

    /// Find an application that belongs to `event_id`.
    pub async fn find_for_event(
        pool: &PgPool,
        event_id: DbId,
        id: DbId,
    ) -> Result<Option<EventApplication>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM event_applications WHERE id = $1 AND event_id = $2");
        sqlx::query_as::<_, EventApplication>(&query)
            .bind(id)
            .bind(event_id)
            .fetch_optional(pool)
            .await
    }

    /// Applications to one event with the applying artists, oldest first.
    pub async fn list_for_event(
        pool: &PgPool,
        event_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<ApplicationWithArtist>, sqlx::Error> {
        let query = format!(
            "SELECT {cols}, a.stage_name, a.genre, a.base_rate
             FROM event_applications ea
             JOIN artists a ON a.id = ea.artist_id
             WHERE ea.event_id = $1 AND ($2::TEXT IS NULL OR ea.application_status = $2)
             ORDER BY ea.created_at, ea.id",
            cols = qualify(COLUMNS, "ea")
        );
        sqlx::query_as::<_, ApplicationWithArtist>(&query)
            .bind(event_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// An artist's applications with the events applied to, newest first.
    pub async fn list_for_artist(
        pool: &PgPool,
        artist_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<ApplicationWithEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {cols}, e.title AS event_title, e.event_date, e.city AS event_city
             FROM event_applications ea
             JOIN events e ON e.id = ea.event_id
             WHERE ea.artist_id = $1 AND ($2::TEXT IS NULL OR ea.application_status = $2)
             ORDER BY ea.created_at DESC, ea.id DESC",
            cols = qualify(COLUMNS, "ea")
        );
        sqlx::query_as::<_, ApplicationWithEvent>(&query)
            .bind(artist_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Reject a pending application. Returns `None` if it was already decided.
    pub async fn reject(
        pool: &PgPool,
        id: DbId,
        organizer_response: Option<&str>,
    ) -> Result<Option<EventApplication>, sqlx::Error> {
        let query = format!(
            "UPDATE event_applications SET
                application_status = $2,
                organizer_response = $3,
                responded_at = NOW()
             WHERE id = $1 AND application_status = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventApplication>(&query)
            .bind(id)
            .bind(STATUS_REJECTED)
            .bind(organizer_response)
            .bind(STATUS_PENDING)
            .fetch_optional(pool)
            .await
    }

    /// Approve a pending application and create its booking atomically.
    ///
    /// Returns `None` (and writes nothing) if the application was already
    /// decided.
    pub async fn approve_with_booking(
        pool: &PgPool,
        id: DbId,
        organizer_response: Option<&str>,
        booking: &CreateBooking,
    ) -> Result<Option<(EventApplication, Booking)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE event_applications SET
                application_status = $2,
                organizer_response = $3,
                responded_at = NOW()
             WHERE id = $1 AND application_status = $4
             RETURNING {COLUMNS}"
        );
        let application = sqlx::query_as::<_, EventApplication>(&query)
            .bind(id)
            .bind(STATUS_APPROVED)
            .bind(organizer_response)
            .bind(STATUS_PENDING)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(application) = application else {
            return Ok(None);
        };

        let booking = BookingRepo::create(&mut *tx, booking).await?;
        tx.commit().await?;
        Ok(Some((application, booking)))
    }
}
