//! Repository for the `bookings` table.
//!
//! Status changes never write a state directly: callers compute the next
//! state with `gigbook_core::booking::next_state` and apply it through
//! [`BookingRepo::apply_transition`], which only succeeds while the row is
//! still in the state the decision was based on.

use gigbook_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::booking::{Booking, BookingDetail, BookingTransition, CreateBooking};
use crate::repositories::qualify;

const COLUMNS: &str = "id, artist_id, organizer_id, event_id, application_id, event_title, \
                        event_date, start_time, end_time, venue_name, venue_address, \
                        total_amount, platform_fee, net_amount, status, payment_status, notes, \
                        paid_at, completed_at, released_at, cancelled_at, cancelled_by, \
                        cancellation_reason, created_at, updated_at";

/// Joins that resolve both parties of a booking (`b`) to their users.
const PARTY_JOINS: &str = "FROM bookings b
             JOIN artists a ON a.id = b.artist_id
             JOIN organizers o ON o.id = b.organizer_id";

const PARTY_COLUMNS: &str = "a.user_id AS artist_user_id, a.stage_name AS artist_stage_name, \
                              o.user_id AS organizer_user_id, o.organization_name";

pub struct BookingRepo;

impl BookingRepo {
    /// Insert a booking. Usable on a pool or inside a transaction.
    pub async fn create<'e, E>(executor: E, input: &CreateBooking) -> Result<Booking, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO bookings (artist_id, organizer_id, event_id, application_id,
                                   event_title, event_date, start_time, end_time,
                                   venue_name, venue_address, total_amount, platform_fee,
                                   net_amount, status, payment_status, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(input.artist_id)
            .bind(input.organizer_id)
            .bind(input.event_id)
            .bind(input.application_id)
            .bind(&input.event_title)
            .bind(input.event_date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(&input.venue_name)
            .bind(&input.venue_address)
            .bind(input.total_amount)
            .bind(input.fees.platform_fee)
            .bind(input.fees.net_amount)
            .bind(input.state.status.as_str())
            .bind(input.state.payment.as_str())
            .bind(&input.notes)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a booking together with the user ids of both parties.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<BookingDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {cols}, {PARTY_COLUMNS} {PARTY_JOINS} WHERE b.id = $1",
            cols = qualify(COLUMNS, "b")
        );
        sqlx::query_as::<_, BookingDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Bookings where `user_id` is the artist or the organizer, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BookingDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {cols}, {PARTY_COLUMNS} {PARTY_JOINS}
             WHERE (a.user_id = $1 OR o.user_id = $1)
               AND ($2::TEXT IS NULL OR b.status = $2)
             ORDER BY b.created_at DESC, b.id DESC
             LIMIT $3 OFFSET $4",
            cols = qualify(COLUMNS, "b")
        );
        sqlx::query_as::<_, BookingDetail>(&query)
            .bind(user_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Every booking on the platform, newest first (admin view).
    pub async fn list_all(
        pool: &PgPool,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BookingDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {cols}, {PARTY_COLUMNS} {PARTY_JOINS}
             WHERE ($1::TEXT IS NULL OR b.status = $1)
             ORDER BY b.created_at DESC, b.id DESC
             LIMIT $2 OFFSET $3",
            cols = qualify(COLUMNS, "b")
        );
        sqlx::query_as::<_, BookingDetail>(&query)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Apply a status transition if the booking is still in `transition.from`.
    ///
    /// Stamps `paid_at`, `completed_at`, `released_at` and the cancellation
    /// columns according to the target state. A booking whose
    /// `dispute_open` flag is set is frozen; dispute resolution clears the
    /// flag first in the same transaction. The flag lives on the row itself
    /// so an update that waited on the row lock re-checks it against the
    /// committed version. Returns `None` when the row has moved on, is
    /// frozen, or does not exist.
    pub async fn apply_transition<'e, E>(
        executor: E,
        id: DbId,
        transition: &BookingTransition,
    ) -> Result<Option<Booking>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE bookings SET
                status = $2,
                payment_status = $3,
                paid_at = CASE WHEN $3 = 'paid' THEN NOW() ELSE paid_at END,
                completed_at = CASE WHEN $2 = 'completed' THEN NOW() ELSE completed_at END,
                released_at = CASE WHEN $3 = 'released' THEN NOW() ELSE released_at END,
                cancelled_at = CASE WHEN $2 = 'cancelled' THEN NOW() ELSE cancelled_at END,
                cancelled_by = CASE WHEN $2 = 'cancelled' THEN $6::BIGINT ELSE cancelled_by END,
                cancellation_reason =
                    CASE WHEN $2 = 'cancelled' THEN $7::TEXT ELSE cancellation_reason END
             WHERE id = $1 AND status = $4 AND payment_status = $5 AND NOT dispute_open
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(transition.to.status.as_str())
            .bind(transition.to.payment.as_str())
            .bind(transition.from.status.as_str())
            .bind(transition.from.payment.as_str())
            .bind(transition.actor_user_id)
            .bind(&transition.reason)
            .fetch_optional(executor)
            .await
    }
}
