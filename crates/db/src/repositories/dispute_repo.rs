//! Repository for the `disputes` table.

use gigbook_core::booking::BookingState;
use gigbook_core::dispute::{STATUS_OPEN, STATUS_RESOLVED};
use gigbook_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::booking::{Booking, BookingTransition};
use crate::models::dispute::{CreateDispute, Dispute};
use crate::repositories::{qualify, BookingRepo};

const COLUMNS: &str = "id, booking_id, reporter_id, issue_description, evidence, \
                        auto_resolve_date, status, artist_response, responded_at, resolution, \
                        resolution_notes, resolved_by, resolved_at, created_at, updated_at";

/// How a dispute is being closed.
#[derive(Debug)]
pub struct DisputeResolution<'a> {
    pub resolution: &'a str,
    pub notes: Option<&'a str>,
    /// `None` when the auto-resolution job closes the dispute.
    pub resolved_by: Option<DbId>,
}

pub struct DisputeRepo;

impl DisputeRepo {
    /// Open a dispute while the booking is still in `expected`.
    ///
    /// Returns `None` when the booking has left `expected`. A second open
    /// dispute on the same booking violates `uq_disputes_open_booking`.
    pub async fn open(
        pool: &PgPool,
        input: &CreateDispute,
        expected: BookingState,
    ) -> Result<Option<Dispute>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let dispute = Self::open_in(&mut *tx, input, expected).await?;
        if dispute.is_some() {
            tx.commit().await?;
        }
        Ok(dispute)
    }

    /// [`DisputeRepo::open`] on a caller-owned connection or transaction.
    ///
    /// Sets `bookings.dispute_open` before inserting, so any transition
    /// queued behind this transaction on the booking row sees the freeze.
    pub async fn open_in(
        conn: &mut PgConnection,
        input: &CreateDispute,
        expected: BookingState,
    ) -> Result<Option<Dispute>, sqlx::Error> {
        let frozen = sqlx::query_scalar::<_, DbId>(
            "UPDATE bookings SET dispute_open = true
             WHERE id = $1 AND status = $2 AND payment_status = $3
             RETURNING id",
        )
        .bind(input.booking_id)
        .bind(expected.status.as_str())
        .bind(expected.payment.as_str())
        .fetch_optional(&mut *conn)
        .await?;
        if frozen.is_none() {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO disputes (booking_id, reporter_id, issue_description, evidence,
                                   auto_resolve_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Dispute>(&query)
            .bind(input.booking_id)
            .bind(input.reporter_id)
            .bind(input.issue_description.trim())
            .bind(&input.evidence)
            .bind(input.auto_resolve_date)
            .fetch_one(&mut *conn)
            .await
            .map(Some)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Dispute>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM disputes WHERE id = $1");
        sqlx::query_as::<_, Dispute>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn has_open_for_booking(pool: &PgPool, booking_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM disputes WHERE booking_id = $1 AND status = $2)",
        )
        .bind(booking_id)
        .bind(STATUS_OPEN)
        .fetch_one(pool)
        .await
    }

    /// Disputes on bookings where `user_id` is either party, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Dispute>, sqlx::Error> {
        let query = format!(
            "SELECT {cols} FROM disputes d
             JOIN bookings b ON b.id = d.booking_id
             JOIN artists a ON a.id = b.artist_id
             JOIN organizers o ON o.id = b.organizer_id
             WHERE a.user_id = $1 OR o.user_id = $1
             ORDER BY d.created_at DESC, d.id DESC
             LIMIT $2 OFFSET $3",
            cols = qualify(COLUMNS, "d")
        );
        sqlx::query_as::<_, Dispute>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// All disputes, optionally filtered by status (admin view).
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Dispute>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM disputes
             WHERE ($1::TEXT IS NULL OR status = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Dispute>(&query)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Record the artist's answer. Only open, unanswered disputes accept one.
    pub async fn respond(
        pool: &PgPool,
        id: DbId,
        response: &str,
    ) -> Result<Option<Dispute>, sqlx::Error> {
        let query = format!(
            "UPDATE disputes SET artist_response = $2, responded_at = NOW()
             WHERE id = $1 AND status = $3 AND artist_response IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Dispute>(&query)
            .bind(id)
            .bind(response)
            .bind(STATUS_OPEN)
            .fetch_optional(pool)
            .await
    }

    /// Open disputes past their auto-resolve date with no artist response.
    pub async fn list_due(
        pool: &PgPool,
        now: Timestamp,
        limit: i64,
    ) -> Result<Vec<Dispute>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM disputes
             WHERE status = $1 AND auto_resolve_date <= $2 AND artist_response IS NULL
             ORDER BY auto_resolve_date, id
             LIMIT $3"
        );
        sqlx::query_as::<_, Dispute>(&query)
            .bind(STATUS_OPEN)
            .bind(now)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Close an open dispute, lift the booking freeze and move the booking,
    /// all in one transaction.
    ///
    /// Returns `None` and rolls back when the dispute is no longer open or
    /// the booking is no longer in `booking_transition.from`.
    pub async fn resolve(
        pool: &PgPool,
        id: DbId,
        resolution: &DisputeResolution<'_>,
        booking_transition: &BookingTransition,
    ) -> Result<Option<(Dispute, Booking)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE disputes SET
                status = $2,
                resolution = $3,
                resolution_notes = $4,
                resolved_by = $5,
                resolved_at = NOW()
             WHERE id = $1 AND status = $6
             RETURNING {COLUMNS}"
        );
        let dispute = sqlx::query_as::<_, Dispute>(&query)
            .bind(id)
            .bind(STATUS_RESOLVED)
            .bind(resolution.resolution)
            .bind(resolution.notes)
            .bind(resolution.resolved_by)
            .bind(STATUS_OPEN)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(dispute) = dispute else {
            return Ok(None);
        };

        sqlx::query("UPDATE bookings SET dispute_open = false WHERE id = $1")
            .bind(dispute.booking_id)
            .execute(&mut *tx)
            .await?;
        let booking =
            BookingRepo::apply_transition(&mut *tx, dispute.booking_id, booking_transition).await?;
        let Some(booking) = booking else {
            return Ok(None);
        };

        tx.commit().await?;
        Ok(Some((dispute, booking)))
    }
}
