//! Aggregate queries backing the dashboards.

use chrono::NaiveDate;
use gigbook_core::types::DbId;
use sqlx::PgPool;

use crate::models::stats::{OrganizerStats, PlatformStats};

pub struct StatsRepo;

impl StatsRepo {
    /// Platform-wide counts and escrow totals.
    pub async fn platform(pool: &PgPool) -> Result<PlatformStats, sqlx::Error> {
        sqlx::query_as::<_, PlatformStats>(
            "SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM artists) AS total_artists,
                (SELECT COUNT(*) FROM organizers) AS total_organizers,
                (SELECT COUNT(*) FROM events) AS total_events,
                (SELECT COUNT(*) FROM events WHERE status = 'published') AS published_events,
                COUNT(b.id) AS total_bookings,
                COUNT(b.id) FILTER (WHERE b.status = 'pending') AS pending_bookings,
                COUNT(b.id) FILTER (WHERE b.status = 'confirmed') AS confirmed_bookings,
                COUNT(b.id) FILTER (WHERE b.status = 'completed') AS completed_bookings,
                COUNT(b.id) FILTER (WHERE b.status = 'cancelled') AS cancelled_bookings,
                (SELECT COUNT(*) FROM disputes WHERE status = 'open') AS open_disputes,
                COALESCE(SUM(b.total_amount) FILTER (WHERE b.payment_status = 'paid'), 0)
                    AS escrow_held,
                COALESCE(SUM(b.net_amount) FILTER (WHERE b.payment_status = 'released'), 0)
                    AS released_to_artists,
                COALESCE(SUM(b.total_amount) FILTER (WHERE b.payment_status = 'refunded'), 0)
                    AS refunded_to_organizers,
                COALESCE(SUM(b.platform_fee) FILTER (WHERE b.payment_status = 'released'), 0)
                    AS platform_fees_earned
             FROM bookings b",
        )
        .fetch_one(pool)
        .await
    }

    /// Counts for one organizer's dashboard. `today` bounds "upcoming".
    pub async fn organizer(
        pool: &PgPool,
        organizer_id: DbId,
        today: NaiveDate,
    ) -> Result<OrganizerStats, sqlx::Error> {
        sqlx::query_as::<_, OrganizerStats>(
            "SELECT
                (SELECT COUNT(*) FROM events WHERE organizer_id = $1) AS total_events,
                (SELECT COUNT(*) FROM events WHERE organizer_id = $1 AND status = 'published')
                    AS published_events,
                (SELECT COUNT(*) FROM events WHERE organizer_id = $1 AND event_date >= $2)
                    AS upcoming_events,
                (SELECT COUNT(*) FROM event_applications ea
                    JOIN events e ON e.id = ea.event_id
                    WHERE e.organizer_id = $1 AND ea.application_status = 'pending')
                    AS pending_applications,
                COUNT(b.id) AS total_bookings,
                COUNT(b.id) FILTER (WHERE b.status = 'confirmed') AS confirmed_bookings,
                COUNT(b.id) FILTER (WHERE b.status = 'completed') AS completed_bookings,
                (SELECT COUNT(*) FROM disputes d
                    JOIN bookings db ON db.id = d.booking_id
                    WHERE db.organizer_id = $1 AND d.status = 'open') AS open_disputes,
                COALESCE(SUM(b.total_amount) FILTER (WHERE b.payment_status = 'released'), 0)
                    AS total_spent,
                COALESCE(SUM(b.total_amount) FILTER (WHERE b.payment_status = 'paid'), 0)
                    AS escrow_held
             FROM bookings b
             WHERE b.organizer_id = $1",
        )
        .bind(organizer_id)
        .bind(today)
        .fetch_one(pool)
        .await
    }
}
