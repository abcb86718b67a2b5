//! Repository-level tests for the booking escrow and dispute tables.
//!
//! - Conditional transitions only apply from the expected state
//! - An open dispute freezes ordinary transitions, including ones already
//!   waiting on the booking row when the dispute commits
//! - Resolution closes the dispute and moves the booking atomically
//! - Check and unique constraints back the domain rules

use chrono::{Duration, NaiveDate, Utc};
use gigbook_core::booking::{compute_fees, BookingState, BookingStatus, PaymentStatus};
use gigbook_db::models::booking::{Booking, BookingTransition, CreateBooking};
use gigbook_db::models::dispute::CreateDispute;
use gigbook_db::models::user::{CreateUser, NewProfile};
use gigbook_db::repositories::dispute_repo::DisputeResolution;
use gigbook_db::repositories::{BookingRepo, DisputeRepo, UserRepo};
use rust_decimal::Decimal;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const CONFIRMED_PAID: BookingState =
    BookingState::new(BookingStatus::Confirmed, PaymentStatus::Paid);

struct Parties {
    artist_user: i64,
    artist_id: i64,
    organizer_user: i64,
    organizer_id: i64,
}

fn new_user(name: &str, role: &str) -> CreateUser {
    CreateUser {
        name: name.to_string(),
        email: format!("{name}@test.com"),
        password_hash: "not-a-real-hash".to_string(),
        role: role.to_string(),
    }
}

async fn parties(pool: &PgPool) -> Parties {
    let (artist, artist_id) = UserRepo::register(
        pool,
        &new_user("mira", "artist"),
        &NewProfile::Artist {
            stage_name: "Mira Live".to_string(),
            genre: Some("jazz".to_string()),
            city: None,
            base_rate: None,
        },
    )
    .await
    .unwrap();
    let (organizer, organizer_id) = UserRepo::register(
        pool,
        &new_user("olga", "organizer"),
        &NewProfile::Organizer {
            organization_name: "Olga Events".to_string(),
            phone: None,
        },
    )
    .await
    .unwrap();
    Parties {
        artist_user: artist.id,
        artist_id,
        organizer_user: organizer.id,
        organizer_id,
    }
}

fn new_booking(p: &Parties, state: BookingState) -> CreateBooking {
    let total = Decimal::new(50000, 2);
    CreateBooking {
        artist_id: p.artist_id,
        organizer_id: p.organizer_id,
        event_id: None,
        application_id: None,
        event_title: "Private Party".to_string(),
        event_date: NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
        start_time: None,
        end_time: None,
        venue_name: None,
        venue_address: None,
        total_amount: total,
        fees: compute_fees(total, Decimal::new(10, 0)).unwrap(),
        state,
        notes: None,
    }
}

fn new_dispute(booking_id: i64, reporter_id: i64) -> CreateDispute {
    CreateDispute {
        booking_id,
        reporter_id,
        issue_description: "  The artist never arrived  ".to_string(),
        evidence: None,
        auto_resolve_date: Utc::now() + Duration::days(7),
    }
}

fn report(booking_id: i64, p: &Parties) -> CreateDispute {
    new_dispute(booking_id, p.organizer_user)
}

/// Hold a dispute-opening transaction on `booking_id`, start `transition`
/// behind it, then commit the dispute. Returns what the transition did.
async fn transition_racing_dispute(
    pool: &PgPool,
    p: &Parties,
    booking_id: i64,
    transition: BookingTransition,
) -> Option<Booking> {
    let mut tx = pool.begin().await.unwrap();
    DisputeRepo::open_in(&mut *tx, &report(booking_id, p), CONFIRMED_PAID)
        .await
        .unwrap()
        .expect("dispute opens on a paid booking");

    let racer_pool = pool.clone();
    let racer = tokio::spawn(async move {
        BookingRepo::apply_transition(&racer_pool, booking_id, &transition).await
    });
    // Let the transition reach the row lock held by the open transaction.
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    tx.commit().await.unwrap();

    racer.await.unwrap().unwrap()
}

fn db_code(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.code().map(|c| c.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn transition_applies_only_from_expected_state(pool: PgPool) {
    let p = parties(&pool).await;
    let pending = BookingState::new(BookingStatus::Pending, PaymentStatus::Pending);
    let confirmed = BookingState::new(BookingStatus::Confirmed, PaymentStatus::Pending);
    let booking = BookingRepo::create(&pool, &new_booking(&p, pending))
        .await
        .unwrap();
    assert_eq!(booking.platform_fee, Decimal::new(5000, 2));
    assert_eq!(booking.net_amount, Decimal::new(45000, 2));

    let accept = BookingTransition::new(pending, confirmed);
    let accepted = BookingRepo::apply_transition(&pool, booking.id, &accept)
        .await
        .unwrap()
        .expect("first accept applies");
    assert_eq!(accepted.status, "confirmed");

    // The same decision made against the stale state is a no-op.
    let stale = BookingRepo::apply_transition(&pool, booking.id, &accept)
        .await
        .unwrap();
    assert!(stale.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn cancellation_records_actor_and_reason(pool: PgPool) {
    let p = parties(&pool).await;
    let booking = BookingRepo::create(&pool, &new_booking(&p, CONFIRMED_PAID))
        .await
        .unwrap();

    let refunded = BookingState::new(BookingStatus::Cancelled, PaymentStatus::Refunded);
    let transition = BookingTransition::new(CONFIRMED_PAID, refunded)
        .by(p.organizer_user)
        .with_reason(Some("Venue flooded".to_string()));
    let cancelled = BookingRepo::apply_transition(&pool, booking.id, &transition)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(cancelled.payment_status, "refunded");
    assert_eq!(cancelled.cancelled_by, Some(p.organizer_user));
    assert_eq!(cancelled.cancellation_reason.as_deref(), Some("Venue flooded"));
    assert!(cancelled.cancelled_at.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn open_dispute_freezes_the_booking(pool: PgPool) {
    let p = parties(&pool).await;
    let booking = BookingRepo::create(&pool, &new_booking(&p, CONFIRMED_PAID))
        .await
        .unwrap();

    let dispute = DisputeRepo::open(&pool, &report(booking.id, &p), CONFIRMED_PAID)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(dispute.status, "open");
    assert_eq!(dispute.issue_description, "The artist never arrived");
    assert!(DisputeRepo::has_open_for_booking(&pool, booking.id).await.unwrap());

    let completed = BookingState::new(BookingStatus::Completed, PaymentStatus::Released);
    let complete = BookingTransition::new(CONFIRMED_PAID, completed);
    let blocked = BookingRepo::apply_transition(&pool, booking.id, &complete)
        .await
        .unwrap();
    assert!(blocked.is_none());

    let err = DisputeRepo::open(&pool, &report(booking.id, &p), CONFIRMED_PAID)
        .await
        .unwrap_err();
    assert_eq!(db_code(&err).as_deref(), Some("23505"));
}

#[sqlx::test(migrations = "./migrations")]
async fn completion_queued_behind_dispute_open_is_refused(pool: PgPool) {
    let p = parties(&pool).await;
    let booking = BookingRepo::create(&pool, &new_booking(&p, CONFIRMED_PAID))
        .await
        .unwrap();

    let released = BookingState::new(BookingStatus::Completed, PaymentStatus::Released);
    let outcome = transition_racing_dispute(
        &pool,
        &p,
        booking.id,
        BookingTransition::new(CONFIRMED_PAID, released),
    )
    .await;
    assert!(outcome.is_none());

    let booking = BookingRepo::find_by_id(&pool, booking.id).await.unwrap().unwrap();
    assert_eq!(booking.status, "confirmed");
    assert_eq!(booking.payment_status, "paid");
    assert!(booking.released_at.is_none());
    assert!(DisputeRepo::has_open_for_booking(&pool, booking.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn cancellation_queued_behind_dispute_open_is_refused(pool: PgPool) {
    let p = parties(&pool).await;
    let booking = BookingRepo::create(&pool, &new_booking(&p, CONFIRMED_PAID))
        .await
        .unwrap();

    let refunded = BookingState::new(BookingStatus::Cancelled, PaymentStatus::Refunded);
    let cancel = BookingTransition::new(CONFIRMED_PAID, refunded)
        .by(p.artist_user)
        .with_reason(Some("Double booked".to_string()));
    let outcome = transition_racing_dispute(&pool, &p, booking.id, cancel).await;
    assert!(outcome.is_none());

    let booking = BookingRepo::find_by_id(&pool, booking.id).await.unwrap().unwrap();
    assert_eq!(booking.status, "confirmed");
    assert_eq!(booking.payment_status, "paid");
    assert!(booking.cancelled_at.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn dispute_on_moved_booking_is_not_opened(pool: PgPool) {
    let p = parties(&pool).await;
    let pending = BookingState::new(BookingStatus::Pending, PaymentStatus::Pending);
    let booking = BookingRepo::create(&pool, &new_booking(&p, pending))
        .await
        .unwrap();

    let opened = DisputeRepo::open(&pool, &report(booking.id, &p), CONFIRMED_PAID)
        .await
        .unwrap();
    assert!(opened.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn resolution_moves_dispute_and_booking_together(pool: PgPool) {
    let p = parties(&pool).await;
    let booking = BookingRepo::create(&pool, &new_booking(&p, CONFIRMED_PAID))
        .await
        .unwrap();
    let dispute = DisputeRepo::open(&pool, &report(booking.id, &p), CONFIRMED_PAID)
        .await
        .unwrap()
        .unwrap();

    let released = BookingState::new(BookingStatus::Completed, PaymentStatus::Released);
    let closing = DisputeResolution {
        resolution: "release_artist",
        notes: Some("Venue confirmed the set"),
        resolved_by: None,
    };
    let (dispute, booking) = DisputeRepo::resolve(
        &pool,
        dispute.id,
        &closing,
        &BookingTransition::new(CONFIRMED_PAID, released),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(dispute.status, "resolved");
    assert!(dispute.resolved_by.is_none());
    assert_eq!(booking.status, "completed");
    assert_eq!(booking.payment_status, "released");

    // Already resolved: nothing changes.
    let again = DisputeRepo::resolve(
        &pool,
        dispute.id,
        &closing,
        &BookingTransition::new(CONFIRMED_PAID, released),
    )
    .await
    .unwrap();
    assert!(again.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn resolution_rolls_back_when_booking_moved(pool: PgPool) {
    let p = parties(&pool).await;
    let booking = BookingRepo::create(&pool, &new_booking(&p, CONFIRMED_PAID))
        .await
        .unwrap();
    let dispute = DisputeRepo::open(&pool, &report(booking.id, &p), CONFIRMED_PAID)
        .await
        .unwrap()
        .unwrap();

    // A transition computed from the wrong starting state cannot apply.
    let confirmed = BookingState::new(BookingStatus::Confirmed, PaymentStatus::Pending);
    let refunded = BookingState::new(BookingStatus::Cancelled, PaymentStatus::Refunded);
    let closing = DisputeResolution {
        resolution: "refund_organizer",
        notes: None,
        resolved_by: None,
    };
    let wrong_start = BookingTransition::new(confirmed, refunded);
    let outcome = DisputeRepo::resolve(&pool, dispute.id, &closing, &wrong_start)
        .await
        .unwrap();
    assert!(outcome.is_none());

    let still_open = DisputeRepo::find_by_id(&pool, dispute.id).await.unwrap().unwrap();
    assert_eq!(still_open.status, "open");
}

#[sqlx::test(migrations = "./migrations")]
async fn due_disputes_skip_answered_ones(pool: PgPool) {
    let p = parties(&pool).await;
    let mut ids = Vec::new();
    for _ in 0..2 {
        let booking = BookingRepo::create(&pool, &new_booking(&p, CONFIRMED_PAID))
            .await
            .unwrap();
        let mut input = new_dispute(booking.id, p.organizer_user);
        input.auto_resolve_date = Utc::now() - Duration::hours(1);
        let dispute = DisputeRepo::open(&pool, &input, CONFIRMED_PAID).await.unwrap().unwrap();
        ids.push(dispute.id);
    }

    let answered = DisputeRepo::respond(&pool, ids[1], "I played the full set")
        .await
        .unwrap()
        .unwrap();
    assert!(answered.responded_at.is_some());
    assert!(DisputeRepo::respond(&pool, ids[1], "Again").await.unwrap().is_none());

    let due = DisputeRepo::list_due(&pool, Utc::now(), 10).await.unwrap();
    assert_eq!(due.iter().map(|d| d.id).collect::<Vec<_>>(), vec![ids[0]]);
}

#[sqlx::test(migrations = "./migrations")]
async fn constraints_reject_inconsistent_rows(pool: PgPool) {
    let p = parties(&pool).await;

    // Escrow cannot be released on a booking that is still confirmed.
    let inconsistent = BookingState::new(BookingStatus::Confirmed, PaymentStatus::Released);
    let err = BookingRepo::create(&pool, &new_booking(&p, inconsistent))
        .await
        .unwrap_err();
    assert_eq!(db_code(&err).as_deref(), Some("23514"));

    // Users cannot review themselves.
    let booking = BookingRepo::create(&pool, &new_booking(&p, CONFIRMED_PAID))
        .await
        .unwrap();
    let err = sqlx::query(
        "INSERT INTO reviews (booking_id, reviewer_id, reviewee_id, rating)
         VALUES ($1, $2, $2, 5)",
    )
    .bind(booking.id)
    .bind(p.artist_user)
    .execute(&pool)
    .await
    .unwrap_err();
    assert_eq!(db_code(&err).as_deref(), Some("23514"));

    // Emails are unique.
    let err = UserRepo::create(&pool, &new_user("mira", "artist")).await.unwrap_err();
    assert_eq!(db_code(&err).as_deref(), Some("23505"));
}
