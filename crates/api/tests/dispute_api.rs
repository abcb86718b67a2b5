//! HTTP-level tests for non-delivery disputes, admin resolution and the
//! auto-resolution sweep.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{
    create_admin, expect_json, get_auth, paid_booking, post_json_auth, register_artist,
    register_organizer, TestUser,
};
use gigbook_api::background::dispute_auto_resolve;
use sqlx::PgPool;

async fn open_dispute(app: &axum::Router, organizer: &TestUser, booking_id: i64) -> i64 {
    let response = post_json_auth(
        app.clone(),
        &format!("/api/disputes/bookings/{booking_id}/report-non-delivery"),
        &organizer.token,
        serde_json::json!({ "issue_description": "The artist never showed up to the venue" }),
    )
    .await;
    let json = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(json["data"]["status"], "open");
    assert!(json["data"]["auto_resolve_date"].is_string());
    json["data"]["id"].as_i64().unwrap()
}

/// Move a dispute's deadline into the past.
async fn expire(pool: &PgPool, dispute_id: i64) {
    sqlx::query("UPDATE disputes SET auto_resolve_date = NOW() - INTERVAL '1 hour' WHERE id = $1")
        .bind(dispute_id)
        .execute(pool)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../db/migrations")]
async fn open_dispute_freezes_the_escrow(pool: PgPool) {
    let app = common::build_test_app(pool);
    let organizer = register_organizer(&app, "olga").await;
    let artist = register_artist(&app, "mira").await;
    let booking_id = paid_booking(&app, &organizer, &artist).await;
    open_dispute(&app, &organizer, booking_id).await;

    for (uri, token) in [
        (format!("/api/organizers/bookings/{booking_id}/complete"), &organizer.token),
        (format!("/api/bookings/{booking_id}/cancel"), &artist.token),
    ] {
        let response = post_json_auth(app.clone(), &uri, token, serde_json::json!({})).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    // A second dispute on the same booking is refused.
    let response = post_json_auth(
        app,
        &format!("/api/disputes/bookings/{booking_id}/report-non-delivery"),
        &organizer.token,
        serde_json::json!({ "issue_description": "Reporting the same problem twice" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn only_paid_bookings_can_be_disputed(pool: PgPool) {
    let app = common::build_test_app(pool);
    let organizer = register_organizer(&app, "olga").await;
    let artist = register_artist(&app, "mira").await;
    let artist_id = common::artist_id_of(&app, &artist).await;
    let booking_id = common::requested_booking(&app, &organizer, artist_id, "200.00").await;

    let response = post_json_auth(
        app,
        &format!("/api/disputes/bookings/{booking_id}/report-non-delivery"),
        &organizer.token,
        serde_json::json!({ "issue_description": "The artist never showed up at all" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn short_description_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let organizer = register_organizer(&app, "olga").await;
    let artist = register_artist(&app, "mira").await;
    let booking_id = paid_booking(&app, &organizer, &artist).await;

    let response = post_json_auth(
        app,
        &format!("/api/disputes/bookings/{booking_id}/report-non-delivery"),
        &organizer.token,
        serde_json::json!({ "issue_description": "no show" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn artist_responds_once(pool: PgPool) {
    let app = common::build_test_app(pool);
    let organizer = register_organizer(&app, "olga").await;
    let artist = register_artist(&app, "mira").await;
    let booking_id = paid_booking(&app, &organizer, &artist).await;
    let dispute_id = open_dispute(&app, &organizer, booking_id).await;
    let uri = format!("/api/disputes/{dispute_id}/respond");

    let json = expect_json(
        post_json_auth(
            app.clone(),
            &uri,
            &artist.token,
            serde_json::json!({ "response": "I was there, the venue was closed" }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["artist_response"], "I was there, the venue was closed");

    let response = post_json_auth(
        app.clone(),
        &uri,
        &artist.token,
        serde_json::json!({ "response": "Changing my story" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let mine = expect_json(
        get_auth(app, "/api/disputes/mine", &organizer.token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(mine["data"][0]["id"], dispute_id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_resolution_releases_to_artist(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = create_admin(&pool, &app, "root").await;
    let organizer = register_organizer(&app, "olga").await;
    let artist = register_artist(&app, "mira").await;
    let booking_id = paid_booking(&app, &organizer, &artist).await;
    let dispute_id = open_dispute(&app, &organizer, booking_id).await;
    let uri = format!("/api/admin/disputes/{dispute_id}/resolve");

    // Only admins resolve.
    let response = post_json_auth(
        app.clone(),
        &uri,
        &organizer.token,
        serde_json::json!({ "resolution": "refund_organizer" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        app.clone(),
        &uri,
        &admin.token,
        serde_json::json!({ "resolution": "split_the_difference" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = expect_json(
        post_json_auth(
            app.clone(),
            &uri,
            &admin.token,
            serde_json::json!({ "resolution": "release_artist", "notes": "Venue confirmed the set" }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["dispute"]["status"], "resolved");
    assert_eq!(json["data"]["dispute"]["resolved_by"], admin.user_id);
    assert_eq!(json["data"]["booking"]["status"], "completed");
    assert_eq!(json["data"]["booking"]["payment_status"], "released");

    // Resolving again is a conflict.
    let response = post_json_auth(
        app.clone(),
        &uri,
        &admin.token,
        serde_json::json!({ "resolution": "refund_organizer" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let stats = expect_json(get_auth(app, "/api/admin/stats", &admin.token).await, StatusCode::OK).await;
    assert_eq!(stats["data"]["open_disputes"], 0);
    assert_eq!(stats["data"]["released_to_artists"], "450.00");
    assert_eq!(stats["data"]["platform_fees_earned"], "50.00");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn sweep_refunds_unanswered_expired_disputes(pool: PgPool) {
    let (app, state) = common::build_test_app_with_state(pool.clone());
    let organizer = register_organizer(&app, "olga").await;
    let artist = register_artist(&app, "mira").await;

    let silent_booking = paid_booking(&app, &organizer, &artist).await;
    let silent = open_dispute(&app, &organizer, silent_booking).await;
    let answered_booking = paid_booking(&app, &organizer, &artist).await;
    let answered = open_dispute(&app, &organizer, answered_booking).await;
    let pending_booking = paid_booking(&app, &organizer, &artist).await;
    let not_due = open_dispute(&app, &organizer, pending_booking).await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/disputes/{answered}/respond"),
        &artist.token,
        serde_json::json!({ "response": "I performed the full set" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    expire(&pool, silent).await;
    expire(&pool, answered).await;

    let mut events = state.event_bus.subscribe();
    let resolved = dispute_auto_resolve::sweep(&pool, &state.event_bus, Utc::now())
        .await
        .unwrap();
    assert_eq!(resolved, 1);

    let first = events.recv().await.unwrap();
    assert_eq!(first.event_type, "dispute.resolved");
    assert_eq!(first.actor_user_id, None);
    let second = events.recv().await.unwrap();
    assert_eq!(second.event_type, "payment.refunded");

    let json = expect_json(
        get_auth(app.clone(), &format!("/api/disputes/{silent}"), &organizer.token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["status"], "resolved");
    assert_eq!(json["data"]["resolution"], "refund_organizer");
    assert!(json["data"]["resolved_by"].is_null());

    let json = expect_json(
        get_auth(app.clone(), &format!("/api/bookings/{silent_booking}"), &organizer.token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["status"], "cancelled");
    assert_eq!(json["data"]["payment_status"], "refunded");

    for still_open in [answered, not_due] {
        let json = expect_json(
            get_auth(app.clone(), &format!("/api/disputes/{still_open}"), &artist.token).await,
            StatusCode::OK,
        )
        .await;
        assert_eq!(json["data"]["status"], "open");
    }

    // A second sweep finds nothing left to do.
    let resolved = dispute_auto_resolve::sweep(&pool, &state.event_bus, Utc::now())
        .await
        .unwrap();
    assert_eq!(resolved, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn outsiders_cannot_see_disputes(pool: PgPool) {
    let app = common::build_test_app(pool);
    let organizer = register_organizer(&app, "olga").await;
    let artist = register_artist(&app, "mira").await;
    let stranger = register_organizer(&app, "sam").await;
    let booking_id = paid_booking(&app, &organizer, &artist).await;
    let dispute_id = open_dispute(&app, &organizer, booking_id).await;

    let response = get_auth(app, &format!("/api/disputes/{dispute_id}"), &stranger.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
