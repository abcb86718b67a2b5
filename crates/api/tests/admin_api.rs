//! HTTP-level tests for the admin surface.

mod common;

use axum::http::StatusCode;
use common::{
    create_admin, eventually, expect_json, get, get_auth, post_json, post_json_auth, register_artist,
    register_organizer, TEST_PASSWORD,
};
use gigbook_events::EventPersistence;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

#[sqlx::test(migrations = "../db/migrations")]
async fn non_admins_are_forbidden(pool: PgPool) {
    let app = common::build_test_app(pool);
    let organizer = register_organizer(&app, "olga").await;

    for uri in ["/api/admin/users", "/api/admin/stats", "/api/admin/disputes", "/api/admin/activity"] {
        let response = get_auth(app.clone(), uri, &organizer.token).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_users_filters_by_role(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = create_admin(&pool, &app, "root").await;
    register_artist(&app, "mira").await;
    register_artist(&app, "nico").await;
    register_organizer(&app, "olga").await;

    let json = expect_json(
        get_auth(app.clone(), "/api/admin/users?role=artist", &admin.token).await,
        StatusCode::OK,
    )
    .await;
    let users = json["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u["role"] == "artist"));
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));

    let json = expect_json(
        get_auth(app.clone(), "/api/admin/users?limit=2", &admin.token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let response = get_auth(app, "/api/admin/users?role=superuser", &admin.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn verify_user_sets_the_flag(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = create_admin(&pool, &app, "root").await;
    let artist = register_artist(&app, "mira").await;

    let json = expect_json(
        post_json_auth(
            app.clone(),
            &format!("/api/admin/users/{}/verify", artist.user_id),
            &admin.token,
            serde_json::json!({}),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["is_verified"], true);

    let response = post_json_auth(
        app,
        "/api/admin/users/999999/verify",
        &admin.token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deactivation_locks_the_account_out(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = create_admin(&pool, &app, "root").await;
    let artist = register_artist(&app, "mira").await;
    let artist_id = common::artist_id_of(&app, &artist).await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/admin/users/{}/deactivate", admin.user_id),
        &admin.token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let uri = format!("/api/admin/users/{}/deactivate", artist.user_id);
    let json = expect_json(
        post_json_auth(app.clone(), &uri, &admin.token, serde_json::json!({})).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["is_active"], false);

    let again = post_json_auth(app.clone(), &uri, &admin.token, serde_json::json!({})).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let login = post_json(
        app.clone(),
        "/api/auth/login",
        serde_json::json!({ "email": "mira@test.com", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(login.status(), StatusCode::FORBIDDEN);

    // Without the password the deactivation stays hidden.
    let login = post_json(
        app.clone(),
        "/api/auth/login",
        serde_json::json!({ "email": "mira@test.com", "password": "wrong_password" }),
    )
    .await;
    assert_eq!(login.status(), StatusCode::UNAUTHORIZED);

    let refresh = post_json(
        app.clone(),
        "/api/auth/refresh",
        serde_json::json!({ "refresh_token": artist.refresh_token }),
    )
    .await;
    assert_eq!(refresh.status(), StatusCode::UNAUTHORIZED);

    // Deactivated artists disappear from the public profile endpoint.
    let response = get(app, &format!("/api/artists/{artist_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn dispute_listing_validates_status(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = create_admin(&pool, &app, "root").await;

    let json = expect_json(
        get_auth(app.clone(), "/api/admin/disputes?status=open", &admin.token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);

    let response = get_auth(app, "/api/admin/disputes?status=pending", &admin.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stats_count_users_and_escrow(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = create_admin(&pool, &app, "root").await;
    let organizer = register_organizer(&app, "olga").await;
    let artist = register_artist(&app, "mira").await;
    common::paid_booking(&app, &organizer, &artist).await;

    let json = expect_json(
        get_auth(app, "/api/admin/stats", &admin.token).await,
        StatusCode::OK,
    )
    .await;
    let stats = &json["data"];
    assert_eq!(stats["total_users"], 3);
    assert_eq!(stats["total_artists"], 1);
    assert_eq!(stats["total_organizers"], 1);
    assert_eq!(stats["total_bookings"], 1);
    assert_eq!(stats["confirmed_bookings"], 1);
    assert_eq!(stats["escrow_held"], "500.00");
    assert_eq!(stats["open_disputes"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn activity_feed_filters_by_event_type(pool: PgPool) {
    let (app, state) = common::build_test_app_with_state(pool.clone());
    let cancel = CancellationToken::new();
    let persistence = tokio::spawn(EventPersistence::run(
        pool.clone(),
        state.event_bus.subscribe(),
        cancel.clone(),
    ));

    let admin = create_admin(&pool, &app, "root").await;
    register_artist(&app, "mira").await;
    register_organizer(&app, "olga").await;

    eventually(|| {
        let app = app.clone();
        let token = admin.token.clone();
        async move {
            let json = expect_json(
                get_auth(app, "/api/admin/activity?event_type=user.registered", &token).await,
                StatusCode::OK,
            )
            .await;
            let entries = json["data"].as_array().unwrap();
            entries.len() == 2 && entries.iter().all(|e| e["event_type"] == "user.registered")
        }
    })
    .await;

    cancel.cancel();
    persistence.await.unwrap();
}
