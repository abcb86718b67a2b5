//! HTTP-level tests for registration, login, token refresh and logout.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, expect_json, get, get_auth, post_json, post_json_auth, register_artist,
    register_organizer, TEST_PASSWORD,
};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn register_artist_creates_user_and_profile(pool: PgPool) {
    let app = common::build_test_app(pool);
    let artist = register_artist(&app, "mira").await;

    let response = get_auth(app, "/api/auth/me", &artist.token).await;
    let json = expect_json(response, StatusCode::OK).await;

    assert_eq!(json["data"]["email"], "mira@test.com");
    assert_eq!(json["data"]["role"], "artist");
    assert_eq!(json["data"]["is_verified"], false);
    assert_eq!(json["data"]["artist"]["stage_name"], "mira Live");
    assert_eq!(json["data"]["artist"]["base_rate"], "400.00");
    assert!(json["data"].get("organizer").is_none());
    assert!(json["data"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_rejects_admin_role_and_short_password(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/auth/register",
        serde_json::json!({
            "name": "eve", "email": "eve@test.com",
            "password": TEST_PASSWORD, "role": "admin",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        app,
        "/api/auth/register",
        serde_json::json!({
            "name": "eve", "email": "eve@test.com",
            "password": "short", "role": "artist",
        }),
    )
    .await;
    let json = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_email_returns_409(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_organizer(&app, "olga").await;

    let response = post_json(
        app,
        "/api/auth/register",
        serde_json::json!({
            "name": "olga2", "email": "OLGA@test.com",
            "password": TEST_PASSWORD, "role": "organizer",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_wrong_password_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_artist(&app, "mira").await;

    let response = post_json(
        app,
        "/api/auth/login",
        serde_json::json!({ "email": "mira@test.com", "password": "wrong_password" }),
    )
    .await;
    let json = expect_json(response, StatusCode::UNAUTHORIZED).await;
    assert_eq!(json["error"], "Invalid email or password");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn five_failures_lock_the_account(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_artist(&app, "mira").await;

    for _ in 0..5 {
        let response = post_json(
            app.clone(),
            "/api/auth/login",
            serde_json::json!({ "email": "mira@test.com", "password": "wrong_password" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // A wrong password does not reveal the lock.
    let response = post_json(
        app.clone(),
        "/api/auth/login",
        serde_json::json!({ "email": "mira@test.com", "password": "wrong_password" }),
    )
    .await;
    let json = expect_json(response, StatusCode::UNAUTHORIZED).await;
    assert_eq!(json["error"], "Invalid email or password");

    // Even the right password is refused while locked.
    let response = post_json(
        app,
        "/api/auth/login",
        serde_json::json!({ "email": "mira@test.com", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn refresh_rotates_and_old_token_is_single_use(pool: PgPool) {
    let app = common::build_test_app(pool);
    let artist = register_artist(&app, "mira").await;

    let response = post_json(
        app.clone(),
        "/api/auth/refresh",
        serde_json::json!({ "refresh_token": artist.refresh_token }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_ne!(json["refresh_token"], artist.refresh_token.as_str());
    assert!(json["expires_in"].as_i64().unwrap() > 0);

    let response = post_json(
        app,
        "/api/auth/refresh",
        serde_json::json!({ "refresh_token": artist.refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn logout_revokes_refresh_sessions(pool: PgPool) {
    let app = common::build_test_app(pool);
    let artist = register_artist(&app, "mira").await;

    let response =
        post_json_auth(app.clone(), "/api/auth/logout", &artist.token, serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        app,
        "/api/auth/refresh",
        serde_json::json!({ "refresh_token": artist.refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn me_requires_a_valid_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app, "/api/auth/me", "not-a-jwt").await;
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}
