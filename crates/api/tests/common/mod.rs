#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{NaiveDate, Utc};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use gigbook_api::auth::jwt::JwtConfig;
use gigbook_api::auth::password::hash_password;
use gigbook_api::config::{MarketplaceConfig, ServerConfig};
use gigbook_api::router::build_app_router;
use gigbook_api::state::AppState;
use gigbook_db::models::user::CreateUser;
use gigbook_db::repositories::UserRepo;
use gigbook_events::EventBus;

pub const TEST_PASSWORD: &str = "test_password_123";

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 5,
        log_json: false,
        jwt: JwtConfig {
            secret: "test-secret-not-for-production".to_string(),
            access_ttl: chrono::Duration::minutes(60),
            refresh_ttl: chrono::Duration::days(7),
        },
        marketplace: MarketplaceConfig::default(),
    }
}

pub fn test_state(pool: PgPool) -> AppState {
    AppState {
        pool,
        config: Arc::new(test_config()),
        event_bus: Arc::new(EventBus::default()),
    }
}

/// Build the full application router over `pool`, with the same middleware
/// stack as the binary.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(test_state(pool), &test_config())
}

/// Like [`build_test_app`] but also returns the state, for tests that
/// subscribe to the event bus.
pub fn build_test_app_with_state(pool: PgPool) -> (Router, AppState) {
    let state = test_state(pool);
    (build_app_router(state.clone(), &test_config()), state)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the parsed body.
pub async fn expect_json(response: Response, status: StatusCode) -> serde_json::Value {
    let actual = response.status();
    let json = body_json(response).await;
    assert_eq!(actual, status, "unexpected status, body: {json}");
    json
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A registered user as seen by the tests.
pub struct TestUser {
    pub user_id: i64,
    pub token: String,
    pub refresh_token: String,
}

/// Register an artist through the API.
pub async fn register_artist(app: &Router, name: &str) -> TestUser {
    register(
        app,
        serde_json::json!({
            "name": name,
            "email": format!("{name}@test.com"),
            "password": TEST_PASSWORD,
            "role": "artist",
            "stage_name": format!("{name} Live"),
            "genre": "jazz",
            "city": "Lisbon",
            "base_rate": "400.00",
        }),
    )
    .await
}

/// Register an organizer through the API.
pub async fn register_organizer(app: &Router, name: &str) -> TestUser {
    register(
        app,
        serde_json::json!({
            "name": name,
            "email": format!("{name}@test.com"),
            "password": TEST_PASSWORD,
            "role": "organizer",
            "organization_name": format!("{name} Events"),
        }),
    )
    .await
}

async fn register(app: &Router, body: serde_json::Value) -> TestUser {
    let response = post_json(app.clone(), "/api/auth/register", body).await;
    let json = expect_json(response, StatusCode::CREATED).await;
    TestUser {
        user_id: json["user"]["id"].as_i64().unwrap(),
        token: json["access_token"].as_str().unwrap().to_string(),
        refresh_token: json["refresh_token"].as_str().unwrap().to_string(),
    }
}

/// Admins cannot self-register; insert one directly and log in.
pub async fn create_admin(pool: &PgPool, app: &Router, name: &str) -> TestUser {
    let input = CreateUser {
        name: name.to_string(),
        email: format!("{name}@test.com"),
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
        role: "admin".to_string(),
    };
    let user = UserRepo::create(pool, &input).await.unwrap();

    let response = post_json(
        app.clone(),
        "/api/auth/login",
        serde_json::json!({ "email": input.email, "password": TEST_PASSWORD }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    TestUser {
        user_id: user.id,
        token: json["access_token"].as_str().unwrap().to_string(),
        refresh_token: json["refresh_token"].as_str().unwrap().to_string(),
    }
}

/// The artist profile id of an artist user.
pub async fn artist_id_of(app: &Router, artist: &TestUser) -> i64 {
    let response = get_auth(app.clone(), "/api/auth/me", &artist.token).await;
    let json = expect_json(response, StatusCode::OK).await;
    json["data"]["artist"]["id"].as_i64().unwrap()
}

/// A date `days` from today, as the API expects it.
pub fn days_from_now(days: i64) -> NaiveDate {
    Utc::now().date_naive() + chrono::Duration::days(days)
}

/// Create and publish an event; returns its id.
pub async fn published_event(app: &Router, organizer: &TestUser, budget_max: &str) -> i64 {
    let response = post_json_auth(
        app.clone(),
        "/api/events",
        &organizer.token,
        serde_json::json!({
            "title": "Summer Jazz Night",
            "event_type": "concert",
            "event_date": days_from_now(30),
            "start_time": "19:00:00",
            "end_time": "23:00:00",
            "city": "Lisbon",
            "budget_min": "100.00",
            "budget_max": budget_max,
        }),
    )
    .await;
    let json = expect_json(response, StatusCode::CREATED).await;
    let event_id = json["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        &format!("/api/events/{event_id}/publish"),
        &organizer.token,
        serde_json::json!({}),
    )
    .await;
    expect_json(response, StatusCode::OK).await;
    event_id
}

/// A direct booking request from `organizer` to `artist`; returns its id.
pub async fn requested_booking(
    app: &Router,
    organizer: &TestUser,
    artist_id: i64,
    total: &str,
) -> i64 {
    let response = post_json_auth(
        app.clone(),
        "/api/bookings",
        &organizer.token,
        serde_json::json!({
            "artist_id": artist_id,
            "event_title": "Private Party",
            "event_date": days_from_now(14),
            "total_amount": total,
        }),
    )
    .await;
    let json = expect_json(response, StatusCode::CREATED).await;
    json["data"]["id"].as_i64().unwrap()
}

/// Drive a fresh booking to confirmed + paid; returns its id.
pub async fn paid_booking(app: &Router, organizer: &TestUser, artist: &TestUser) -> i64 {
    let artist_id = artist_id_of(app, artist).await;
    let booking_id = requested_booking(app, organizer, artist_id, "500.00").await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/bookings/{booking_id}/accept"),
        &artist.token,
        serde_json::json!({}),
    )
    .await;
    expect_json(response, StatusCode::OK).await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/organizers/bookings/{booking_id}/payment"),
        &organizer.token,
        serde_json::json!({}),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["payment_status"], "paid");
    booking_id
}

/// Poll until `check` passes, for effects written by background tasks.
pub async fn eventually<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..50 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("condition not reached in time");
}
