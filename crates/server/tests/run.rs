use std::str::FromStr;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceExt;

use codehive_server::auth;
use codehive_server::config::Config;
use codehive_server::db::Database;
use codehive_server::{app, AppState};

const TEST_SECRET: &str = "test-secret";

fn test_config() -> Config {
    Config {
        port: 0,
        database_url: String::new(),
        jwt_secret: TEST_SECRET.to_string(),
        runner_command: "sh".to_string(),
        runner_timeout_ms: 5000,
        runner_max_output: 4096,
        comment_window_hours: 24,
        mail_api_url: "http://localhost".to_string(),
        mail_api_key: String::new(),
        mail_to: "inbox@codehive.dev".to_string(),
    }
}

async fn setup() -> AppState {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    AppState::new(Database { pool }, test_config())
}

async fn insert_user(state: &AppState, id: &str) {
    sqlx::query(
        "INSERT INTO users (id, email, pseudo, password_hash, premium, daily_runs, created_at) \
         VALUES (?, ?, ?, ?, 0, 0, ?)",
    )
    .bind(id)
    .bind(format!("{id}@example.com"))
    .bind(id)
    .bind("hash")
    .bind(Utc::now())
    .execute(&state.db.pool)
    .await
    .unwrap();
}

fn run_request(code: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/run")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(json!({ "code": code }).to_string()))
        .unwrap()
}

async fn daily_runs(state: &AppState, id: &str) -> i64 {
    sqlx::query_scalar("SELECT daily_runs FROM users WHERE id = ?")
        .bind(id)
        .fetch_one(&state.db.pool)
        .await
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn authenticated_run_bumps_daily_runs() {
    let state = setup().await;
    insert_user(&state, "alice").await;
    let token = auth::sign_token("alice", "alice@example.com", TEST_SECRET).unwrap();

    let response = app(state.clone())
        .oneshot(run_request(&BASE64.encode("echo hi"), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let outcome = body_json(response).await;
    assert_eq!(outcome["stdout"], "hi\n");
    assert_eq!(outcome["exit_code"], 0);
    assert_eq!(outcome["timed_out"], false);

    assert_eq!(daily_runs(&state, "alice").await, 1);
}

#[tokio::test]
async fn anonymous_run_is_allowed_and_not_counted() {
    let state = setup().await;
    insert_user(&state, "alice").await;

    let response = app(state.clone())
        .oneshot(run_request(&BASE64.encode("echo hi"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(daily_runs(&state, "alice").await, 0);
}

#[tokio::test]
async fn invalid_token_runs_anonymously() {
    let state = setup().await;
    insert_user(&state, "alice").await;

    let response = app(state.clone())
        .oneshot(run_request(&BASE64.encode("echo hi"), Some("not-a-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(daily_runs(&state, "alice").await, 0);
}

#[tokio::test]
async fn malformed_base64_is_rejected() {
    let state = setup().await;

    let response = app(state)
        .oneshot(run_request("*** not base64 ***", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid base64 payload");
}
