//! Shared helpers: every test gets a fresh in-memory SQLite database with migrations applied.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;

use user_results::infra::storage::migrations::Migrator;
use user_results::UserResults;

/// Create a fresh test database (in-memory SQLite) and run migrations.
pub async fn create_test_db() -> DatabaseConnection {
    // One pooled connection: each SQLite memory connection is its own database.
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn create_test_module() -> UserResults {
    UserResults::new(create_test_db().await)
}

/// Build an Axum router by calling the real route registration.
pub async fn create_test_router() -> Router {
    create_test_module().await.register_rest(Router::new())
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Drive one request through the router; an empty body decodes as `Value::Null`.
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

/// Create a user through the API and return its id.
pub async fn post_user(router: &Router, username: &str) -> i64 {
    let resp = send(
        router,
        Method::POST,
        "/api/v1/users",
        Some(serde_json::json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "pw",
            "enabled": true,
        })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::CREATED, "{:?}", resp.body);
    resp.body["user"]["id"].as_i64().unwrap()
}
