//! Test utilities and fixtures for serial-auth integration tests

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use chrono::TimeDelta;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use serde_json::Value;

pub use serial_auth::config::AdminToken;
pub use serial_auth::db::{AppState, create_pool, init_db, queries};
pub use serial_auth::handlers;
pub use serial_auth::models::*;

pub const TEST_ADMIN_TOKEN: &str = "test-admin-token";

/// Create an in-memory test database with schema initialized
pub fn setup_test_db() -> Connection {
    let conn = Connection::open_in_memory().expect("Failed to create in-memory database");
    init_db(&conn).expect("Failed to initialize schema");
    conn
}

/// Create an AppState for testing backed by a single in-memory connection
pub fn create_test_app_state() -> AppState {
    let manager = SqliteConnectionManager::memory();
    let pool = Pool::builder().max_size(1).build(manager).unwrap();
    {
        let conn = pool.get().unwrap();
        init_db(&conn).unwrap();
    }

    AppState {
        db: pool,
        admin_token: AdminToken::new(TEST_ADMIN_TOKEN),
    }
}

/// Create an AppState backed by a database file, for tests that need
/// several connections to see the same data.
pub fn create_file_app_state(db_path: &str) -> AppState {
    let pool = create_pool(db_path).expect("Failed to create file-backed pool");
    {
        let conn = pool.get().unwrap();
        init_db(&conn).unwrap();
    }

    AppState {
        db: pool,
        admin_token: AdminToken::new(TEST_ADMIN_TOKEN),
    }
}

/// The full application router, logging layer included
pub fn test_app(state: AppState) -> Router {
    handlers::router(state)
}

/// Create a serial code that expires `ttl` from now
pub fn create_test_serial(conn: &Connection, code: &str, ttl: TimeDelta, max_uses: i64) -> SerialCode {
    let input = CreateSerialCode::starting_at(code.to_string(), chrono::Utc::now(), ttl, max_uses)
        .expect("test ttl should be in range");
    queries::create_serial_code(conn, &input).expect("Failed to create test serial code")
}

/// Move a code's expiry into the past
pub fn expire_serial(conn: &Connection, code: &str) {
    let past = chrono::Utc::now().timestamp() - 60;
    conn.execute(
        "UPDATE serial_codes SET expires_at = ?1 WHERE code = ?2",
        rusqlite::params![past, code],
    )
    .expect("failed to expire serial code");
}

/// Mark every use of a code as consumed
pub fn exhaust_serial(conn: &Connection, code: &str) {
    conn.execute(
        "UPDATE serial_codes SET uses_count = max_uses WHERE code = ?1",
        rusqlite::params![code],
    )
    .expect("failed to exhaust serial code");
}

pub fn count_serials(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM serial_codes", [], |row| row.get(0))
        .expect("failed to count serial codes")
}

/// POST a JSON body, optionally with an admin token
pub fn post_json(uri: &str, body: &Value, admin_token: Option<&str>) -> Request<Body> {
    post_raw(uri, serde_json::to_string(body).unwrap(), admin_token)
}

/// POST a raw body, optionally with an admin token
pub fn post_raw(uri: &str, body: impl Into<Body>, admin_token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = admin_token {
        builder = builder.header("X-Admin-Token", token);
    }
    builder.body(body.into()).unwrap()
}

/// GET, optionally with an admin token
pub fn get(uri: &str, admin_token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = admin_token {
        builder = builder.header("X-Admin-Token", token);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = body_bytes(response).await;
    serde_json::from_slice(&body).expect("Response should be valid JSON")
}
