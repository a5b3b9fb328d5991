// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use hanzi_garden::config::Config;
use hanzi_garden::db::{Db, FirestoreDb, MemoryDb};
use hanzi_garden::middleware::auth::create_jwt;
use hanzi_garden::routes::create_router;
use hanzi_garden::services::CatalogService;
use hanzi_garden::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection against the emulator.
#[allow(dead_code)]
pub async fn test_db() -> Db {
    Db::Firestore(
        FirestoreDb::new("test-project")
            .await
            .expect("Failed to connect to Firestore emulator"),
    )
}

/// Generate a unique user ID for test isolation.
#[allow(dead_code)]
pub fn unique_user_id() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos() as u64
}

/// State over a fresh in-memory store and the seeded catalog.
#[allow(dead_code)]
pub fn test_state() -> (Arc<AppState>, MemoryDb) {
    let memory = MemoryDb::new();
    let state = Arc::new(AppState::new(
        Config::default(),
        Db::Memory(memory.clone()),
        CatalogService::seeded(),
    ));
    (state, memory)
}

/// Create a test app over in-memory storage.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let (state, _) = test_state();
    (create_router(state.clone()), state)
}

/// Create a test app whose store is offline; every query fails.
#[allow(dead_code)]
pub fn create_offline_test_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(
        Config::default(),
        Db::Firestore(FirestoreDb::new_offline()),
        CatalogService::seeded(),
    ));
    (create_router(state.clone()), state)
}

/// Create a session token for a regular user.
#[allow(dead_code)]
pub fn user_token(user_id: u64, state: &AppState) -> String {
    create_jwt(user_id, false, &state.config.jwt_signing_key).expect("Failed to create JWT")
}

/// Create a session token with the admin claim.
#[allow(dead_code)]
pub fn admin_token(user_id: u64, state: &AppState) -> String {
    create_jwt(user_id, true, &state.config.jwt_signing_key).expect("Failed to create JWT")
}

/// Build a request with an optional bearer token and JSON body.
#[allow(dead_code)]
pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
