// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod override_api_tests;

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use time::OffsetDateTime;
use time::macros::datetime;
use tower::ServiceExt;
use workmode::{EnginePolicy, TeleworkEngine};
use workmode_persistence::SqliteStore;

use crate::{AppState, build_router};

pub const NOW: OffsetDateTime = datetime!(2026-02-20 09:00 UTC);

/// Helper to create a router over a fresh in-memory store.
pub fn create_test_app() -> Router {
    let store: SqliteStore = SqliteStore::new_in_memory().expect("in-memory store");
    let engine: TeleworkEngine<SqliteStore> =
        TeleworkEngine::new(store, EnginePolicy::default()).with_clock(|| NOW);
    build_router(AppState {
        engine: Arc::new(engine),
    })
}

/// Helper to create a router with a default profile for `u-alice`.
pub async fn create_profiled_app() -> Router {
    let app: Router = create_test_app();
    let (status, _) = send(
        &app,
        "POST",
        "/users/u-alice/profile",
        Some(serde_json::json!({ "display_name": "Alice", "created_by": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    app
}

/// Sends one request and returns the status with the decoded JSON body.
/// Empty bodies decode to `Value::Null` and plain-text bodies to a string.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request: Request<Body> = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status: StatusCode = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into_owned()))
    };
    (status, value)
}
