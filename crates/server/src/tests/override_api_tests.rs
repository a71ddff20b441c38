// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{Router, http::StatusCode};
use serde_json::{Value, json};

use super::{create_profiled_app, create_test_app, send};

fn tuesday_remote() -> Value {
    json!({
        "user_id": "u-alice",
        "date": "2026-03-03",
        "mode": "remote",
        "reason": "Deep work",
    })
}

async fn require_approval(app: &Router) {
    let (status, _) = send(
        app,
        "PATCH",
        "/users/u-alice/profile",
        Some(json!({
            "update": {
                "constraints": {
                    "max_remote_days_per_week": 2,
                    "max_consecutive_remote_days": 2,
                    "requires_approval": true,
                },
            },
            "updated_by": "hr",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_request_is_auto_approved() {
    let app: Router = create_profiled_app().await;

    let (status, body) = send(&app, "POST", "/overrides", Some(tuesday_remote())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["validation"]["is_valid"], true);
    assert_eq!(body["override"]["approval"]["status"], "approved");
    assert_eq!(body["override"]["approval"]["by"], "system");
    assert_eq!(body["override"]["created_by"], "u-alice");

    let (_, day) = send(&app, "GET", "/users/u-alice/days/2026-03-03", None).await;
    assert_eq!(day["resolved_mode"], "remote");
    assert_eq!(day["source"], "override");
}

#[tokio::test]
async fn test_request_without_profile_is_not_found() {
    let app: Router = create_test_app();

    let (status, body) = send(&app, "POST", "/overrides", Some(tuesday_remote())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("u-alice"));
}

#[tokio::test]
async fn test_blank_user_id_is_bad_request() {
    let app: Router = create_profiled_app().await;
    let mut request: Value = tuesday_remote();
    request["user_id"] = json!("   ");

    let (status, _) = send(&app, "POST", "/overrides", Some(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_second_approved_request_same_day_is_conflict() {
    let app: Router = create_profiled_app().await;
    send(&app, "POST", "/overrides", Some(tuesday_remote())).await;

    let (status, body) = send(&app, "POST", "/overrides", Some(tuesday_remote())).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("delete it first"));
}

#[tokio::test]
async fn test_approval_flow() {
    let app: Router = create_profiled_app().await;
    require_approval(&app).await;

    let (status, body) = send(&app, "POST", "/overrides", Some(tuesday_remote())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["override"]["approval"]["status"], "pending");
    let id: String = body["override"]["id"].as_str().unwrap().to_string();

    let (_, day) = send(&app, "GET", "/users/u-alice/days/2026-03-03", None).await;
    assert_eq!(day["resolved_mode"], "office");
    assert_eq!(day["has_pending_request"], true);

    let (status, approved) = send(
        &app,
        "POST",
        &format!("/overrides/{id}/approve"),
        Some(json!({ "approver": "manager", "note": "Enjoy" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["approval"]["status"], "approved");
    assert_eq!(approved["approval"]["by"], "manager");

    let (status, _) = send(
        &app,
        "POST",
        &format!("/overrides/{id}/approve"),
        Some(json!({ "approver": "manager" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, day) = send(&app, "GET", "/users/u-alice/days/2026-03-03", None).await;
    assert_eq!(day["resolved_mode"], "remote");
}

#[tokio::test]
async fn test_reject_needs_reason() {
    let app: Router = create_profiled_app().await;
    require_approval(&app).await;
    let (_, body) = send(&app, "POST", "/overrides", Some(tuesday_remote())).await;
    let id: String = body["override"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/overrides/{id}/reject"),
        Some(json!({ "approver": "manager", "reason": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, rejected) = send(
        &app,
        "POST",
        &format!("/overrides/{id}/reject"),
        Some(json!({ "approver": "manager", "reason": "Team offsite" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rejected["approval"]["status"], "rejected");
    assert_eq!(rejected["approval"]["reason"], "Team offsite");
}

#[tokio::test]
async fn test_unknown_override_is_not_found() {
    let app: Router = create_profiled_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/overrides/999/approve",
        Some(json!({ "approver": "manager" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_then_not_found() {
    let app: Router = create_profiled_app().await;
    let (_, body) = send(&app, "POST", "/overrides", Some(tuesday_remote())).await;
    let id: String = body["override"]["id"].as_str().unwrap().to_string();

    let (first, _) = send(&app, "DELETE", &format!("/overrides/{id}"), None).await;
    let (second, _) = send(&app, "DELETE", &format!("/overrides/{id}"), None).await;

    assert_eq!(first, StatusCode::NO_CONTENT);
    assert_eq!(second, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_imposed_override_dominates() {
    let app: Router = create_profiled_app().await;
    send(&app, "POST", "/overrides", Some(tuesday_remote())).await;

    let (status, imposed) = send(
        &app,
        "POST",
        "/overrides/impose",
        Some(json!({
            "user_id": "u-alice",
            "date": "2026-03-03",
            "mode": "office",
            "imposed_by": "director",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(imposed["source"], "admin_imposed");

    let (_, day) = send(&app, "GET", "/users/u-alice/days/2026-03-03", None).await;
    assert_eq!(day["resolved_mode"], "office");
    assert_eq!(day["source"], "admin_imposed");
    assert_eq!(day["confidence"], 100);
}

#[tokio::test]
async fn test_validate_stores_nothing() {
    let app: Router = create_profiled_app().await;

    let (status, verdict) = send(
        &app,
        "POST",
        "/overrides/validate",
        Some(json!({ "user_id": "u-alice", "date": "2026-03-03", "mode": "remote" })),
    )
    .await;
    let (_, listed) = send(
        &app,
        "GET",
        "/users/u-alice/overrides?start=2026-03-02&end=2026-03-08",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(verdict["is_valid"], true);
    assert_eq!(verdict["can_proceed"], true);
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_overrides_in_range() {
    let app: Router = create_profiled_app().await;
    send(&app, "POST", "/overrides", Some(tuesday_remote())).await;

    let (in_range_status, in_range) = send(
        &app,
        "GET",
        "/users/u-alice/overrides?start=2026-03-02&end=2026-03-08",
        None,
    )
    .await;
    let (_, outside) = send(
        &app,
        "GET",
        "/users/u-alice/overrides?start=2026-03-09&end=2026-03-15",
        None,
    )
    .await;

    assert_eq!(in_range_status, StatusCode::OK);
    assert_eq!(in_range.as_array().unwrap().len(), 1);
    assert!(outside.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_approved_day_changes_after_delete() {
    let app: Router = create_profiled_app().await;
    let (_, first) = send(&app, "POST", "/overrides", Some(tuesday_remote())).await;
    let id: String = first["override"]["id"].as_str().unwrap().to_string();

    let mut office: Value = tuesday_remote();
    office["mode"] = json!("office");
    let (status, _) = send(&app, "POST", "/overrides", Some(office.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "DELETE", &format!("/overrides/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "POST", "/overrides", Some(office)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["override"]["approval"]["status"], "approved");

    let (_, day) = send(&app, "GET", "/users/u-alice/days/2026-03-03", None).await;
    assert_eq!(day["resolved_mode"], "office");
    assert_eq!(day["source"], "override");
}
