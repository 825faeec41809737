/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::fixtures::{send, send_raw, TestFixture};
use axum::http::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_archive_and_restore() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Archive");
    let check = fixture.create_test_check(project.project.id, "Old Job", "");
    let key = Some(project.api_key.as_str());

    let archive = format!("/api/v3/checks/{}/archive/", check.id);
    let restore = format!("/api/v3/checks/{}/restore/", check.id);

    let (status, body) = send(&app, "POST", &restore, key, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "check is not archived");

    let (status, body) = send(&app, "POST", &archive, key, Some(json!({"reason": "ops"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["archived_at"].is_string());

    let (status, body) = send(&app, "POST", &archive, key, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "check is already archived");

    let (_, body) = send(&app, "GET", "/api/v3/checks/", key, None).await;
    assert!(body["checks"].as_array().unwrap().is_empty());
    let (_, body) = send(&app, "GET", "/api/v3/checks/?archived=1", key, None).await;
    assert_eq!(body["checks"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "POST", &restore, key, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["archived_at"], Value::Null);
    assert_eq!(body["status"], "new");

    let history = format!("/api/v3/checks/{}/archive-history/", check.id);
    let (status, body) = send(&app, "GET", &history, Some(&project.read_key), None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["archive_history"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["action"], "restored");
    assert_eq!(entries[0]["by"], "api");
    assert_eq!(entries[1]["action"], "archived");
    assert_eq!(entries[1]["by"], "ops");
    assert_eq!(entries[1]["check"], check.id.to_string());
}

#[tokio::test]
async fn test_archived_check_rejects_pings() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Archived Pings");
    let check = fixture.create_test_check(project.project.id, "Quiet", "");

    let archive = format!("/api/v3/checks/{}/archive/", check.id);
    send(&app, "POST", &archive, Some(&project.api_key), None).await;

    let (status, text) = send_raw(&app, "GET", &format!("/ping/{}", check.id), None, None).await;
    assert_eq!(status, StatusCode::GONE);
    assert_eq!(text, "archived");

    let stored = fixture.dal.checks().get(check.id).unwrap().unwrap();
    assert_eq!(stored.n_pings, 0);
}

#[tokio::test]
async fn test_restore_needs_capacity() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project_with_limit("Full", 1);
    let archived = fixture.create_test_check(project.project.id, "First", "");

    let archive = format!("/api/v3/checks/{}/archive/", archived.id);
    send(&app, "POST", &archive, Some(&project.api_key), None).await;
    // the archived check no longer counts, so there is room for another
    fixture.create_test_check(project.project.id, "Second", "");

    let restore = format!("/api/v3/checks/{}/restore/", archived.id);
    let (status, body) = send(&app, "POST", &restore, Some(&project.api_key), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "no checks available");
}
