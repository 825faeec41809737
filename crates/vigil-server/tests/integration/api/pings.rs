/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::fixtures::{send, send_raw, TestFixture};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_ping_by_uuid() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Pings");
    let check = fixture.create_test_check(project.project.id, "Backups", "");
    let check_uri = format!("/api/v3/checks/{}", check.id);

    let (status, text) = send_raw(&app, "GET", &format!("/ping/{}", check.id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "OK");

    let (_, body) = send(&app, "GET", &check_uri, Some(&project.api_key), None).await;
    assert_eq!(body["n_pings"], 1);
    assert_eq!(body["status"], "up");
    assert!(body["last_ping"].is_string());
    assert!(body["next_ping"].is_string());

    send_raw(&app, "POST", &format!("/ping/{}/start", check.id), None, None).await;
    let (_, body) = send(&app, "GET", &check_uri, Some(&project.api_key), None).await;
    assert_eq!(body["started"], true);
    assert_eq!(body["status"], "up");

    send_raw(&app, "GET", &format!("/ping/{}/fail", check.id), None, None).await;
    let (_, body) = send(&app, "GET", &check_uri, Some(&project.api_key), None).await;
    assert_eq!(body["status"], "down");
    assert_eq!(body["n_pings"], 3);
}

#[tokio::test]
async fn test_exit_status_pings() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Exit Status");
    let check = fixture.create_test_check(project.project.id, "Cron", "");

    send_raw(&app, "GET", &format!("/ping/{}/1", check.id), None, None).await;
    let stored = fixture.dal.checks().get(check.id).unwrap().unwrap();
    assert_eq!(stored.status, "down");

    send_raw(&app, "GET", &format!("/ping/{}/0", check.id), None, None).await;
    let stored = fixture.dal.checks().get(check.id).unwrap().unwrap();
    assert_eq!(stored.status, "up");

    // 256 is not an exit status, so the segments are read as ping key and slug
    let (status, _) = send_raw(&app, "GET", &format!("/ping/{}/256", check.id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_checks() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();

    let unknown = uuid::Uuid::new_v4();
    for uri in [
        format!("/ping/{}", unknown),
        format!("/ping/{}/start", unknown),
        "/ping/not-a-uuid".to_string(),
        "/ping/nokey/noslug".to_string(),
    ] {
        let (status, text) = send_raw(&app, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(text, "not found");
    }
}

#[tokio::test]
async fn test_ping_by_slug() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Slugs");
    let key = Some(project.api_key.as_str());

    let (status, body) = send(
        &app,
        "POST",
        "/api/v3/checks/",
        key,
        Some(json!({"name": "Nightly", "slug": "nightly"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let check_uri = format!("/api/v3/checks/{}", body["uuid"].as_str().unwrap());

    let uri = format!("/ping/{}/nightly", project.ping_key);
    let (status, text) = send_raw(&app, "POST", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "OK");

    let uri = format!("/ping/{}/nightly/start", project.ping_key);
    let (status, _) = send_raw(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", &check_uri, key, None).await;
    assert_eq!(body["n_pings"], 2);
    assert_eq!(body["started"], true);

    let uri = format!("/ping/{}/nightly/7", project.ping_key);
    let (status, _) = send_raw(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/ping/{}/missing", project.ping_key);
    let (status, _) = send_raw(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_only_check_ignores_get() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Methods");
    let key = Some(project.api_key.as_str());

    let (_, body) = send(
        &app,
        "POST",
        "/api/v3/checks/",
        key,
        Some(json!({"name": "Webhook", "methods": "POST"})),
    )
    .await;
    let code = body["uuid"].as_str().unwrap().to_string();

    let (status, text) = send_raw(&app, "GET", &format!("/ping/{}", code), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "OK (ignored)");

    let (_, text) = send_raw(&app, "POST", &format!("/ping/{}", code), None, None).await;
    assert_eq!(text, "OK");

    let (_, body) = send(&app, "GET", &format!("/api/v3/checks/{}", code), key, None).await;
    assert_eq!(body["n_pings"], 1);
}

#[tokio::test]
async fn test_ping_list_with_labels_and_request_details() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Ping List");
    let check = fixture.create_test_check(project.project.id, "Deploys", "");

    let labels = format!("/api/v3/checks/{}/labels/", check.id);
    send(&app, "POST", &labels, Some(&project.api_key), Some(json!({"name": "canary"}))).await;

    let request = Request::builder()
        .method("POST")
        .uri(format!("/ping/{}?label=canary", check.id))
        .header("x-forwarded-for", "10.0.0.1, 10.0.0.2")
        .header("x-forwarded-proto", "https")
        .header("user-agent", "curl/8.0")
        .body(Body::from("done"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // an unknown label still records the ping, just without a label
    send_raw(&app, "GET", &format!("/ping/{}/start?label=other", check.id), None, None).await;

    let uri = format!("/api/v3/checks/{}/pings/", check.id);
    let (status, body) = send(&app, "GET", &uri, Some(&project.api_key), None).await;
    assert_eq!(status, StatusCode::OK);

    let pings = body["pings"].as_array().unwrap();
    assert_eq!(pings.len(), 2);
    assert_eq!(pings[0]["type"], "start");
    assert_eq!(pings[0]["n"], 2);
    assert!(pings[0]["label"].is_null());

    assert_eq!(pings[1]["type"], "success");
    assert_eq!(pings[1]["n"], 1);
    assert_eq!(pings[1]["label"], "canary");
    assert_eq!(pings[1]["scheme"], "https");
    assert_eq!(pings[1]["method"], "POST");
    assert_eq!(pings[1]["remote_addr"], "10.0.0.1");
    assert_eq!(pings[1]["ua"], "curl/8.0");
    assert!(pings[1]["date"].as_str().unwrap().ends_with("+00:00"));
}

#[tokio::test]
async fn test_manual_resume_keeps_paused() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Manual Resume");
    let key = Some(project.api_key.as_str());

    let (_, body) = send(
        &app,
        "POST",
        "/api/v3/checks/",
        key,
        Some(json!({"name": "Sticky", "manual_resume": true})),
    )
    .await;
    let code = body["uuid"].as_str().unwrap().to_string();
    send(&app, "POST", &format!("/api/v3/checks/{}/pause", code), key, None).await;

    send_raw(&app, "GET", &format!("/ping/{}", code), None, None).await;
    let (_, body) = send(&app, "GET", &format!("/api/v3/checks/{}", code), key, None).await;
    assert_eq!(body["status"], "paused");
    assert_eq!(body["n_pings"], 1);
}

#[tokio::test]
async fn test_nul_bytes_in_ping_input() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Nul Bytes");
    let check = fixture.create_test_check(project.project.id, "Logs", "");

    let (status, text) = send_raw(
        &app,
        "POST",
        &format!("/ping/{}?label=a%00b", check.id),
        None,
        Some("log\0line".to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "OK");

    let stored = fixture.dal.checks().get(check.id).unwrap().unwrap();
    assert_eq!(stored.n_pings, 1);
    let pings = fixture.dal.pings().list_for_check(check.id, 10).unwrap();
    assert_eq!(pings[0].0.body.as_deref(), Some("logline"));
    assert_eq!(pings[0].1, None);

    let uri = format!("/ping/{}/lo%00gs", project.ping_key);
    let (status, _) = send_raw(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
