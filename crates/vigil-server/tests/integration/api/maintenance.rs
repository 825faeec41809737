/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::fixtures::{send, TestFixture};
use axum::http::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_create_and_list_windows() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Maintenance");
    let check = fixture.create_test_check(project.project.id, "Database", "");
    let uri = format!("/api/v3/checks/{}/maintenance/", check.id);

    let payload = json!({
        "start": "2025-03-01T02:00:00Z",
        "end": "2025-03-01T04:00:00+02:00",
        "reason": "upgrade",
    });
    let (status, body) = send(&app, "POST", &uri, Some(&project.api_key), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["start"], "2025-03-01T02:00:00+00:00");
    assert_eq!(body["end"], "2025-03-01T02:00:00+00:00");
    assert_eq!(body["reason"], "upgrade");

    let payload = json!({"start": "2025-04-01T00:00:00"});
    let (status, body) = send(&app, "POST", &uri, Some(&project.api_key), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["end"], Value::Null);
    assert_eq!(body["reason"], "");

    let (status, body) = send(&app, "GET", &uri, Some(&project.read_key), None).await;
    assert_eq!(status, StatusCode::OK);
    let windows = body["maintenance_windows"].as_array().unwrap();
    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0]["start"], "2025-04-01T00:00:00+00:00");

    let check_uri = format!("/api/v3/checks/{}", check.id);
    let (_, body) = send(&app, "GET", &check_uri, Some(&project.api_key), None).await;
    assert_eq!(body["maintenance_windows_count"], 2);
}

#[tokio::test]
async fn test_window_validation() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Window Errors");
    let check = fixture.create_test_check(project.project.id, "Database", "");
    let uri = format!("/api/v3/checks/{}/maintenance/", check.id);

    let cases = [
        (json!({}), "start is required"),
        (json!({"start": "yesterday"}), "invalid start"),
        (json!({"start": "2025-03-01T02:00:00Z", "end": "later"}), "invalid end"),
        (
            json!({"start": "2025-03-01T02:00:00Z", "end": "2025-03-01T01:00:00Z"}),
            "end must not be before start",
        ),
        (
            json!({"start": "2025-03-01T02:00:00Z", "reason": "r".repeat(201)}),
            "reason is too long",
        ),
    ];

    for (payload, message) in cases {
        let (status, body) = send(&app, "POST", &uri, Some(&project.api_key), Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", message);
        assert_eq!(body["error"], message);
    }
}

#[tokio::test]
async fn test_delete_window() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Window Delete");
    let check = fixture.create_test_check(project.project.id, "Database", "");
    let other = fixture.create_test_check(project.project.id, "Cache", "");
    let uri = format!("/api/v3/checks/{}/maintenance/", check.id);

    let payload = json!({"start": "2025-03-01T02:00:00Z"});
    let (_, body) = send(&app, "POST", &uri, Some(&project.api_key), Some(payload)).await;
    let window = body["uuid"].as_str().unwrap().to_string();

    // a window can only be deleted through its own check
    let wrong = format!("/api/v3/checks/{}/maintenance/{}", other.id, window);
    let (status, _) = send(&app, "DELETE", &wrong, Some(&project.api_key), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let delete = format!("{}{}", uri, window);
    let (status, _) = send(&app, "DELETE", &delete, Some(&project.read_key), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "DELETE", &delete, Some(&project.api_key), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", &delete, Some(&project.api_key), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
