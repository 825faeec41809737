/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::fixtures::{send, TestFixture};
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_label_lifecycle() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Labels");
    let check = fixture.create_test_check(project.project.id, "Deploys", "");
    let uri = format!("/api/v3/checks/{}/labels/", check.id);

    let (status, body) = send(&app, "POST", &uri, Some(&project.api_key), Some(json!({"name": " staging "}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "staging");

    let (status, _) = send(&app, "POST", &uri, Some(&project.api_key), Some(json!({"name": "production"}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", &uri, Some(&project.api_key), Some(json!({"name": "staging"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "label already exists");

    let (status, body) = send(&app, "GET", &uri, Some(&project.read_key), None).await;
    assert_eq!(status, StatusCode::OK);
    let labels = body["labels"].as_array().unwrap();
    assert_eq!(labels.len(), 2);
    assert_eq!(labels[0]["name"], "production");
    assert_eq!(labels[1]["name"], "staging");

    let delete = format!("{}{}", uri, labels[0]["uuid"].as_str().unwrap());
    let (status, _) = send(&app, "DELETE", &delete, Some(&project.api_key), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &delete, Some(&project.api_key), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_same_label_on_different_checks() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Shared Labels");

    for name in ["first", "second"] {
        let check = fixture.create_test_check(project.project.id, name, "");
        let uri = format!("/api/v3/checks/{}/labels/", check.id);
        let (status, _) = send(&app, "POST", &uri, Some(&project.api_key), Some(json!({"name": "deploy"}))).await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

#[tokio::test]
async fn test_label_validation() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Label Errors");
    let check = fixture.create_test_check(project.project.id, "Deploys", "");
    let uri = format!("/api/v3/checks/{}/labels/", check.id);

    let cases = [
        (json!({}), "name is required"),
        (json!({"name": "   "}), "name is required"),
        (json!({"name": 7}), "name must be a string"),
        (json!({"name": "n".repeat(101)}), "name is too long"),
    ];
    for (payload, message) in cases {
        let (status, body) = send(&app, "POST", &uri, Some(&project.api_key), Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", message);
        assert_eq!(body["error"], message);
    }

    let (status, _) = send(&app, "POST", &uri, Some(&project.read_key), Some(json!({"name": "ro"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
