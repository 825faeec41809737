/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::fixtures::{send, TestFixture};
use axum::http::StatusCode;
use serde_json::{json, Value};

fn names(body: &Value) -> Vec<String> {
    body["checks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_create_check() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Create");

    let payload = json!({
        "name": "Backups",
        "slug": "backups",
        "tags": " prod  db ",
        "timeout": 3600,
        "grace": 60,
        "priority": 2,
    });
    let (status, body) = send(&app, "POST", "/api/v3/checks/", Some(&project.api_key), Some(payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Backups");
    assert_eq!(body["slug"], "backups");
    assert_eq!(body["tags"], "prod  db");
    assert_eq!(body["timeout"], 3600);
    assert_eq!(body["grace"], 60);
    assert_eq!(body["priority"], 2);
    assert_eq!(body["status"], "new");
    assert_eq!(body["n_pings"], 0);
    assert_eq!(body["pause_reason"], "");
    assert_eq!(body["archived_at"], Value::Null);
    assert_eq!(body["cloned_from"], Value::Null);
    assert_eq!(body["maintenance_windows_count"], 0);

    let uuid = body["uuid"].as_str().unwrap();
    assert_eq!(body["ping_url"], format!("http://localhost:8000/ping/{}", uuid));
    assert_eq!(
        body["update_url"],
        format!("http://localhost:8000/api/v3/checks/{}", uuid)
    );
    assert!(body.get("schedule").is_none());
}

#[tokio::test]
async fn test_create_cron_check() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Cron");

    let payload = json!({"name": "Nightly", "schedule": "0 3 * * *", "tz": "Europe/Riga"});
    let (status, body) = send(&app, "POST", "/api/v3/checks/", Some(&project.api_key), Some(payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["schedule"], "0 3 * * *");
    assert_eq!(body["tz"], "Europe/Riga");
    assert!(body.get("timeout").is_none());
}

#[tokio::test]
async fn test_create_check_validation() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Validation");

    let cases = [
        (json!({"priority": 3}), "json validation error: priority is too large"),
        (json!({"priority": -1}), "json validation error: priority is too small"),
        (json!({"priority": "high"}), "json validation error: priority is not a number"),
        (json!({"timeout": 10}), "json validation error: timeout is too small"),
        (json!({"name": 5}), "json validation error: name is not a string"),
        (json!({"name": "x".repeat(101)}), "json validation error: name is too long"),
        (json!({"slug": "Not Valid"}), "json validation error: slug does not match pattern ^[a-z0-9-_]*$"),
        (json!({"methods": "GET"}), "json validation error: methods has unexpected value"),
        (json!({"manual_resume": "yes"}), "json validation error: manual_resume is not a boolean"),
        (json!({"name": "a\u{0}b"}), "json validation error: name must not contain NUL characters"),
    ];

    for (payload, message) in cases {
        let (status, body) = send(&app, "POST", "/api/v3/checks/", Some(&project.api_key), Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", message);
        assert_eq!(body["error"], message);
    }
}

#[tokio::test]
async fn test_create_check_at_capacity() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project_with_limit("Tiny", 1);

    let (status, _) = send(&app, "POST", "/api/v3/checks/", Some(&project.api_key), Some(json!({"name": "One"}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/api/v3/checks/", Some(&project.api_key), Some(json!({"name": "Two"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "no checks available");
}

#[tokio::test]
async fn test_list_checks_ordered_by_priority_then_name() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Ordering");

    for (name, priority) in [("bravo", 1), ("alpha", 0), ("charlie", 2), ("delta", 1)] {
        let payload = json!({"name": name, "priority": priority});
        let (status, _) = send(&app, "POST", "/api/v3/checks/", Some(&project.api_key), Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/api/v3/checks/", Some(&project.api_key), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["charlie", "bravo", "delta", "alpha"]);
}

#[tokio::test]
async fn test_tag_filter_matches_exact_tokens() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Tags");
    fixture.create_test_check(project.project.id, "both", "foo bar");
    fixture.create_test_check(project.project.id, "prefix", "foobar");
    fixture.create_test_check(project.project.id, "single", "foo");
    fixture.create_test_check(project.project.id, "other", "bar baz");

    let (_, body) = send(&app, "GET", "/api/v3/checks/?tag=foo", Some(&project.api_key), None).await;
    assert_eq!(names(&body), vec!["both", "single"]);

    let (_, body) = send(&app, "GET", "/api/v3/checks/?tag=foo&tag=bar", Some(&project.api_key), None).await;
    assert_eq!(names(&body), vec!["both"]);

    let (_, body) = send(&app, "GET", "/api/v3/checks/?tag=fo", Some(&project.api_key), None).await;
    assert!(names(&body).is_empty());
}

#[tokio::test]
async fn test_slug_filter() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Slugs");

    let payload = json!({"name": "Backups", "slug": "backups"});
    send(&app, "POST", "/api/v3/checks/", Some(&project.api_key), Some(payload)).await;
    fixture.create_test_check(project.project.id, "Unslugged", "");

    let (_, body) = send(&app, "GET", "/api/v3/checks/?slug=backups", Some(&project.api_key), None).await;
    assert_eq!(names(&body), vec!["Backups"]);
}

#[tokio::test]
async fn test_update_url_follows_api_version() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Versions");
    let check = fixture.create_test_check(project.project.id, "Versioned", "");

    for version in [1, 2, 3] {
        let uri = format!("/api/v{}/checks/{}", version, check.id);
        let (status, body) = send(&app, "GET", &uri, Some(&project.api_key), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["update_url"],
            format!("http://localhost:8000/api/v{}/checks/{}", version, check.id)
        );
        assert_eq!(
            body["pause_url"],
            format!("http://localhost:8000/api/v{}/checks/{}/pause", version, check.id)
        );
        assert_eq!(body.get("started").is_some(), version >= 2);
    }
}

#[tokio::test]
async fn test_trailing_slash_is_optional() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Slashes");
    let check = fixture.create_test_check(project.project.id, "Slash", "");

    for uri in [
        "/api/v3/checks".to_string(),
        "/api/v3/checks/".to_string(),
        format!("/api/v3/checks/{}", check.id),
        format!("/api/v3/checks/{}/", check.id),
        format!("/api/v3/checks/{}/archive-history", check.id),
    ] {
        let (status, _) = send(&app, "GET", &uri, Some(&project.api_key), None).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
    }
}

#[tokio::test]
async fn test_update_check() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Update");
    let check = fixture.create_test_check(project.project.id, "Before", "");

    let uri = format!("/api/v3/checks/{}", check.id);
    let payload = json!({"name": "After", "tags": "a b", "priority": 0, "schedule": "*/5 * * * *"});
    let (status, body) = send(&app, "POST", &uri, Some(&project.api_key), Some(payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "After");
    assert_eq!(body["tags"], "a b");
    assert_eq!(body["priority"], 0);
    assert_eq!(body["schedule"], "*/5 * * * *");

    let (status, body) = send(&app, "POST", &uri, Some(&project.api_key), Some(json!({"grace": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "json validation error: grace is too small");
}

#[tokio::test]
async fn test_delete_check() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Delete");
    let check = fixture.create_test_check(project.project.id, "Doomed", "");

    let uri = format!("/api/v3/checks/{}", check.id);
    let (status, body) = send(&app, "DELETE", &uri, Some(&project.api_key), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Doomed");

    let (status, _) = send(&app, "GET", &uri, Some(&project.api_key), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pause_and_resume() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Pause");
    let check = fixture.create_test_check(project.project.id, "Pausable", "");

    let pause = format!("/api/v3/checks/{}/pause", check.id);
    let resume = format!("/api/v3/checks/{}/resume", check.id);

    let (status, body) = send(&app, "POST", &resume, Some(&project.api_key), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "check is not paused");

    let payload = json!({"reason": "planned migration"});
    let (status, body) = send(&app, "POST", &pause, Some(&project.api_key), Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "paused");
    assert_eq!(body["pause_reason"], "planned migration");

    let (status, body) = send(&app, "POST", &resume, Some(&project.api_key), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "new");
    assert_eq!(body["pause_reason"], "");
}

#[tokio::test]
async fn test_pause_reason_validation() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Pause Reason");
    let check = fixture.create_test_check(project.project.id, "Pausable", "");
    let pause = format!("/api/v3/checks/{}/pause", check.id);

    let (status, body) = send(&app, "POST", &pause, Some(&project.api_key), Some(json!({"reason": "r".repeat(201)}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "reason is too long");

    let (status, body) = send(&app, "POST", &pause, Some(&project.api_key), Some(json!({"reason": 42}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "reason must be a string");

    let (status, body) = send(&app, "POST", &pause, Some(&project.api_key), Some(json!({"reason": "r".repeat(200)}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pause_reason"].as_str().unwrap().len(), 200);
}

#[tokio::test]
async fn test_list_checks_rejects_nul_in_query() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let project = fixture.create_test_project("Nul Query");
    fixture.create_test_check(project.project.id, "Backups", "prod");

    let (status, body) = send(&app, "GET", "/api/v3/checks/?slug=%00", Some(&project.api_key), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "slug must not contain NUL characters");

    let (status, _) = send(&app, "GET", "/api/v3/checks/?tag=prod%00", Some(&project.api_key), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/api/v3/checks/?tag=prod", Some(&project.api_key), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Backups"]);
}
