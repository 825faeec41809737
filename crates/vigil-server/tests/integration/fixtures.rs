/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Test fixture for the Vigil server.
//!
//! Every fixture migrates a schema of its own and drops it again when it goes
//! out of scope, so tests can run in parallel against one database.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use dotenv::dotenv;
use serde_json::Value;
use std::env;
use tower::ServiceExt;
use uuid::Uuid;
use vigil_models::models::checks::{Check, NewCheck};
use vigil_models::models::projects::Project;
use vigil_server::api;
use vigil_server::dal::DAL;
use vigil_server::db::{create_shared_connection_pool, ConnectionPool};
use vigil_server::utils;
use vigil_utils::config::Settings;

/// A project together with the plain keys handed out for it.
#[derive(Clone, Debug)]
pub struct TestProject {
    pub project: Project,
    pub api_key: String,
    pub read_key: String,
    pub ping_key: String,
}

pub struct TestFixture {
    pub dal: DAL,
    pub settings: Settings,
    pool: ConnectionPool,
}

impl TestFixture {
    /// Creates a fixture on `DATABASE_URL` (or the configured default) in a fresh schema.
    ///
    /// # Panics
    ///
    /// Panics when the database is unreachable or migrations fail.
    pub fn new() -> Self {
        dotenv().ok();
        let mut settings = Settings::new(None).expect("Failed to load settings");
        if let Ok(url) = env::var("DATABASE_URL") {
            settings.database.url = url;
        }
        let schema = format!("test_{}", Uuid::new_v4().simple());
        settings.database.schema = Some(schema.clone());

        let pool = create_shared_connection_pool(&settings.database.url, 3, Some(&schema))
            .expect("Failed to create connection pool");
        pool.setup_schema().expect("Failed to create test schema");
        pool.run_migrations().expect("Failed to run migrations");

        TestFixture {
            dal: DAL::new(pool.clone()),
            settings,
            pool,
        }
    }

    pub fn create_test_router(&self) -> Router {
        api::configure_api_routes(self.dal.clone(), &self.settings).with_state(self.dal.clone())
    }

    pub fn create_test_project(&self, name: &str) -> TestProject {
        self.create_test_project_with_limit(name, 20)
    }

    pub fn create_test_project_with_limit(&self, name: &str, check_limit: i32) -> TestProject {
        let (project, keys) =
            utils::create_project(&self.dal, name, check_limit).expect("Failed to create project");
        TestProject {
            project,
            api_key: keys.api_key,
            read_key: keys.api_key_readonly,
            ping_key: keys.ping_key,
        }
    }

    pub fn create_test_check(&self, project_id: Uuid, name: &str, tags: &str) -> Check {
        let mut new_check =
            NewCheck::new(project_id, name.to_string()).expect("Failed to build NewCheck");
        new_check.tags = tags.to_string();
        self.dal
            .checks()
            .create(&new_check)
            .expect("Failed to create check")
    }
}

impl Drop for TestFixture {
    fn drop(&mut self) {
        let _ = self.pool.drop_schema();
    }
}

/// Sends a request and returns the status with the body parsed as JSON
/// (`Value::Null` for an empty or non-JSON body).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    api_key: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let raw = body.map(|b| b.to_string());
    let (status, text) = send_raw(app, method, uri, api_key, raw).await;
    let json = serde_json::from_str(&text).unwrap_or(Value::Null);
    (status, json)
}

/// Sends a request with a raw string body and returns the status and body text.
pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    api_key: Option<&str>,
    body: Option<String>,
) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = api_key {
        builder = builder.header("X-Api-Key", key);
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}
