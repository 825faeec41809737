/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Authentication middleware for the management API.
//!
//! The API key is read from the `X-Api-Key` header or, failing that, from the
//! `api_key` field of a JSON request body. The body is parsed once here and
//! handed to handlers as a [`RequestPayload`]. Preflight `OPTIONS` requests
//! pass through without a key.

use crate::dal::projects::KeyAccess;
use crate::dal::DAL;
use crate::utils::keys::{hash_key, API_KEY_LENGTH};
use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use vigil_models::models::projects::Project;
use vigil_utils::config::Settings;
use vigil_utils::logging::prelude::*;

const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// The project a request authenticated against.
#[derive(Clone, Debug)]
pub struct AuthPayload {
    pub project: Project,
    /// The request used the project's read-only key.
    pub read_only: bool,
}

impl AuthPayload {
    /// Rejects read-only keys on endpoints that change state.
    pub fn require_write(&self) -> Result<(), (StatusCode, Json<Value>)> {
        if self.read_only {
            warn!("Read-only key used on a write endpoint");
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "wrong api key"})),
            ));
        }
        Ok(())
    }
}

/// The JSON object sent as the request body. Empty when there was no body.
#[derive(Clone, Debug, Default)]
pub struct RequestPayload(pub Map<String, Value>);

fn reject(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"error": message}))).into_response()
}

/// Middleware function for authenticating requests.
///
/// On success the `AuthPayload` and the `RequestPayload` are added to the
/// request's extensions.
pub async fn auth_middleware(
    State(dal): State<DAL>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        return next.run(request).await;
    }

    let max_body_bytes = request
        .extensions()
        .get::<Arc<Settings>>()
        .map(|s| s.server.max_body_bytes)
        .unwrap_or(DEFAULT_MAX_BODY_BYTES);

    let (mut parts, body) = request.into_parts();
    let payload = match read_payload(body, max_body_bytes).await {
        Ok(payload) => payload,
        Err(message) => {
            warn!("Rejecting request body: {}", message);
            return reject(StatusCode::BAD_REQUEST, "could not parse request body");
        }
    };

    let header_key = parts
        .headers
        .get("X-Api-Key")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string);
    let api_key = header_key.or_else(|| match payload.get("api_key") {
        Some(Value::String(key)) if !key.is_empty() => Some(key.clone()),
        _ => None,
    });

    let Some(api_key) = api_key else {
        warn!("Request without api key");
        return reject(StatusCode::UNAUTHORIZED, "missing api key");
    };

    match verify_key(&dal, &api_key) {
        Ok(Some(auth_payload)) => {
            parts.extensions.insert(auth_payload);
            parts.extensions.insert(RequestPayload(payload));
            next.run(Request::from_parts(parts, Body::empty())).await
        }
        Ok(None) => {
            warn!("Authentication failed: unknown api key");
            reject(StatusCode::UNAUTHORIZED, "wrong api key")
        }
        Err(e) => {
            error!("Failed to verify api key: {:?}", e);
            reject(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
        }
    }
}

async fn read_payload(body: Body, limit: usize) -> Result<Map<String, Value>, String> {
    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| e.to_string())?;
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("body is not a JSON object".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

/// Looks up the project owning `api_key`. Keys of the wrong length never match.
fn verify_key(dal: &DAL, api_key: &str) -> diesel::QueryResult<Option<AuthPayload>> {
    if api_key.len() != API_KEY_LENGTH {
        return Ok(None);
    }
    let found = dal.projects().get_by_key_hash(&hash_key(api_key))?;
    Ok(found.map(|(project, access)| AuthPayload {
        project,
        read_only: access == KeyAccess::ReadOnly,
    }))
}
