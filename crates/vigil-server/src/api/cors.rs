/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! CORS handling for the management API.
//!
//! Any origin may call the API; the only credential is the `X-Api-Key`
//! header. Every response gets `Access-Control-Allow-Origin: *` from a layer
//! in [`crate::api::configure_api_routes`], and preflight requests are
//! answered here without authentication.

use axum::{
    extract::Extension,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use vigil_utils::config::Settings;

/// Headers a browser client may send.
pub const ALLOWED_HEADERS: &str = "X-Api-Key";

/// Answers an `OPTIONS` request for a route accepting the methods in `allow`.
pub async fn preflight(allow: &'static str, Extension(settings): Extension<Arc<Settings>>) -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(allow));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from(settings.cors.max_age_seconds),
    );
    response
}
