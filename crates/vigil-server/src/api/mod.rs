/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # API Routes Aggregator Module
//!
//! Assembles the management API under every supported version prefix, the
//! public ping endpoints and the operational endpoints into one router.

pub mod cors;
pub mod ping;
pub mod v3;

use crate::dal::DAL;
use crate::metrics;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Router,
};
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;
use vigil_utils::config::Settings;

/// Versions served by the management API.
pub const API_VERSIONS: [u8; 3] = [1, 2, 3];

/// API version of the current request, taken from its path prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApiVersion(pub u8);

/// Configures and returns the main application router.
///
/// # Arguments
///
/// * `dal` - An instance of the Data Access Layer
/// * `config` - Settings made available to handlers as `Extension<Arc<Settings>>`
pub fn configure_api_routes(dal: DAL, config: &Settings) -> Router<DAL> {
    let mut router = Router::new();
    for version in API_VERSIONS {
        router = router.nest(
            &format!("/api/v{}", version),
            v3::routes(dal.clone(), version),
        );
    }

    router
        .merge(ping::routes())
        .route("/api/openapi.json", get(v3::openapi::serve_openapi))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics_handler))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(axum::middleware::from_fn(metrics::track_metrics))
        .layer(Extension(Arc::new(config.clone())))
}

/// Health check endpoint handler
///
/// Returns a 200 OK status code with "OK" in the body.
async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Ready check endpoint handler
///
/// Returns a 200 OK status code with "Ready" in the body.
async fn readyz() -> impl IntoResponse {
    (StatusCode::OK, "Ready")
}

/// Prometheus scrape endpoint.
async fn metrics_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::encode_metrics(),
    )
}
