/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Metrics Module
//!
//! Prometheus metrics for the Vigil server: HTTP traffic recorded by
//! [`track_metrics`] and ping outcomes recorded by the ping endpoints.

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use once_cell::sync::Lazy;
use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::time::Instant;

/// Global Prometheus registry for all server metrics
pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// HTTP request counter
/// Labels: endpoint, method, status
pub static HTTP_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    let opts = Opts::new(
        "vigil_http_requests_total",
        "Total number of HTTP requests by endpoint and status",
    );
    let counter = CounterVec::new(opts, &["endpoint", "method", "status"])
        .expect("Failed to create HTTP requests counter");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("Failed to register HTTP requests counter");
    counter
});

/// HTTP request duration histogram
/// Labels: endpoint, method
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let opts = HistogramOpts::new(
        "vigil_http_request_duration_seconds",
        "HTTP request latency distribution in seconds",
    )
    .buckets(vec![
        0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ]);
    let histogram = HistogramVec::new(opts, &["endpoint", "method"])
        .expect("Failed to create HTTP request duration histogram");
    REGISTRY
        .register(Box::new(histogram.clone()))
        .expect("Failed to register HTTP request duration histogram");
    histogram
});

/// Ping counter
/// Labels: kind (success, start, fail), outcome (recorded, ignored, archived, not_found)
pub static PINGS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    let opts = Opts::new("vigil_pings_total", "Total number of pings by kind and outcome");
    let counter =
        CounterVec::new(opts, &["kind", "outcome"]).expect("Failed to create pings counter");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("Failed to register pings counter");
    counter
});

/// Counts a ping of `kind` that ended with `outcome`.
pub fn record_ping(kind: &str, outcome: &str) {
    PINGS_TOTAL.with_label_values(&[kind, outcome]).inc();
}

/// Middleware recording request count and latency per matched route.
///
/// The route template is used as the endpoint label so check codes do not
/// create one series per check.
pub async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let method = request.method().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[&endpoint, &method])
        .observe(start.elapsed().as_secs_f64());
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&endpoint, &method, response.status().as_str()])
        .inc();
    response
}

/// Encodes all registered metrics in Prometheus text format
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return format!("# failed to encode metrics: {}\n", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
