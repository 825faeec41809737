/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Public ping endpoints.
//!
//! Pings need no API key: the check UUID, or the project's ping key plus the
//! check slug, is the credential. Responses are plain text.
//!
//! | Path | Check | Kind |
//! |---|---|---|
//! | `/ping/{uuid}` | by UUID | success |
//! | `/ping/{uuid}/start`, `/ping/{uuid}/fail` | by UUID | start, fail |
//! | `/ping/{uuid}/{exit_status}` | by UUID | 0 is success, 1..=255 fail |
//! | `/ping/{ping_key}/{slug}` | by slug | success |
//! | `/ping/{ping_key}/{slug}/{start,fail}` | by slug | start, fail |

use crate::dal::{PingOutcome, DAL};
use crate::metrics;
use axum::{
    body::Bytes,
    extract::{Extension, Path, RawQuery, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use diesel::QueryResult;
use std::sync::Arc;
use uuid::Uuid;
use vigil_models::models::checks::Check;
use vigil_models::models::pings::{PingRequest, KIND_FAIL, KIND_START, KIND_SUCCESS};
use vigil_utils::config::Settings;
use vigil_utils::logging::prelude::*;

pub fn routes() -> Router<DAL> {
    info!("Setting up ping routes");
    Router::new()
        .route("/ping/:first", get(ping_one).post(ping_one))
        .route("/ping/:first/", get(ping_one).post(ping_one))
        .route("/ping/:first/:second", get(ping_two).post(ping_two))
        .route("/ping/:first/:second/:third", get(ping_three).post(ping_three))
}

/// How a ping URL names its check.
#[derive(Debug, PartialEq)]
enum Target {
    Code(Uuid),
    Slug { ping_key: String, slug: String },
}

/// Maps a trailing path segment to a ping kind.
///
/// `start` and `fail` are named actions; a number in 0..=255 is a process
/// exit status where only 0 counts as success.
fn action_kind(segment: &str, allow_exit_status: bool) -> Option<&'static str> {
    match segment {
        "start" => Some(KIND_START),
        "fail" => Some(KIND_FAIL),
        _ if allow_exit_status => match segment.parse::<u8>() {
            Ok(0) => Some(KIND_SUCCESS),
            Ok(_) => Some(KIND_FAIL),
            Err(_) => None,
        },
        _ => None,
    }
}

fn resolve_two(first: &str, second: &str) -> (Target, &'static str) {
    if let Ok(code) = Uuid::parse_str(first) {
        if let Some(kind) = action_kind(second, true) {
            return (Target::Code(code), kind);
        }
    }
    (
        Target::Slug {
            ping_key: first.to_string(),
            slug: second.to_string(),
        },
        KIND_SUCCESS,
    )
}

fn find_check(dal: &DAL, target: &Target) -> QueryResult<Option<Check>> {
    match target {
        Target::Code(code) => dal.checks().get(*code),
        // postgres rejects NUL in text binds, and no key or slug can hold one
        Target::Slug { ping_key, slug } if ping_key.contains('\0') || slug.contains('\0') => {
            Ok(None)
        }
        Target::Slug { ping_key, slug } => match dal.projects().get_by_ping_key(ping_key)? {
            Some(project) => dal.checks().get_by_slug(project.id, slug),
            None => Ok(None),
        },
    }
}

/// Request details shared by every ping route.
struct PingContext {
    dal: DAL,
    settings: Arc<Settings>,
    method: Method,
    headers: HeaderMap,
    query: Option<String>,
    body: Bytes,
}

impl PingContext {
    fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn label(&self) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "label")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.contains('\0'))
    }

    fn ping_request(&self, kind: &str) -> Result<PingRequest, String> {
        let scheme = self
            .header("x-forwarded-proto")
            .unwrap_or_else(|| "http".to_string());
        let mut request = PingRequest::new(kind, &scheme, self.method.as_str())?;
        request.remote_addr = self
            .header("x-forwarded-for")
            .and_then(|v| v.split(',').next().map(|addr| addr.trim().to_string()));
        request.ua = self.header("user-agent");

        request.body = ping_body(&self.body, self.settings.pings.body_limit);
        Ok(request)
    }
}

/// Decodes at most `limit` bytes of a ping body for storage.
///
/// Invalid UTF-8 becomes U+FFFD and NUL bytes are dropped, since text columns
/// cannot hold them.
fn ping_body(body: &[u8], limit: usize) -> Option<String> {
    let limit = body.len().min(limit);
    if limit == 0 {
        return None;
    }
    Some(String::from_utf8_lossy(&body[..limit]).replace('\0', ""))
}

fn plain(status: StatusCode, text: &'static str) -> Response {
    (status, text).into_response()
}

async fn handle_ping(ctx: PingContext, target: Option<Target>, kind: &'static str) -> Response {
    let Some(target) = target else {
        metrics::record_ping(kind, "not_found");
        return plain(StatusCode::NOT_FOUND, "not found");
    };

    let check = match find_check(&ctx.dal, &target) {
        Ok(Some(check)) => check,
        Ok(None) => {
            debug!("Ping for unknown check {:?}", target);
            metrics::record_ping(kind, "not_found");
            return plain(StatusCode::NOT_FOUND, "not found");
        }
        Err(e) => {
            error!("Failed to look up check for ping: {:?}", e);
            return plain(StatusCode::INTERNAL_SERVER_ERROR, "internal server error");
        }
    };

    let request = match ctx.ping_request(kind) {
        Ok(request) => request,
        Err(e) => {
            error!("Failed to build ping request: {}", e);
            return plain(StatusCode::INTERNAL_SERVER_ERROR, "internal server error");
        }
    };
    let label = ctx.label();

    match ctx.dal.pings().record(check.id, request, label.as_deref()) {
        Ok(PingOutcome::Recorded(updated)) => {
            debug!("Recorded {} ping #{} for check {}", kind, updated.n_pings, updated.id);
            metrics::record_ping(kind, "recorded");
            plain(StatusCode::OK, "OK")
        }
        Ok(PingOutcome::Ignored) => {
            metrics::record_ping(kind, "ignored");
            plain(StatusCode::OK, "OK (ignored)")
        }
        Ok(PingOutcome::Archived) => {
            metrics::record_ping(kind, "archived");
            plain(StatusCode::GONE, "archived")
        }
        Err(e) => {
            error!("Failed to record ping for check {}: {:?}", check.id, e);
            plain(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
        }
    }
}

async fn ping_one(
    State(dal): State<DAL>,
    Extension(settings): Extension<Arc<Settings>>,
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    Path(first): Path<String>,
    body: Bytes,
) -> Response {
    let ctx = PingContext { dal, settings, method, headers, query, body };
    let target = Uuid::parse_str(&first).ok().map(Target::Code);
    handle_ping(ctx, target, KIND_SUCCESS).await
}

async fn ping_two(
    State(dal): State<DAL>,
    Extension(settings): Extension<Arc<Settings>>,
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    Path((first, second)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    let ctx = PingContext { dal, settings, method, headers, query, body };
    let (target, kind) = resolve_two(&first, &second);
    handle_ping(ctx, Some(target), kind).await
}

async fn ping_three(
    State(dal): State<DAL>,
    Extension(settings): Extension<Arc<Settings>>,
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    Path((ping_key, slug, action)): Path<(String, String, String)>,
    body: Bytes,
) -> Response {
    let ctx = PingContext { dal, settings, method, headers, query, body };
    match action_kind(&action, false) {
        Some(kind) => handle_ping(ctx, Some(Target::Slug { ping_key, slug }), kind).await,
        None => handle_ping(ctx, None, KIND_SUCCESS).await,
    }
}
