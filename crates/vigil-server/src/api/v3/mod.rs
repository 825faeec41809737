/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! The management API.
//!
//! The same routes are mounted under `/api/v1`, `/api/v2` and `/api/v3`; the
//! version only changes how checks are rendered (see [`serialize`]). Every
//! route answers with and without a trailing slash and answers CORS preflight
//! requests.

pub mod activity;
pub mod archive;
pub mod checks;
pub mod clones;
pub mod labels;
pub mod maintenance;
pub mod middleware;
pub mod openapi;
pub mod serialize;
pub mod validation;

use crate::api::cors;
use crate::api::ApiVersion;
use crate::dal::DAL;
use axum::{
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post, MethodRouter},
    Extension, Json, Router,
};
use middleware::AuthPayload;
use serde_json::{json, Value};
use serialize::RenderContext;
use std::sync::Arc;
use uuid::Uuid;
use vigil_models::models::checks::Check;
use vigil_utils::config::Settings;
use vigil_utils::logging::prelude::*;

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<Value>);

pub fn api_error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({"error": message})))
}

/// Logs a database failure and hides its details from the client.
pub fn db_error(context: &str, e: impl std::fmt::Debug) -> ApiError {
    error!("{}: {:?}", context, e);
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
}

/// Registers `path` with and without a trailing slash, plus a preflight handler.
fn api_route(
    router: Router<DAL>,
    path: &str,
    allow: &'static str,
    method_router: MethodRouter<DAL>,
) -> Router<DAL> {
    let method_router = method_router.options(move |settings: Extension<Arc<Settings>>| {
        cors::preflight(allow, settings)
    });
    let bare = path.trim_end_matches('/');
    router
        .route(bare, method_router.clone())
        .route(&format!("{}/", bare), method_router)
}

pub fn routes(dal: DAL, version: u8) -> Router<DAL> {
    info!("Setting up API v{} routes", version);
    let mut router = Router::new();

    router = api_route(
        router,
        "/checks/",
        "GET, POST",
        get(checks::list_checks).post(checks::create_check),
    );
    router = api_route(
        router,
        "/checks/:code",
        "GET, POST, DELETE",
        get(checks::get_check)
            .post(checks::update_check)
            .delete(checks::delete_check),
    );
    router = api_route(router, "/checks/:code/pause", "POST", post(checks::pause_check));
    router = api_route(router, "/checks/:code/resume", "POST", post(checks::resume_check));
    router = api_route(router, "/checks/:code/pings/", "GET", get(checks::list_pings));
    router = api_route(router, "/checks/:code/archive/", "POST", post(archive::archive_check));
    router = api_route(router, "/checks/:code/restore/", "POST", post(archive::restore_check));
    router = api_route(
        router,
        "/checks/:code/archive-history/",
        "GET",
        get(archive::archive_history),
    );
    router = api_route(router, "/checks/:code/clone/", "POST", post(clones::clone_check));
    router = api_route(router, "/checks/:code/clones/", "GET", get(clones::list_clones));
    router = api_route(
        router,
        "/checks/:code/maintenance/",
        "GET, POST",
        get(maintenance::list_windows).post(maintenance::create_window),
    );
    router = api_route(
        router,
        "/checks/:code/maintenance/:uuid",
        "DELETE",
        axum::routing::delete(maintenance::delete_window),
    );
    router = api_route(
        router,
        "/checks/:code/labels/",
        "GET, POST",
        get(labels::list_labels).post(labels::create_label),
    );
    router = api_route(
        router,
        "/checks/:code/labels/:uuid",
        "DELETE",
        axum::routing::delete(labels::delete_label),
    );
    router = api_route(router, "/activity/", "GET", get(activity::list_activity));

    router
        .layer(from_fn_with_state(dal, middleware::auth_middleware))
        .layer(Extension(ApiVersion(version)))
}

/// Builds the render context for the current request.
pub fn render_context(settings: &Settings, version: ApiVersion, auth: &AuthPayload) -> RenderContext {
    RenderContext {
        version: version.0,
        site_root: settings.site_root().to_string(),
        ping_endpoint: settings.ping_endpoint(),
        read_only: auth.read_only,
    }
}

/// Resolves `code` to a check of the authenticated project.
///
/// Malformed and unknown codes are 404, checks of other projects are 403.
pub fn load_check(dal: &DAL, auth: &AuthPayload, code: &str) -> Result<Check, ApiError> {
    let Ok(check_id) = Uuid::parse_str(code) else {
        return Err(api_error(StatusCode::NOT_FOUND, "not found"));
    };

    let check = dal
        .checks()
        .get(check_id)
        .map_err(|e| db_error("Failed to fetch check", e))?
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "not found"))?;

    if check.project_id != auth.project.id {
        warn!("Check {} requested by another project", check_id);
        return Err(api_error(StatusCode::FORBIDDEN, "wrong project"));
    }
    Ok(check)
}
