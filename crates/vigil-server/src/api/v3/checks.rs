/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Check endpoints: listing, CRUD, pause and resume, and the ping list.

use crate::api::v3::middleware::{AuthPayload, RequestPayload};
use crate::api::v3::serialize::{render_check, render_checks, CheckResponse};
use crate::api::v3::validation::{check_filter, pause_reason, CheckFields};
use crate::api::v3::{api_error, db_error, load_check, render_context, ApiError};
use crate::api::ApiVersion;
use crate::dal::{CheckOpError, DAL};
use axum::{
    extract::{Extension, Path, RawQuery, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use vigil_models::models::pings::PingEntry;
use vigil_utils::config::Settings;
use vigil_utils::logging::prelude::*;

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckList {
    pub checks: Vec<CheckResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PingList {
    pub pings: Vec<PingEntry>,
}

/// Maps a refused check operation to a response.
///
/// Capacity refusals use `capacity_status`: 403 when creating, 400 otherwise.
pub fn check_op_error(e: CheckOpError, capacity_status: StatusCode) -> ApiError {
    match e {
        CheckOpError::NoCapacity => api_error(capacity_status, "no checks available"),
        CheckOpError::AlreadyArchived | CheckOpError::NotArchived => {
            api_error(StatusCode::BAD_REQUEST, &e.to_string())
        }
        CheckOpError::NotPaused => api_error(StatusCode::CONFLICT, &e.to_string()),
        CheckOpError::Database(e) => db_error("Check operation failed", e),
    }
}

#[utoipa::path(
    get,
    path = "/api/v3/checks/",
    tag = "checks",
    params(
        ("tag" = Option<String>, Query, description = "Only checks having this tag; repeat to require several"),
        ("slug" = Option<String>, Query, description = "Only checks with this slug"),
        ("archived" = Option<String>, Query, description = "1 to list archived checks"),
    ),
    responses(
        (status = 200, description = "Checks of the project", body = CheckList),
        (status = 400, description = "Invalid query parameter"),
        (status = 401, description = "Missing or wrong api key"),
    ),
    security(("api_key" = []))
)]
pub async fn list_checks(
    State(dal): State<DAL>,
    Extension(auth): Extension<AuthPayload>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(version): Extension<ApiVersion>,
    RawQuery(query): RawQuery,
) -> Result<Json<CheckList>, ApiError> {
    let filter =
        check_filter(query.as_deref()).map_err(|msg| api_error(StatusCode::BAD_REQUEST, &msg))?;
    info!(
        "Listing checks of project {} (tags: {:?}, archived: {})",
        auth.project.id, filter.tags, filter.archived
    );

    let checks = dal
        .checks()
        .list_for_project(auth.project.id, &filter)
        .map_err(|e| db_error("Failed to list checks", e))?;
    let ctx = render_context(&settings, version, &auth);
    let checks = render_checks(&dal, &checks, &ctx).map_err(|e| db_error("Failed to render checks", e))?;
    Ok(Json(CheckList { checks }))
}

#[utoipa::path(
    post,
    path = "/api/v3/checks/",
    tag = "checks",
    responses(
        (status = 201, description = "Check created", body = CheckResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or wrong api key"),
        (status = 403, description = "The project has no checks available"),
    ),
    security(("api_key" = []))
)]
pub async fn create_check(
    State(dal): State<DAL>,
    Extension(auth): Extension<AuthPayload>,
    Extension(RequestPayload(payload)): Extension<RequestPayload>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(version): Extension<ApiVersion>,
) -> Result<(StatusCode, Json<CheckResponse>), ApiError> {
    auth.require_write()?;

    let new_check = CheckFields::from_payload(&payload)
        .and_then(|fields| fields.into_new_check(auth.project.id))
        .map_err(|msg| api_error(StatusCode::BAD_REQUEST, &msg))?;

    let check = dal
        .checks()
        .create(&new_check)
        .map_err(|e| check_op_error(e, StatusCode::FORBIDDEN))?;
    info!("Created check {} in project {}", check.id, auth.project.id);

    let ctx = render_context(&settings, version, &auth);
    let body = render_check(&dal, &check, &ctx).map_err(|e| db_error("Failed to render check", e))?;
    Ok((StatusCode::CREATED, Json(body)))
}

#[utoipa::path(
    get,
    path = "/api/v3/checks/{code}",
    tag = "checks",
    params(("code" = String, Path, description = "Check UUID")),
    responses(
        (status = 200, description = "The check", body = CheckResponse),
        (status = 401, description = "Missing or wrong api key"),
        (status = 403, description = "Check belongs to another project"),
        (status = 404, description = "Check not found"),
    ),
    security(("api_key" = []))
)]
pub async fn get_check(
    State(dal): State<DAL>,
    Extension(auth): Extension<AuthPayload>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(version): Extension<ApiVersion>,
    Path(code): Path<String>,
) -> Result<Json<CheckResponse>, ApiError> {
    let check = load_check(&dal, &auth, &code)?;
    let ctx = render_context(&settings, version, &auth);
    let body = render_check(&dal, &check, &ctx).map_err(|e| db_error("Failed to render check", e))?;
    Ok(Json(body))
}

#[utoipa::path(
    post,
    path = "/api/v3/checks/{code}",
    tag = "checks",
    params(("code" = String, Path, description = "Check UUID")),
    responses(
        (status = 200, description = "Check updated", body = CheckResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or wrong api key"),
        (status = 403, description = "Check belongs to another project"),
        (status = 404, description = "Check not found"),
    ),
    security(("api_key" = []))
)]
pub async fn update_check(
    State(dal): State<DAL>,
    Extension(auth): Extension<AuthPayload>,
    Extension(RequestPayload(payload)): Extension<RequestPayload>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(version): Extension<ApiVersion>,
    Path(code): Path<String>,
) -> Result<Json<CheckResponse>, ApiError> {
    auth.require_write()?;
    let check = load_check(&dal, &auth, &code)?;

    let changes = CheckFields::from_payload(&payload)
        .map_err(|msg| api_error(StatusCode::BAD_REQUEST, &msg))?
        .into_changeset();

    let check = dal
        .checks()
        .update(check.id, &changes)
        .map_err(|e| db_error("Failed to update check", e))?;
    info!("Updated check {}", check.id);

    let ctx = render_context(&settings, version, &auth);
    let body = render_check(&dal, &check, &ctx).map_err(|e| db_error("Failed to render check", e))?;
    Ok(Json(body))
}

#[utoipa::path(
    delete,
    path = "/api/v3/checks/{code}",
    tag = "checks",
    params(("code" = String, Path, description = "Check UUID")),
    responses(
        (status = 200, description = "The deleted check", body = CheckResponse),
        (status = 401, description = "Missing or wrong api key"),
        (status = 403, description = "Check belongs to another project"),
        (status = 404, description = "Check not found"),
    ),
    security(("api_key" = []))
)]
pub async fn delete_check(
    State(dal): State<DAL>,
    Extension(auth): Extension<AuthPayload>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(version): Extension<ApiVersion>,
    Path(code): Path<String>,
) -> Result<Json<CheckResponse>, ApiError> {
    auth.require_write()?;
    let check = load_check(&dal, &auth, &code)?;

    // rendered first: clone records and windows go away with the check
    let ctx = render_context(&settings, version, &auth);
    let body = render_check(&dal, &check, &ctx).map_err(|e| db_error("Failed to render check", e))?;

    dal.checks()
        .delete(check.id)
        .map_err(|e| db_error("Failed to delete check", e))?;
    info!("Deleted check {}", check.id);
    Ok(Json(body))
}

#[utoipa::path(
    post,
    path = "/api/v3/checks/{code}/pause",
    tag = "checks",
    params(("code" = String, Path, description = "Check UUID")),
    responses(
        (status = 200, description = "Check paused", body = CheckResponse),
        (status = 400, description = "Invalid reason"),
        (status = 401, description = "Missing or wrong api key"),
        (status = 403, description = "Check belongs to another project"),
        (status = 404, description = "Check not found"),
    ),
    security(("api_key" = []))
)]
pub async fn pause_check(
    State(dal): State<DAL>,
    Extension(auth): Extension<AuthPayload>,
    Extension(RequestPayload(payload)): Extension<RequestPayload>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(version): Extension<ApiVersion>,
    Path(code): Path<String>,
) -> Result<Json<CheckResponse>, ApiError> {
    auth.require_write()?;
    let check = load_check(&dal, &auth, &code)?;
    let reason = pause_reason(&payload).map_err(|msg| api_error(StatusCode::BAD_REQUEST, &msg))?;

    let check = dal
        .checks()
        .pause(check.id, &reason)
        .map_err(|e| db_error("Failed to pause check", e))?;
    info!("Paused check {}", check.id);

    let ctx = render_context(&settings, version, &auth);
    let body = render_check(&dal, &check, &ctx).map_err(|e| db_error("Failed to render check", e))?;
    Ok(Json(body))
}

#[utoipa::path(
    post,
    path = "/api/v3/checks/{code}/resume",
    tag = "checks",
    params(("code" = String, Path, description = "Check UUID")),
    responses(
        (status = 200, description = "Check resumed", body = CheckResponse),
        (status = 401, description = "Missing or wrong api key"),
        (status = 403, description = "Check belongs to another project"),
        (status = 404, description = "Check not found"),
        (status = 409, description = "Check is not paused"),
    ),
    security(("api_key" = []))
)]
pub async fn resume_check(
    State(dal): State<DAL>,
    Extension(auth): Extension<AuthPayload>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(version): Extension<ApiVersion>,
    Path(code): Path<String>,
) -> Result<Json<CheckResponse>, ApiError> {
    auth.require_write()?;
    let check = load_check(&dal, &auth, &code)?;

    let check = dal
        .checks()
        .resume(check.id)
        .map_err(|e| check_op_error(e, StatusCode::BAD_REQUEST))?;
    info!("Resumed check {}", check.id);

    let ctx = render_context(&settings, version, &auth);
    let body = render_check(&dal, &check, &ctx).map_err(|e| db_error("Failed to render check", e))?;
    Ok(Json(body))
}

#[utoipa::path(
    get,
    path = "/api/v3/checks/{code}/pings/",
    tag = "pings",
    params(("code" = String, Path, description = "Check UUID")),
    responses(
        (status = 200, description = "Recent pings, newest first", body = PingList),
        (status = 401, description = "Missing or wrong api key"),
        (status = 403, description = "Check belongs to another project"),
        (status = 404, description = "Check not found"),
    ),
    security(("api_key" = []))
)]
pub async fn list_pings(
    State(dal): State<DAL>,
    Extension(auth): Extension<AuthPayload>,
    Extension(settings): Extension<Arc<Settings>>,
    Path(code): Path<String>,
) -> Result<Json<PingList>, ApiError> {
    auth.require_write()?;
    let check = load_check(&dal, &auth, &code)?;

    let pings = dal
        .pings()
        .list_for_check(check.id, settings.pings.list_limit)
        .map_err(|e| db_error("Failed to list pings", e))?;
    Ok(Json(PingList {
        pings: pings
            .iter()
            .map(|(ping, label)| PingEntry::new(ping, label.clone()))
            .collect(),
    }))
}
