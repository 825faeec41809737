/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Archive, restore and archive history endpoints.

use crate::api::v3::checks::check_op_error;
use crate::api::v3::middleware::{AuthPayload, RequestPayload};
use crate::api::v3::serialize::{render_check, CheckResponse};
use crate::api::v3::validation::archive_actor;
use crate::api::v3::{api_error, db_error, load_check, render_context, ApiError};
use crate::api::ApiVersion;
use crate::dal::DAL;
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use vigil_models::models::archive_logs::ArchiveHistoryEntry;
use vigil_utils::config::Settings;
use vigil_utils::logging::prelude::*;

#[derive(Debug, Serialize, ToSchema)]
pub struct ArchiveHistory {
    pub archive_history: Vec<ArchiveHistoryEntry>,
}

#[utoipa::path(
    post,
    path = "/api/v3/checks/{code}/archive/",
    tag = "archive",
    params(("code" = String, Path, description = "Check UUID")),
    responses(
        (status = 200, description = "Check archived", body = CheckResponse),
        (status = 400, description = "Already archived or invalid reason"),
        (status = 401, description = "Missing or wrong api key"),
        (status = 403, description = "Check belongs to another project"),
        (status = 404, description = "Check not found"),
    ),
    security(("api_key" = []))
)]
pub async fn archive_check(
    State(dal): State<DAL>,
    Extension(auth): Extension<AuthPayload>,
    Extension(RequestPayload(payload)): Extension<RequestPayload>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(version): Extension<ApiVersion>,
    Path(code): Path<String>,
) -> Result<Json<CheckResponse>, ApiError> {
    auth.require_write()?;
    let check = load_check(&dal, &auth, &code)?;
    let actor = archive_actor(&payload).map_err(|msg| api_error(StatusCode::BAD_REQUEST, &msg))?;

    let check = dal
        .checks()
        .archive(check.id, &actor)
        .map_err(|e| check_op_error(e, StatusCode::BAD_REQUEST))?;
    info!("Archived check {} by {}", check.id, actor);

    let ctx = render_context(&settings, version, &auth);
    let body = render_check(&dal, &check, &ctx).map_err(|e| db_error("Failed to render check", e))?;
    Ok(Json(body))
}

#[utoipa::path(
    post,
    path = "/api/v3/checks/{code}/restore/",
    tag = "archive",
    params(("code" = String, Path, description = "Check UUID")),
    responses(
        (status = 200, description = "Check restored", body = CheckResponse),
        (status = 400, description = "Not archived, or no checks available"),
        (status = 401, description = "Missing or wrong api key"),
        (status = 403, description = "Check belongs to another project"),
        (status = 404, description = "Check not found"),
    ),
    security(("api_key" = []))
)]
pub async fn restore_check(
    State(dal): State<DAL>,
    Extension(auth): Extension<AuthPayload>,
    Extension(RequestPayload(payload)): Extension<RequestPayload>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(version): Extension<ApiVersion>,
    Path(code): Path<String>,
) -> Result<Json<CheckResponse>, ApiError> {
    auth.require_write()?;
    let check = load_check(&dal, &auth, &code)?;
    let actor = archive_actor(&payload).map_err(|msg| api_error(StatusCode::BAD_REQUEST, &msg))?;

    let check = dal
        .checks()
        .restore(check.id, &actor)
        .map_err(|e| check_op_error(e, StatusCode::BAD_REQUEST))?;
    info!("Restored check {} by {}", check.id, actor);

    let ctx = render_context(&settings, version, &auth);
    let body = render_check(&dal, &check, &ctx).map_err(|e| db_error("Failed to render check", e))?;
    Ok(Json(body))
}

#[utoipa::path(
    get,
    path = "/api/v3/checks/{code}/archive-history/",
    tag = "archive",
    params(("code" = String, Path, description = "Check UUID")),
    responses(
        (status = 200, description = "Archive history, newest first", body = ArchiveHistory),
        (status = 401, description = "Missing or wrong api key"),
        (status = 403, description = "Check belongs to another project"),
        (status = 404, description = "Check not found"),
    ),
    security(("api_key" = []))
)]
pub async fn archive_history(
    State(dal): State<DAL>,
    Extension(auth): Extension<AuthPayload>,
    Path(code): Path<String>,
) -> Result<Json<ArchiveHistory>, ApiError> {
    let check = load_check(&dal, &auth, &code)?;
    let logs = dal
        .archive_logs()
        .list_for_check(check.id)
        .map_err(|e| db_error("Failed to list archive history", e))?;
    Ok(Json(ArchiveHistory {
        archive_history: logs.iter().map(ArchiveHistoryEntry::from).collect(),
    }))
}
