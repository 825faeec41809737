/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Maintenance window endpoints.

use crate::api::v3::middleware::{AuthPayload, RequestPayload};
use crate::api::v3::validation::MaintenanceRequest;
use crate::api::v3::{api_error, db_error, load_check, ApiError};
use crate::dal::DAL;
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use vigil_models::models::maintenance_windows::{MaintenanceWindowEntry, NewMaintenanceWindow};
use vigil_utils::logging::prelude::*;

#[derive(Debug, Serialize, ToSchema)]
pub struct MaintenanceWindowList {
    pub maintenance_windows: Vec<MaintenanceWindowEntry>,
}

#[utoipa::path(
    get,
    path = "/api/v3/checks/{code}/maintenance/",
    tag = "maintenance",
    params(("code" = String, Path, description = "Check UUID")),
    responses(
        (status = 200, description = "Maintenance windows, latest start first", body = MaintenanceWindowList),
        (status = 401, description = "Missing or wrong api key"),
        (status = 403, description = "Check belongs to another project"),
        (status = 404, description = "Check not found"),
    ),
    security(("api_key" = []))
)]
pub async fn list_windows(
    State(dal): State<DAL>,
    Extension(auth): Extension<AuthPayload>,
    Path(code): Path<String>,
) -> Result<Json<MaintenanceWindowList>, ApiError> {
    let check = load_check(&dal, &auth, &code)?;
    let windows = dal
        .maintenance_windows()
        .list_for_check(check.id)
        .map_err(|e| db_error("Failed to list maintenance windows", e))?;
    Ok(Json(MaintenanceWindowList {
        maintenance_windows: windows.iter().map(MaintenanceWindowEntry::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v3/checks/{code}/maintenance/",
    tag = "maintenance",
    params(("code" = String, Path, description = "Check UUID")),
    responses(
        (status = 201, description = "Window created", body = MaintenanceWindowEntry),
        (status = 400, description = "Invalid start, end or reason"),
        (status = 401, description = "Missing or wrong api key"),
        (status = 403, description = "Check belongs to another project"),
        (status = 404, description = "Check not found"),
    ),
    security(("api_key" = []))
)]
pub async fn create_window(
    State(dal): State<DAL>,
    Extension(auth): Extension<AuthPayload>,
    Extension(RequestPayload(payload)): Extension<RequestPayload>,
    Path(code): Path<String>,
) -> Result<(StatusCode, Json<MaintenanceWindowEntry>), ApiError> {
    auth.require_write()?;
    let check = load_check(&dal, &auth, &code)?;

    let bad_request = |msg: String| api_error(StatusCode::BAD_REQUEST, &msg);
    let request = MaintenanceRequest::from_payload(&payload).map_err(bad_request)?;
    let new_window = NewMaintenanceWindow::new(check.id, request.start, request.end, request.reason)
        .map_err(bad_request)?;

    let window = dal
        .maintenance_windows()
        .create(&new_window)
        .map_err(|e| db_error("Failed to create maintenance window", e))?;
    info!("Created maintenance window {} for check {}", window.id, check.id);
    Ok((StatusCode::CREATED, Json(MaintenanceWindowEntry::from(&window))))
}

#[utoipa::path(
    delete,
    path = "/api/v3/checks/{code}/maintenance/{uuid}",
    tag = "maintenance",
    params(
        ("code" = String, Path, description = "Check UUID"),
        ("uuid" = String, Path, description = "Window UUID"),
    ),
    responses(
        (status = 204, description = "Window deleted"),
        (status = 401, description = "Missing or wrong api key"),
        (status = 403, description = "Check belongs to another project"),
        (status = 404, description = "Check or window not found"),
    ),
    security(("api_key" = []))
)]
pub async fn delete_window(
    State(dal): State<DAL>,
    Extension(auth): Extension<AuthPayload>,
    Path((code, window)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    auth.require_write()?;
    let check = load_check(&dal, &auth, &code)?;
    let not_found = || api_error(StatusCode::NOT_FOUND, "not found");
    let window_id = Uuid::parse_str(&window).map_err(|_| not_found())?;

    let deleted = dal
        .maintenance_windows()
        .delete(window_id, check.id)
        .map_err(|e| db_error("Failed to delete maintenance window", e))?;
    if deleted == 0 {
        return Err(not_found());
    }
    info!("Deleted maintenance window {} of check {}", window_id, check.id);
    Ok(StatusCode::NO_CONTENT)
}
