/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Clone endpoints.
//!
//! A check can be cloned into its own project, or into another project when
//! the caller also presents that project's read-write key.

use crate::api::v3::checks::check_op_error;
use crate::api::v3::middleware::{AuthPayload, RequestPayload};
use crate::api::v3::serialize::{render_check, CheckResponse};
use crate::api::v3::validation::{CloneRequest, DEFAULT_ACTOR};
use crate::api::v3::{api_error, db_error, load_check, render_context, ApiError};
use crate::api::ApiVersion;
use crate::dal::DAL;
use crate::utils::keys::hash_key;
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use vigil_models::models::clone_logs::CloneEntry;
use vigil_models::models::projects::Project;
use vigil_utils::config::Settings;
use vigil_utils::logging::prelude::*;

#[derive(Debug, Serialize, ToSchema)]
pub struct CloneList {
    pub clones: Vec<CloneEntry>,
}

/// Resolves the project a clone goes to, checking the caller may write to it.
fn target_project(dal: &DAL, auth: &AuthPayload, request: &CloneRequest) -> Result<Project, ApiError> {
    let target_id = match request.project {
        None => return Ok(auth.project.clone()),
        Some(id) if id == auth.project.id => {
            if request.target_api_key.is_some() {
                return Err(api_error(
                    StatusCode::BAD_REQUEST,
                    "target_api_key must not be given when cloning within the same project",
                ));
            }
            return Ok(auth.project.clone());
        }
        Some(id) => id,
    };

    let denied = || api_error(StatusCode::FORBIDDEN, "not authorized for target project");
    let target = dal
        .projects()
        .get(target_id)
        .map_err(|e| db_error("Failed to fetch target project", e))?
        .ok_or_else(denied)?;

    match request.target_api_key.as_deref() {
        Some(key) if hash_key(key) == target.api_key_hash => Ok(target),
        _ => {
            warn!("Clone into project {} without its api key", target_id);
            Err(denied())
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v3/checks/{code}/clone/",
    tag = "clones",
    params(("code" = String, Path, description = "Check UUID")),
    responses(
        (status = 201, description = "The new check", body = CheckResponse),
        (status = 400, description = "Invalid payload, or no checks available in the target project"),
        (status = 401, description = "Missing or wrong api key"),
        (status = 403, description = "Not authorized for the target project"),
        (status = 404, description = "Check not found"),
    ),
    security(("api_key" = []))
)]
pub async fn clone_check(
    State(dal): State<DAL>,
    Extension(auth): Extension<AuthPayload>,
    Extension(RequestPayload(payload)): Extension<RequestPayload>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(version): Extension<ApiVersion>,
    Path(code): Path<String>,
) -> Result<(StatusCode, Json<CheckResponse>), ApiError> {
    auth.require_write()?;
    let source = load_check(&dal, &auth, &code)?;
    let request =
        CloneRequest::from_payload(&payload).map_err(|msg| api_error(StatusCode::BAD_REQUEST, &msg))?;
    let target = target_project(&dal, &auth, &request)?;

    let cloned = dal
        .checks()
        .clone_to(&source, target.id, request.name, DEFAULT_ACTOR)
        .map_err(|e| check_op_error(e, StatusCode::BAD_REQUEST))?;
    info!(
        "Cloned check {} into project {} as {}",
        source.id, target.id, cloned.id
    );

    let ctx = render_context(&settings, version, &auth);
    let body = render_check(&dal, &cloned, &ctx).map_err(|e| db_error("Failed to render check", e))?;
    Ok((StatusCode::CREATED, Json(body)))
}

#[utoipa::path(
    get,
    path = "/api/v3/checks/{code}/clones/",
    tag = "clones",
    params(("code" = String, Path, description = "Check UUID")),
    responses(
        (status = 200, description = "Clones made from this check", body = CloneList),
        (status = 401, description = "Missing or wrong api key"),
        (status = 403, description = "Check belongs to another project"),
        (status = 404, description = "Check not found"),
    ),
    security(("api_key" = []))
)]
pub async fn list_clones(
    State(dal): State<DAL>,
    Extension(auth): Extension<AuthPayload>,
    Path(code): Path<String>,
) -> Result<Json<CloneList>, ApiError> {
    let check = load_check(&dal, &auth, &code)?;
    let logs = dal
        .clone_logs()
        .list_for_check(check.id)
        .map_err(|e| db_error("Failed to list clones", e))?;
    Ok(Json(CloneList {
        clones: logs.iter().map(CloneEntry::from).collect(),
    }))
}
