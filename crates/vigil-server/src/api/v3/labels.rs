/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Ping label endpoints.

use crate::api::v3::middleware::{AuthPayload, RequestPayload};
use crate::api::v3::validation::label_name;
use crate::api::v3::{api_error, db_error, load_check, ApiError};
use crate::dal::{is_unique_violation, DAL};
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use vigil_models::models::ping_labels::{NewPingLabel, PingLabelEntry};
use vigil_utils::logging::prelude::*;

#[derive(Debug, Serialize, ToSchema)]
pub struct LabelList {
    pub labels: Vec<PingLabelEntry>,
}

#[utoipa::path(
    get,
    path = "/api/v3/checks/{code}/labels/",
    tag = "labels",
    params(("code" = String, Path, description = "Check UUID")),
    responses(
        (status = 200, description = "Labels ordered by name", body = LabelList),
        (status = 401, description = "Missing or wrong api key"),
        (status = 403, description = "Check belongs to another project"),
        (status = 404, description = "Check not found"),
    ),
    security(("api_key" = []))
)]
pub async fn list_labels(
    State(dal): State<DAL>,
    Extension(auth): Extension<AuthPayload>,
    Path(code): Path<String>,
) -> Result<Json<LabelList>, ApiError> {
    let check = load_check(&dal, &auth, &code)?;
    let labels = dal
        .ping_labels()
        .list_for_check(check.id)
        .map_err(|e| db_error("Failed to list labels", e))?;
    Ok(Json(LabelList {
        labels: labels.iter().map(PingLabelEntry::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v3/checks/{code}/labels/",
    tag = "labels",
    params(("code" = String, Path, description = "Check UUID")),
    responses(
        (status = 201, description = "Label created", body = PingLabelEntry),
        (status = 400, description = "Missing or invalid name"),
        (status = 401, description = "Missing or wrong api key"),
        (status = 403, description = "Check belongs to another project"),
        (status = 404, description = "Check not found"),
        (status = 409, description = "Label already exists"),
    ),
    security(("api_key" = []))
)]
pub async fn create_label(
    State(dal): State<DAL>,
    Extension(auth): Extension<AuthPayload>,
    Extension(RequestPayload(payload)): Extension<RequestPayload>,
    Path(code): Path<String>,
) -> Result<(StatusCode, Json<PingLabelEntry>), ApiError> {
    auth.require_write()?;
    let check = load_check(&dal, &auth, &code)?;

    let new_label = label_name(&payload)
        .and_then(|name| NewPingLabel::new(check.id, &name))
        .map_err(|msg| api_error(StatusCode::BAD_REQUEST, &msg))?;

    match dal.ping_labels().create(&new_label) {
        Ok(label) => {
            info!("Created label {} for check {}", label.name, check.id);
            Ok((StatusCode::CREATED, Json(PingLabelEntry::from(&label))))
        }
        Err(e) if is_unique_violation(&e) => {
            warn!("Duplicate label {} for check {}", new_label.name, check.id);
            Err(api_error(StatusCode::CONFLICT, "label already exists"))
        }
        Err(e) => Err(db_error("Failed to create label", e)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v3/checks/{code}/labels/{uuid}",
    tag = "labels",
    params(
        ("code" = String, Path, description = "Check UUID"),
        ("uuid" = String, Path, description = "Label UUID"),
    ),
    responses(
        (status = 204, description = "Label deleted"),
        (status = 401, description = "Missing or wrong api key"),
        (status = 403, description = "Check belongs to another project"),
        (status = 404, description = "Check or label not found"),
    ),
    security(("api_key" = []))
)]
pub async fn delete_label(
    State(dal): State<DAL>,
    Extension(auth): Extension<AuthPayload>,
    Path((code, label)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    auth.require_write()?;
    let check = load_check(&dal, &auth, &code)?;
    let not_found = || api_error(StatusCode::NOT_FOUND, "not found");
    let label_id = Uuid::parse_str(&label).map_err(|_| not_found())?;

    let deleted = dal
        .ping_labels()
        .delete(label_id, check.id)
        .map_err(|e| db_error("Failed to delete label", e))?;
    if deleted == 0 {
        return Err(not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}
