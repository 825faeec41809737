/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::api::v3::middleware::AuthPayload;
use crate::api::v3::{db_error, ApiError};
use crate::dal::DAL;
use axum::{
    extract::{Extension, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use vigil_models::models::activity_logs::ActivityEntry;
use vigil_utils::config::Settings;

#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityList {
    pub activity: Vec<ActivityEntry>,
}

/// Recent activity of the authenticated project, newest first.
#[utoipa::path(
    get,
    path = "/api/v3/activity/",
    tag = "activity",
    responses(
        (status = 200, description = "Recent activity, newest first", body = ActivityList),
        (status = 401, description = "Missing or wrong api key"),
    ),
    security(("api_key" = []))
)]
pub async fn list_activity(
    State(dal): State<DAL>,
    Extension(auth): Extension<AuthPayload>,
    Extension(settings): Extension<Arc<Settings>>,
) -> Result<Json<ActivityList>, ApiError> {
    let entries = dal
        .activity_logs()
        .list_for_project(auth.project.id, settings.activity.list_limit)
        .map_err(|e| db_error("Failed to list activity", e))?;
    Ok(Json(ActivityList {
        activity: entries.iter().map(ActivityEntry::from).collect(),
    }))
}
