/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::api::v3::activity::ActivityList;
use crate::api::v3::archive::ArchiveHistory;
use crate::api::v3::checks::{CheckList, PingList};
use crate::api::v3::clones::CloneList;
use crate::api::v3::labels::LabelList;
use crate::api::v3::maintenance::MaintenanceWindowList;
use crate::api::v3::serialize::CheckResponse;
use crate::api::v3::{activity, archive, checks, clones, labels, maintenance};
use axum::response::Json;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    OpenApi,
};
use vigil_models::models::{
    activity_logs::ActivityEntry, archive_logs::ArchiveHistoryEntry, clone_logs::CloneEntry,
    maintenance_windows::MaintenanceWindowEntry, ping_labels::PingLabelEntry, pings::PingEntry,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        checks::list_checks,
        checks::create_check,
        checks::get_check,
        checks::update_check,
        checks::delete_check,
        checks::pause_check,
        checks::resume_check,
        checks::list_pings,
        archive::archive_check,
        archive::restore_check,
        archive::archive_history,
        clones::clone_check,
        clones::list_clones,
        maintenance::list_windows,
        maintenance::create_window,
        maintenance::delete_window,
        labels::list_labels,
        labels::create_label,
        labels::delete_label,
        activity::list_activity,
    ),
    components(
        schemas(
            CheckResponse,
            CheckList,
            PingEntry,
            PingList,
            ArchiveHistoryEntry,
            ArchiveHistory,
            CloneEntry,
            CloneList,
            MaintenanceWindowEntry,
            MaintenanceWindowList,
            PingLabelEntry,
            LabelList,
            ActivityEntry,
            ActivityList,
        )
    ),
    tags(
        (name = "checks", description = "Check management API"),
        (name = "pings", description = "Recorded pings of a check"),
        (name = "archive", description = "Check archival API"),
        (name = "clones", description = "Check cloning API"),
        (name = "maintenance", description = "Maintenance windows API"),
        (name = "labels", description = "Ping labels API"),
        (name = "activity", description = "Project activity feed"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-Api-Key"))),
            );
        }
    }
}

pub async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
