/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Clone Logs Module
//!
//! Links a cloned check to the check it was copied from. A row disappears when
//! either check is deleted.

use crate::timefmt;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::clone_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CloneLog {
    pub id: Uuid,
    pub source_check_id: Uuid,
    pub cloned_check_id: Uuid,
    pub target_project_id: Uuid,
    pub cloned_by: String,
    pub created: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::clone_logs)]
pub struct NewCloneLog {
    pub source_check_id: Uuid,
    pub cloned_check_id: Uuid,
    pub target_project_id: Uuid,
    pub cloned_by: String,
}

impl NewCloneLog {
    pub fn new(
        source_check_id: Uuid,
        cloned_check_id: Uuid,
        target_project_id: Uuid,
        cloned_by: &str,
    ) -> Result<Self, String> {
        if source_check_id.is_nil() || cloned_check_id.is_nil() {
            return Err("Invalid check ID".to_string());
        }
        if source_check_id == cloned_check_id {
            return Err("A check cannot be a clone of itself".to_string());
        }
        if target_project_id.is_nil() {
            return Err("Invalid project ID".to_string());
        }
        if cloned_by.chars().count() > 200 {
            return Err("cloned_by cannot exceed 200 characters".to_string());
        }
        Ok(NewCloneLog {
            source_check_id,
            cloned_check_id,
            target_project_id,
            cloned_by: cloned_by.to_string(),
        })
    }
}

/// JSON shape of a clone record.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CloneEntry {
    pub uuid: String,
    pub source_check: String,
    pub cloned_check: String,
    pub target_project: String,
    pub cloned_by: String,
    pub created: String,
}

impl From<&CloneLog> for CloneEntry {
    fn from(log: &CloneLog) -> Self {
        CloneEntry {
            uuid: log.id.to_string(),
            source_check: log.source_check_id.to_string(),
            cloned_check: log.cloned_check_id.to_string(),
            target_project: log.target_project_id.to_string(),
            cloned_by: log.cloned_by.clone(),
            created: timefmt::isoformat(&log.created),
        }
    }
}
