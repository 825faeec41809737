/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Maintenance Windows Module
//!
//! A planned period during which a check is expected to be quiet.
//!
//! ## Constraints
//!
//! - `end_time` is optional (open-ended window) but never before `start_time`.
//!   The database enforces the same rule with a CHECK constraint.
//! - `reason` is at most 200 characters.
//! - Windows are removed together with their check.

use crate::timefmt;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const MAX_REASON_LENGTH: usize = 200;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::maintenance_windows)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MaintenanceWindow {
    pub id: Uuid,
    pub check_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub reason: String,
    pub created: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::maintenance_windows)]
pub struct NewMaintenanceWindow {
    pub check_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub reason: String,
}

impl NewMaintenanceWindow {
    pub fn new(
        check_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: Option<DateTime<Utc>>,
        reason: String,
    ) -> Result<Self, String> {
        if check_id.is_nil() {
            return Err("Invalid check ID".to_string());
        }
        if let Some(end) = end_time {
            if end < start_time {
                return Err("end must not be before start".to_string());
            }
        }
        if reason.chars().count() > MAX_REASON_LENGTH {
            return Err("reason is too long".to_string());
        }
        Ok(NewMaintenanceWindow {
            check_id,
            start_time,
            end_time,
            reason,
        })
    }
}

/// JSON shape of a maintenance window.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MaintenanceWindowEntry {
    pub uuid: String,
    pub start: String,
    pub end: Option<String>,
    pub reason: String,
}

impl From<&MaintenanceWindow> for MaintenanceWindowEntry {
    fn from(window: &MaintenanceWindow) -> Self {
        MaintenanceWindowEntry {
            uuid: window.id.to_string(),
            start: timefmt::isoformat(&window.start_time),
            end: timefmt::isoformat_opt(window.end_time.as_ref()),
            reason: window.reason.clone(),
        }
    }
}
