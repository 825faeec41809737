/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Activity Logs Module
//!
//! An append-only record of what was done to a project's checks.
//!
//! ## Data Model
//!
//! - `id`: BIGSERIAL, insertion order breaks timestamp ties
//! - `project_id`: owning project, entries are removed with it
//! - `action`: one of the `ACTION_*` constants
//! - `check_code`: the check the action applied to; not a foreign key so the
//!   entry survives the check being deleted
//! - `details`: free text, at most 500 characters
//! - `created`: timestamp
//!
//! Entries are listed newest first.

use crate::timefmt;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const ACTION_CHECK_CREATED: &str = "check_created";
pub const ACTION_CHECK_UPDATED: &str = "check_updated";
pub const ACTION_CHECK_PAUSED: &str = "check_paused";
pub const ACTION_CHECK_RESUMED: &str = "check_resumed";
pub const ACTION_CHECK_DELETED: &str = "check_deleted";

pub const MAX_DETAILS_LENGTH: usize = 500;

/// Represents an activity log entry in the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::activity_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ActivityLog {
    pub id: i64,
    pub project_id: Uuid,
    pub action: String,
    pub check_code: Option<Uuid>,
    pub details: String,
    pub created: DateTime<Utc>,
}

/// Represents a new activity log entry to be inserted into the database.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::activity_logs)]
pub struct NewActivityLog {
    pub project_id: Uuid,
    pub action: String,
    pub check_code: Option<Uuid>,
    pub details: String,
}

impl NewActivityLog {
    /// Creates a new entry. `details` longer than 500 characters is truncated.
    pub fn new(
        project_id: Uuid,
        action: &str,
        check_code: Option<Uuid>,
        details: &str,
    ) -> Result<Self, String> {
        if project_id.is_nil() {
            return Err("Invalid project ID".to_string());
        }
        if action.trim().is_empty() {
            return Err("Action cannot be empty".to_string());
        }
        if action.len() > 50 {
            return Err("Action cannot exceed 50 characters".to_string());
        }

        Ok(NewActivityLog {
            project_id,
            action: action.to_string(),
            check_code,
            details: truncate_chars(details, MAX_DETAILS_LENGTH),
        })
    }
}

/// Cuts `value` down to at most `max` characters without splitting a character.
pub fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}

/// JSON shape of an activity entry: exactly these four keys.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActivityEntry {
    pub action: String,
    pub check_code: Option<String>,
    pub details: String,
    /// ISO 8601 timestamp
    pub created: String,
}

impl From<&ActivityLog> for ActivityEntry {
    fn from(log: &ActivityLog) -> Self {
        ActivityEntry {
            action: log.action.clone(),
            check_code: log.check_code.map(|code| code.to_string()),
            details: log.details.clone(),
            created: timefmt::isoformat(&log.created),
        }
    }
}
