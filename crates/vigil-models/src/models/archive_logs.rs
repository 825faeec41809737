/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Archive Logs Module
//!
//! Every archive and restore of a check appends one row here. Rows are removed
//! together with their check.

use crate::timefmt;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const ACTION_ARCHIVED: &str = "archived";
pub const ACTION_RESTORED: &str = "restored";

pub const MAX_ACTOR_LENGTH: usize = 200;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::archive_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ArchiveLog {
    pub id: Uuid,
    pub check_id: Uuid,
    pub action: String,
    /// Who performed the action, rendered as `by`
    pub actor: String,
    /// Rendered as `at`
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::archive_logs)]
pub struct NewArchiveLog {
    pub check_id: Uuid,
    pub action: String,
    pub actor: String,
}

impl NewArchiveLog {
    /// Creates a new archive log entry.
    ///
    /// `action` must be `archived` or `restored`; `actor` is limited to 200 characters.
    pub fn new(check_id: Uuid, action: &str, actor: &str) -> Result<Self, String> {
        if check_id.is_nil() {
            return Err("Invalid check ID".to_string());
        }
        if action != ACTION_ARCHIVED && action != ACTION_RESTORED {
            return Err(format!("Invalid archive action: {}", action));
        }
        if actor.chars().count() > MAX_ACTOR_LENGTH {
            return Err("reason is too long".to_string());
        }
        Ok(NewArchiveLog {
            check_id,
            action: action.to_string(),
            actor: actor.to_string(),
        })
    }
}

/// JSON shape of an archive history entry.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ArchiveHistoryEntry {
    pub uuid: String,
    pub check: String,
    pub action: String,
    pub at: String,
    pub by: String,
}

impl From<&ArchiveLog> for ArchiveHistoryEntry {
    fn from(log: &ArchiveLog) -> Self {
        ArchiveHistoryEntry {
            uuid: log.id.to_string(),
            check: log.check_id.to_string(),
            action: log.action.clone(),
            at: timefmt::isoformat(&log.created_at),
            by: log.actor.clone(),
        }
    }
}
