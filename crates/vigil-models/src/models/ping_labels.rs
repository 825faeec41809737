/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Ping Labels Module
//!
//! Named labels a check's pings can be tagged with (`/ping/<code>?label=<name>`).
//!
//! ## Constraints
//!
//! - `name` is non-blank and at most 100 characters.
//! - `name` is unique per check (`ping_labels_check_name_unique`).
//! - Labels are removed with their check; pings referencing a removed label
//!   keep existing with no label.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const MAX_LABEL_NAME_LENGTH: usize = 100;

#[derive(
    Queryable,
    Selectable,
    Identifiable,
    Debug,
    Clone,
    Serialize,
    Deserialize,
    Eq,
    PartialEq,
    Hash,
)]
#[diesel(table_name = crate::schema::ping_labels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PingLabel {
    pub id: Uuid,
    pub check_id: Uuid,
    pub name: String,
    pub created: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::ping_labels)]
pub struct NewPingLabel {
    pub check_id: Uuid,
    pub name: String,
}

impl NewPingLabel {
    /// Creates a new `NewPingLabel`. Surrounding whitespace is trimmed from `name`.
    pub fn new(check_id: Uuid, name: &str) -> Result<Self, String> {
        if check_id.is_nil() {
            return Err("Invalid check ID".to_string());
        }
        let name = name.trim();
        if name.is_empty() {
            return Err("name is required".to_string());
        }
        if name.chars().count() > MAX_LABEL_NAME_LENGTH {
            return Err("name is too long".to_string());
        }
        Ok(NewPingLabel {
            check_id,
            name: name.to_string(),
        })
    }
}

/// JSON shape of a label.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PingLabelEntry {
    pub uuid: String,
    pub name: String,
}

impl From<&PingLabel> for PingLabelEntry {
    fn from(label: &PingLabel) -> Self {
        PingLabelEntry {
            uuid: label.id.to_string(),
            name: label.name.clone(),
        }
    }
}
