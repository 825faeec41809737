/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Checks Module
//!
//! A check is a monitored heartbeat target owned by a project.
//!
//! ## Core Data Model
//!
//! Configuration:
//! - `name`, `slug`: VARCHAR(100)
//! - `tags`: VARCHAR(500), space separated tokens
//! - `description`: free text, rendered as `desc`
//! - `kind`: `simple` (period + grace) or `cron` (schedule + tz + grace)
//! - `timeout`, `grace`: seconds, 60 to 31536000
//! - `methods`: `""` accepts any method, `"POST"` ignores GET pings
//! - `manual_resume`: a paused check stays paused when pinged
//! - `priority`: 0 (low), 1 (normal), 2 (high)
//!
//! Runtime state:
//! - `status`: `new`, `up`, `down` or `paused`
//! - `n_pings`, `last_ping`, `last_start`, `alert_after`
//! - `pause_reason`: VARCHAR(200), set on pause and cleared on resume
//! - `archived_at`: set while the check is archived; archived checks reject pings
//!
//! `NewCheck` carries only the configuration; the runtime state starts from the
//! column defaults.

use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

pub const KIND_SIMPLE: &str = "simple";
pub const KIND_CRON: &str = "cron";

pub const STATUS_NEW: &str = "new";
pub const STATUS_UP: &str = "up";
pub const STATUS_DOWN: &str = "down";
pub const STATUS_PAUSED: &str = "paused";

pub const PRIORITY_LOW: i16 = 0;
pub const PRIORITY_NORMAL: i16 = 1;
pub const PRIORITY_HIGH: i16 = 2;

pub const DEFAULT_TIMEOUT: i32 = 86400;
pub const DEFAULT_GRACE: i32 = 3600;
pub const MIN_PERIOD: i32 = 60;
pub const MAX_PERIOD: i32 = 31_536_000;

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_TAGS_LENGTH: usize = 500;
pub const MAX_SCHEDULE_LENGTH: usize = 100;
pub const MAX_TZ_LENGTH: usize = 36;
pub const MAX_PAUSE_REASON_LENGTH: usize = 200;

/// Represents a check in the database.
#[derive(Queryable, Selectable, Identifiable, AsChangeset, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::checks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Check {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub slug: String,
    pub tags: String,
    pub description: String,
    pub kind: String,
    pub timeout: i32,
    pub grace: i32,
    pub schedule: String,
    pub tz: String,
    pub methods: String,
    pub manual_resume: bool,
    pub status: String,
    pub n_pings: i32,
    pub last_ping: Option<DateTime<Utc>>,
    pub last_start: Option<DateTime<Utc>>,
    pub alert_after: Option<DateTime<Utc>>,
    pub created: DateTime<Utc>,
    pub priority: i16,
    pub pause_reason: String,
    pub archived_at: Option<DateTime<Utc>>,
}

impl Check {
    /// Splits `tags` into tokens, ignoring repeated whitespace.
    pub fn tags_list(&self) -> Vec<&str> {
        tags_list(&self.tags)
    }

    /// True when every requested tag is one of this check's tokens.
    pub fn matches_tag_set(&self, wanted: &BTreeSet<String>) -> bool {
        matches_tag_set(&self.tags, wanted)
    }

    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.status == STATUS_PAUSED
    }

    /// Expected time of the next ping for simple checks that are running.
    pub fn next_ping(&self) -> Option<DateTime<Utc>> {
        if self.kind != KIND_SIMPLE || self.is_paused() {
            return None;
        }
        self.last_ping
            .map(|last| last + Duration::seconds(i64::from(self.timeout)))
    }

    /// Builds an insertable copy of this check's configuration for `project_id`.
    ///
    /// Runtime state (status, ping counters, archive and pause state) is not copied.
    pub fn clone_config(&self, project_id: Uuid, name: Option<String>) -> NewCheck {
        NewCheck {
            project_id,
            name: name.unwrap_or_else(|| self.name.clone()),
            slug: self.slug.clone(),
            tags: self.tags.clone(),
            description: self.description.clone(),
            kind: self.kind.clone(),
            timeout: self.timeout,
            grace: self.grace,
            schedule: self.schedule.clone(),
            tz: self.tz.clone(),
            methods: self.methods.clone(),
            manual_resume: self.manual_resume,
            priority: self.priority,
        }
    }
}

/// Splits a space separated tag string into its non-empty tokens.
pub fn tags_list(tags: &str) -> Vec<&str> {
    tags.split_whitespace().collect()
}

/// Exact token AND-matching. An empty `wanted` set matches every tag string.
pub fn matches_tag_set(tags: &str, wanted: &BTreeSet<String>) -> bool {
    let have: BTreeSet<&str> = tags.split_whitespace().collect();
    wanted.iter().all(|tag| have.contains(tag.as_str()))
}

/// Represents a new check to be inserted into the database.
#[derive(Insertable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::checks)]
pub struct NewCheck {
    pub project_id: Uuid,
    pub name: String,
    pub slug: String,
    pub tags: String,
    pub description: String,
    pub kind: String,
    pub timeout: i32,
    pub grace: i32,
    pub schedule: String,
    pub tz: String,
    pub methods: String,
    pub manual_resume: bool,
    pub priority: i16,
}

impl NewCheck {
    /// Creates a `NewCheck` with default configuration.
    ///
    /// The caller fills in whatever configuration it received and calls
    /// [`NewCheck::validate`] before inserting.
    pub fn new(project_id: Uuid, name: String) -> Result<Self, String> {
        if project_id.is_nil() {
            return Err("Invalid project ID".to_string());
        }
        let check = NewCheck {
            project_id,
            name,
            slug: String::new(),
            tags: String::new(),
            description: String::new(),
            kind: KIND_SIMPLE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            grace: DEFAULT_GRACE,
            schedule: "* * * * *".to_string(),
            tz: "UTC".to_string(),
            methods: String::new(),
            manual_resume: false,
            priority: PRIORITY_NORMAL,
        };
        check.validate()?;
        Ok(check)
    }

    /// Checks the column limits and value ranges.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.chars().count() > MAX_NAME_LENGTH {
            return Err("name is too long".to_string());
        }
        if self.slug.chars().count() > MAX_NAME_LENGTH {
            return Err("slug is too long".to_string());
        }
        if self.tags.chars().count() > MAX_TAGS_LENGTH {
            return Err("tags is too long".to_string());
        }
        if self.kind != KIND_SIMPLE && self.kind != KIND_CRON {
            return Err("invalid kind".to_string());
        }
        if !(MIN_PERIOD..=MAX_PERIOD).contains(&self.timeout) {
            return Err("timeout is out of range".to_string());
        }
        if !(MIN_PERIOD..=MAX_PERIOD).contains(&self.grace) {
            return Err("grace is out of range".to_string());
        }
        if self.schedule.chars().count() > MAX_SCHEDULE_LENGTH {
            return Err("schedule is too long".to_string());
        }
        if self.tz.chars().count() > MAX_TZ_LENGTH {
            return Err("tz is too long".to_string());
        }
        if !self.methods.is_empty() && self.methods != "POST" {
            return Err("methods must be \"\" or \"POST\"".to_string());
        }
        if !(PRIORITY_LOW..=PRIORITY_HIGH).contains(&self.priority) {
            return Err("priority must be 0, 1 or 2".to_string());
        }
        Ok(())
    }
}

/// A partial update of a check's configuration. `None` leaves a column untouched.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::checks)]
pub struct CheckChangeset {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub tags: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub timeout: Option<i32>,
    pub grace: Option<i32>,
    pub schedule: Option<String>,
    pub tz: Option<String>,
    pub methods: Option<String>,
    pub manual_resume: Option<bool>,
    pub priority: Option<i16>,
}

impl CheckChangeset {
    /// True when no column would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.slug.is_none()
            && self.tags.is_none()
            && self.description.is_none()
            && self.kind.is_none()
            && self.timeout.is_none()
            && self.grace.is_none()
            && self.schedule.is_none()
            && self.tz.is_none()
            && self.methods.is_none()
            && self.manual_resume.is_none()
            && self.priority.is_none()
    }
}
