/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Request payload validation.
//!
//! Payloads arrive as a JSON object (see [`RequestPayload`](super::middleware::RequestPayload)).
//! Each parser checks types strictly: integers must be JSON integers, booleans
//! must be JSON booleans and `null` is never accepted in place of a value.
//! Keys the parser does not know about are ignored. Strings holding a NUL
//! character are rejected, since postgres text cannot store them.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use uuid::Uuid;
use vigil_models::models::checks::{
    CheckChangeset, NewCheck, KIND_CRON, KIND_SIMPLE, MAX_NAME_LENGTH, MAX_PAUSE_REASON_LENGTH,
    MAX_PERIOD, MAX_SCHEDULE_LENGTH, MAX_TAGS_LENGTH, MAX_TZ_LENGTH, MIN_PERIOD, PRIORITY_HIGH,
    PRIORITY_LOW,
};
use vigil_models::models::maintenance_windows::MAX_REASON_LENGTH;
use vigil_models::timefmt;

use crate::dal::CheckFilter;

/// Actor recorded for archive operations that do not name one.
pub const DEFAULT_ACTOR: &str = "api";

fn json_error(message: impl std::fmt::Display) -> String {
    format!("json validation error: {}", message)
}

fn nul_error(key: &str) -> String {
    format!("{} must not contain NUL characters", key)
}

fn optional_string(
    payload: &Map<String, Value>,
    key: &str,
    max_length: usize,
) -> Result<Option<String>, String> {
    match payload.get(key) {
        None => Ok(None),
        Some(Value::String(s)) if s.chars().count() > max_length => {
            Err(json_error(format!("{} is too long", key)))
        }
        Some(Value::String(s)) if s.contains('\0') => Err(json_error(nul_error(key))),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(json_error(format!("{} is not a string", key))),
    }
}

fn optional_integer(
    payload: &Map<String, Value>,
    key: &str,
    min: i64,
    max: i64,
) -> Result<Option<i64>, String> {
    match payload.get(key) {
        None => Ok(None),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(v) if v < min => Err(json_error(format!("{} is too small", key))),
            Some(v) if v > max => Err(json_error(format!("{} is too large", key))),
            Some(v) => Ok(Some(v)),
            None => Err(json_error(format!("{} is not an integer", key))),
        },
        Some(_) => Err(json_error(format!("{} is not a number", key))),
    }
}

fn optional_bool(payload: &Map<String, Value>, key: &str) -> Result<Option<bool>, String> {
    match payload.get(key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(json_error(format!("{} is not a boolean", key))),
    }
}

fn is_valid_slug(slug: &str) -> bool {
    slug.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

/// Check configuration fields present in a create or update payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckFields {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub tags: Option<String>,
    pub desc: Option<String>,
    pub timeout: Option<i32>,
    pub grace: Option<i32>,
    pub schedule: Option<String>,
    pub tz: Option<String>,
    pub methods: Option<String>,
    pub manual_resume: Option<bool>,
    pub priority: Option<i16>,
}

impl CheckFields {
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, String> {
        let slug = optional_string(payload, "slug", MAX_NAME_LENGTH)?;
        if let Some(ref slug) = slug {
            if !is_valid_slug(slug) {
                return Err(json_error("slug does not match pattern ^[a-z0-9-_]*$"));
            }
        }

        let methods = optional_string(payload, "methods", 30)?;
        if let Some(ref methods) = methods {
            if !methods.is_empty() && methods != "POST" {
                return Err(json_error("methods has unexpected value"));
            }
        }

        let period = |key: &str| -> Result<Option<i32>, String> {
            Ok(optional_integer(payload, key, i64::from(MIN_PERIOD), i64::from(MAX_PERIOD))?
                .map(|v| v as i32))
        };

        Ok(CheckFields {
            name: optional_string(payload, "name", MAX_NAME_LENGTH)?,
            slug,
            tags: optional_string(payload, "tags", MAX_TAGS_LENGTH)?.map(|t| t.trim().to_string()),
            desc: optional_string(payload, "desc", usize::MAX)?,
            timeout: period("timeout")?,
            grace: period("grace")?,
            schedule: optional_string(payload, "schedule", MAX_SCHEDULE_LENGTH)?,
            tz: optional_string(payload, "tz", MAX_TZ_LENGTH)?,
            methods,
            manual_resume: optional_bool(payload, "manual_resume")?,
            priority: optional_integer(
                payload,
                "priority",
                i64::from(PRIORITY_LOW),
                i64::from(PRIORITY_HIGH),
            )?
            .map(|v| v as i16),
        })
    }

    /// A new check for `project_id`. The check is a cron check when a schedule was given.
    pub fn into_new_check(self, project_id: Uuid) -> Result<NewCheck, String> {
        let mut check = NewCheck::new(project_id, self.name.unwrap_or_default())?;
        if let Some(slug) = self.slug {
            check.slug = slug;
        }
        if let Some(tags) = self.tags {
            check.tags = tags;
        }
        if let Some(desc) = self.desc {
            check.description = desc;
        }
        if let Some(timeout) = self.timeout {
            check.timeout = timeout;
        }
        if let Some(grace) = self.grace {
            check.grace = grace;
        }
        if let Some(schedule) = self.schedule {
            check.kind = KIND_CRON.to_string();
            check.schedule = schedule;
        }
        if let Some(tz) = self.tz {
            check.tz = tz;
        }
        if let Some(methods) = self.methods {
            check.methods = methods;
        }
        if let Some(manual_resume) = self.manual_resume {
            check.manual_resume = manual_resume;
        }
        if let Some(priority) = self.priority {
            check.priority = priority;
        }
        check.validate()?;
        Ok(check)
    }

    /// A partial update. Setting a schedule switches the check to cron, setting
    /// a timeout switches it to simple.
    pub fn into_changeset(self) -> CheckChangeset {
        let kind = if self.schedule.is_some() {
            Some(KIND_CRON.to_string())
        } else if self.timeout.is_some() {
            Some(KIND_SIMPLE.to_string())
        } else {
            None
        };

        CheckChangeset {
            name: self.name,
            slug: self.slug,
            tags: self.tags,
            description: self.desc,
            kind,
            timeout: self.timeout,
            grace: self.grace,
            schedule: self.schedule,
            tz: self.tz,
            methods: self.methods,
            manual_resume: self.manual_resume,
            priority: self.priority,
        }
    }
}

/// The optional pause reason. An absent reason is stored as an empty string.
pub fn pause_reason(payload: &Map<String, Value>) -> Result<String, String> {
    match payload.get("reason") {
        None => Ok(String::new()),
        Some(Value::String(s)) if s.chars().count() > MAX_PAUSE_REASON_LENGTH => {
            Err("reason is too long".to_string())
        }
        Some(Value::String(s)) if s.contains('\0') => Err(nul_error("reason")),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err("reason must be a string".to_string()),
    }
}

/// Who archived or restored a check: the payload's `reason`, or [`DEFAULT_ACTOR`].
pub fn archive_actor(payload: &Map<String, Value>) -> Result<String, String> {
    let reason = pause_reason(payload)?;
    if reason.trim().is_empty() {
        return Ok(DEFAULT_ACTOR.to_string());
    }
    Ok(reason)
}

/// Parsed clone payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CloneRequest {
    pub project: Option<Uuid>,
    pub name: Option<String>,
    pub target_api_key: Option<String>,
}

impl CloneRequest {
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, String> {
        let project = match payload.get("project") {
            None => None,
            Some(Value::String(s)) => {
                Some(Uuid::parse_str(s).map_err(|_| "invalid project uuid".to_string())?)
            }
            Some(_) => return Err("invalid project uuid".to_string()),
        };

        let name = match payload.get("name") {
            None => None,
            Some(Value::String(s)) if s.chars().count() > MAX_NAME_LENGTH => {
                return Err("name is too long".to_string())
            }
            Some(Value::String(s)) if s.contains('\0') => return Err(nul_error("name")),
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err("name must be a string".to_string()),
        };

        let target_api_key = match payload.get("target_api_key") {
            None => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err("target_api_key must be a string".to_string()),
        };

        Ok(CloneRequest {
            project,
            name,
            target_api_key,
        })
    }
}

/// Parsed maintenance window payload.
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceRequest {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub reason: String,
}

impl MaintenanceRequest {
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, String> {
        let start = match payload.get("start") {
            None | Some(Value::Null) => return Err("start is required".to_string()),
            Some(Value::String(s)) => {
                timefmt::parse_iso8601(s).ok_or_else(|| "invalid start".to_string())?
            }
            Some(_) => return Err("invalid start".to_string()),
        };

        let end = match payload.get("end") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => {
                Some(timefmt::parse_iso8601(s).ok_or_else(|| "invalid end".to_string())?)
            }
            Some(_) => return Err("invalid end".to_string()),
        };
        if let Some(end) = end {
            if end < start {
                return Err("end must not be before start".to_string());
            }
        }

        let reason = match payload.get("reason") {
            None => String::new(),
            Some(Value::String(s)) if s.chars().count() > MAX_REASON_LENGTH => {
                return Err("reason is too long".to_string())
            }
            Some(Value::String(s)) if s.contains('\0') => return Err(nul_error("reason")),
            Some(Value::String(s)) => s.clone(),
            Some(_) => return Err("reason must be a string".to_string()),
        };

        Ok(MaintenanceRequest { start, end, reason })
    }
}

/// The `name` of a label payload. Blank and length checks happen in the model.
pub fn label_name(payload: &Map<String, Value>) -> Result<String, String> {
    match payload.get("name") {
        None | Some(Value::Null) => Err("name is required".to_string()),
        Some(Value::String(s)) if s.contains('\0') => Err(nul_error("name")),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err("name must be a string".to_string()),
    }
}

/// Builds a check list filter from the raw query string.
///
/// `tag` may repeat; all given tags must match. Empty tags are ignored.
pub fn check_filter(raw_query: Option<&str>) -> Result<CheckFilter, String> {
    let mut filter = CheckFilter::default();
    let Some(raw) = raw_query else {
        return Ok(filter);
    };

    let mut tags = BTreeSet::new();
    for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
        if value.contains('\0') {
            return Err(nul_error(&key));
        }
        match key.as_ref() {
            "tag" if !value.trim().is_empty() => {
                tags.insert(value.trim().to_string());
            }
            "slug" => filter.slug = Some(value.into_owned()),
            "archived" => filter.archived = matches!(value.as_ref(), "1" | "true"),
            _ => {}
        }
    }
    filter.tags = tags;
    Ok(filter)
}
