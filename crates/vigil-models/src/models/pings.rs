/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Pings Module
//!
//! One row per heartbeat a check received.
//!
//! ## Data Model
//!
//! - `id`: BIGSERIAL
//! - `check_id`: owning check
//! - `n`: the check's ping counter after this ping
//! - `kind`: `success`, `start` or `fail`
//! - `scheme`, `method`, `remote_addr`, `ua`: request metadata
//! - `body`: request body, truncated to the configured limit
//! - `label_id`: optional [`PingLabel`](super::ping_labels::PingLabel); becomes
//!   NULL when the label is deleted

use crate::timefmt;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const KIND_SUCCESS: &str = "success";
pub const KIND_START: &str = "start";
pub const KIND_FAIL: &str = "fail";

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::pings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Ping {
    pub id: i64,
    pub check_id: Uuid,
    pub n: i32,
    pub created: DateTime<Utc>,
    pub kind: String,
    pub scheme: String,
    pub method: String,
    pub remote_addr: Option<String>,
    pub ua: Option<String>,
    pub body: Option<String>,
    pub label_id: Option<Uuid>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::pings)]
pub struct NewPing {
    pub check_id: Uuid,
    pub n: i32,
    pub kind: String,
    pub scheme: String,
    pub method: String,
    pub remote_addr: Option<String>,
    pub ua: Option<String>,
    pub body: Option<String>,
    pub label_id: Option<Uuid>,
}

/// Request metadata recorded with a ping.
#[derive(Debug, Clone, Default)]
pub struct PingRequest {
    pub kind: String,
    pub scheme: String,
    pub method: String,
    pub remote_addr: Option<String>,
    pub ua: Option<String>,
    pub body: Option<String>,
}

impl PingRequest {
    pub fn new(kind: &str, scheme: &str, method: &str) -> Result<Self, String> {
        if ![KIND_SUCCESS, KIND_START, KIND_FAIL].contains(&kind) {
            return Err(format!("Invalid ping kind: {}", kind));
        }
        Ok(PingRequest {
            kind: kind.to_string(),
            scheme: scheme.chars().take(10).collect(),
            method: method.chars().take(10).collect(),
            ..Default::default()
        })
    }

    /// Turns the request into an insertable row for the `n`th ping of `check_id`.
    pub fn into_new_ping(self, check_id: Uuid, n: i32, label_id: Option<Uuid>) -> NewPing {
        NewPing {
            check_id,
            n,
            kind: self.kind,
            scheme: self.scheme,
            method: self.method,
            remote_addr: self.remote_addr.map(|v| v.chars().take(64).collect()),
            ua: self.ua.map(|v| v.chars().take(200).collect()),
            body: self.body,
            label_id,
        }
    }
}

/// JSON shape of a ping in the ping list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PingEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
    pub n: i32,
    pub scheme: String,
    pub remote_addr: Option<String>,
    pub method: String,
    pub ua: Option<String>,
    /// Name of the attached label, if any
    pub label: Option<String>,
}

impl PingEntry {
    pub fn new(ping: &Ping, label: Option<String>) -> Self {
        PingEntry {
            kind: ping.kind.clone(),
            date: timefmt::isoformat(&ping.created),
            n: ping.n,
            scheme: ping.scheme.clone(),
            remote_addr: ping.remote_addr.clone(),
            method: ping.method.clone(),
            ua: ping.ua.clone(),
            label,
        }
    }
}
