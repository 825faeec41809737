/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! JSON representation of checks.
//!
//! The shape depends on the API version of the request and on the kind of key
//! used: read-write keys see the check's UUID and management URLs, read-only
//! keys see an opaque `unique_key` instead.

use crate::dal::DAL;
use crate::utils::keys::hash_key;
use diesel::QueryResult;
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;
use vigil_models::models::checks::{Check, KIND_SIMPLE};
use vigil_models::timefmt;

/// How to render checks for one request.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub version: u8,
    pub site_root: String,
    pub ping_endpoint: String,
    pub read_only: bool,
}

impl RenderContext {
    fn update_url(&self, code: Uuid) -> String {
        format!("{}/api/v{}/checks/{}", self.site_root, self.version, code)
    }
}

/// A check as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckResponse {
    pub name: String,
    pub slug: String,
    pub tags: String,
    pub desc: String,
    pub grace: i32,
    pub n_pings: i32,
    pub status: String,
    /// Whether a start signal is pending. Only in v2 and later.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<bool>,
    pub last_ping: Option<String>,
    pub next_ping: Option<String>,
    pub manual_resume: bool,
    pub methods: String,
    pub priority: i16,
    pub pause_reason: String,
    pub archived_at: Option<String>,
    /// UUID of the check this one was cloned from
    pub cloned_from: Option<String>,
    pub maintenance_windows_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tz: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ping_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_key: Option<String>,
}

impl CheckResponse {
    pub fn new(
        check: &Check,
        ctx: &RenderContext,
        cloned_from: Option<Uuid>,
        maintenance_windows_count: i64,
    ) -> Self {
        let simple = check.kind == KIND_SIMPLE;
        let mut response = CheckResponse {
            name: check.name.clone(),
            slug: check.slug.clone(),
            tags: check.tags.clone(),
            desc: check.description.clone(),
            grace: check.grace,
            n_pings: check.n_pings,
            status: check.status.clone(),
            started: (ctx.version >= 2).then(|| check.last_start.is_some()),
            last_ping: timefmt::isoformat_opt(check.last_ping.as_ref()),
            next_ping: timefmt::isoformat_opt(check.next_ping().as_ref()),
            manual_resume: check.manual_resume,
            methods: check.methods.clone(),
            priority: check.priority,
            pause_reason: check.pause_reason.clone(),
            archived_at: timefmt::isoformat_opt(check.archived_at.as_ref()),
            cloned_from: cloned_from.map(|id| id.to_string()),
            maintenance_windows_count,
            timeout: simple.then_some(check.timeout),
            schedule: (!simple).then(|| check.schedule.clone()),
            tz: (!simple).then(|| check.tz.clone()),
            uuid: None,
            ping_url: None,
            update_url: None,
            pause_url: None,
            resume_url: None,
            unique_key: None,
        };

        if ctx.read_only {
            response.unique_key = Some(hash_key(&check.id.to_string()));
        } else {
            let update_url = ctx.update_url(check.id);
            response.uuid = Some(check.id.to_string());
            response.ping_url = Some(format!("{}{}", ctx.ping_endpoint, check.id));
            response.pause_url = Some(format!("{}/pause", update_url));
            response.resume_url = Some(format!("{}/resume", update_url));
            response.update_url = Some(update_url);
        }
        response
    }
}

/// Renders several checks, loading clone sources and window counts in two queries.
pub fn render_checks(
    dal: &DAL,
    checks: &[Check],
    ctx: &RenderContext,
) -> QueryResult<Vec<CheckResponse>> {
    let ids: Vec<Uuid> = checks.iter().map(|c| c.id).collect();
    let sources: HashMap<Uuid, Uuid> = dal.clone_logs().sources_for(&ids)?;
    let windows: HashMap<Uuid, i64> = dal.maintenance_windows().count_for(&ids)?;

    Ok(checks
        .iter()
        .map(|check| {
            CheckResponse::new(
                check,
                ctx,
                sources.get(&check.id).copied(),
                windows.get(&check.id).copied().unwrap_or(0),
            )
        })
        .collect())
}

pub fn render_check(dal: &DAL, check: &Check, ctx: &RenderContext) -> QueryResult<CheckResponse> {
    let mut rendered = render_checks(dal, std::slice::from_ref(check), ctx)?;
    Ok(rendered.remove(0))
}
