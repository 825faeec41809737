/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for pings.
//!
//! Recording a ping updates the check's runtime state and appends the ping row
//! in one transaction, with the check row locked so concurrent pings count
//! correctly.

use crate::dal::DAL;
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use uuid::Uuid;
use vigil_models::models::checks::{Check, KIND_SIMPLE, STATUS_DOWN, STATUS_UP};
use vigil_models::models::pings::{Ping, PingRequest, KIND_FAIL, KIND_START};
use vigil_models::schema::{checks, ping_labels, pings};

/// Result of [`PingsDAL::record`].
#[derive(Debug)]
pub enum PingOutcome {
    /// The ping was stored; carries the updated check.
    Recorded(Check),
    /// The check is archived and its state was left alone.
    Archived,
    /// The check only accepts POST pings and this one was not.
    Ignored,
}

pub struct PingsDAL<'a> {
    pub dal: &'a DAL,
}

impl PingsDAL<'_> {
    /// Records a ping for `check_id`, optionally tagged with the check's label `label`.
    ///
    /// Unknown label names are ignored.
    pub fn record(
        &self,
        check_id: Uuid,
        request: PingRequest,
        label: Option<&str>,
    ) -> QueryResult<PingOutcome> {
        let conn = &mut self.dal.pool.get()?;

        conn.transaction(|conn| {
            let check: Check = checks::table
                .find(check_id)
                .select(Check::as_select())
                .for_update()
                .first(conn)?;

            if check.is_archived() {
                return Ok(PingOutcome::Archived);
            }
            if check.methods == "POST" && request.method != "POST" {
                return Ok(PingOutcome::Ignored);
            }

            let label_id = match label {
                Some(name) => ping_labels::table
                    .filter(ping_labels::check_id.eq(check_id))
                    .filter(ping_labels::name.eq(name.trim()))
                    .select(ping_labels::id)
                    .first::<Uuid>(conn)
                    .optional()?,
                None => None,
            };

            let now = Utc::now();
            let n = check.n_pings + 1;
            let frozen = check.is_paused() && check.manual_resume;
            let mut status = check.status.clone();
            let mut last_ping = check.last_ping;
            let mut last_start = check.last_start;
            let mut alert_after = check.alert_after;

            match request.kind.as_str() {
                KIND_START => last_start = Some(now),
                KIND_FAIL => {
                    last_ping = Some(now);
                    if !frozen {
                        status = STATUS_DOWN.to_string();
                    }
                }
                _ => {
                    last_ping = Some(now);
                    last_start = None;
                    if !frozen {
                        status = STATUS_UP.to_string();
                        alert_after = next_alert(&check, now);
                    }
                }
            }

            let updated: Check = diesel::update(checks::table.find(check_id))
                .set((
                    checks::n_pings.eq(n),
                    checks::status.eq(&status),
                    checks::last_ping.eq(last_ping),
                    checks::last_start.eq(last_start),
                    checks::alert_after.eq(alert_after),
                ))
                .returning(Check::as_returning())
                .get_result(conn)?;

            diesel::insert_into(pings::table)
                .values(&request.into_new_ping(check_id, n, label_id))
                .execute(conn)?;

            Ok(PingOutcome::Recorded(updated))
        })
    }

    /// The newest `limit` pings of a check with their label names.
    pub fn list_for_check(
        &self,
        check_id: Uuid,
        limit: i64,
    ) -> QueryResult<Vec<(Ping, Option<String>)>> {
        let conn = &mut self.dal.pool.get()?;
        pings::table
            .left_join(ping_labels::table)
            .filter(pings::check_id.eq(check_id))
            .order(pings::id.desc())
            .limit(limit)
            .select((Ping::as_select(), ping_labels::name.nullable()))
            .load(conn)
    }
}

/// When a simple check becomes overdue after a success at `now`.
fn next_alert(check: &Check, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if check.kind != KIND_SIMPLE {
        return None;
    }
    Some(now + Duration::seconds(i64::from(check.timeout) + i64::from(check.grace)))
}
