/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for ActivityLog operations.
//!
//! Activity entries are immutable; only append and query operations exist.
//! Check mutations write their entries through the checks DAL so that the entry
//! and the change share a transaction.

use crate::dal::DAL;
use diesel::prelude::*;
use uuid::Uuid;
use vigil_models::models::activity_logs::{ActivityLog, NewActivityLog};
use vigil_models::schema::activity_logs;

pub struct ActivityLogsDAL<'a> {
    pub dal: &'a DAL,
}

impl ActivityLogsDAL<'_> {
    pub fn create(&self, new_log: &NewActivityLog) -> QueryResult<ActivityLog> {
        let conn = &mut self.dal.pool.get()?;
        diesel::insert_into(activity_logs::table)
            .values(new_log)
            .returning(ActivityLog::as_returning())
            .get_result(conn)
    }

    /// The newest `limit` entries of a project, newest first.
    pub fn list_for_project(&self, project_id: Uuid, limit: i64) -> QueryResult<Vec<ActivityLog>> {
        let conn = &mut self.dal.pool.get()?;
        activity_logs::table
            .filter(activity_logs::project_id.eq(project_id))
            .order((activity_logs::created.desc(), activity_logs::id.desc()))
            .limit(limit)
            .select(ActivityLog::as_select())
            .load(conn)
    }
}
