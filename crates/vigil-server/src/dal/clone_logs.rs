/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for clone records.

use crate::dal::DAL;
use diesel::prelude::*;
use std::collections::HashMap;
use uuid::Uuid;
use vigil_models::models::clone_logs::CloneLog;
use vigil_models::schema::clone_logs;

pub struct CloneLogsDAL<'a> {
    pub dal: &'a DAL,
}

impl CloneLogsDAL<'_> {
    /// Clones made from `check_id`, newest first. Ties on `created` fall back to `id`.
    pub fn list_for_check(&self, check_id: Uuid) -> QueryResult<Vec<CloneLog>> {
        let conn = &mut self.dal.pool.get()?;
        clone_logs::table
            .filter(clone_logs::source_check_id.eq(check_id))
            .order((clone_logs::created.desc(), clone_logs::id.desc()))
            .select(CloneLog::as_select())
            .load(conn)
    }

    /// Maps each of `check_ids` that was created by cloning to its source check.
    pub fn sources_for(&self, check_ids: &[Uuid]) -> QueryResult<HashMap<Uuid, Uuid>> {
        if check_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let conn = &mut self.dal.pool.get()?;
        let pairs: Vec<(Uuid, Uuid)> = clone_logs::table
            .filter(clone_logs::cloned_check_id.eq_any(check_ids))
            .select((clone_logs::cloned_check_id, clone_logs::source_check_id))
            .load(conn)?;
        Ok(pairs.into_iter().collect())
    }
}
