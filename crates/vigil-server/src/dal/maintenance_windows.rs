/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for maintenance windows.

use crate::dal::DAL;
use diesel::dsl::count_star;
use diesel::prelude::*;
use std::collections::HashMap;
use uuid::Uuid;
use vigil_models::models::maintenance_windows::{MaintenanceWindow, NewMaintenanceWindow};
use vigil_models::schema::maintenance_windows;

pub struct MaintenanceWindowsDAL<'a> {
    pub dal: &'a DAL,
}

impl MaintenanceWindowsDAL<'_> {
    pub fn create(&self, new_window: &NewMaintenanceWindow) -> QueryResult<MaintenanceWindow> {
        let conn = &mut self.dal.pool.get()?;
        diesel::insert_into(maintenance_windows::table)
            .values(new_window)
            .returning(MaintenanceWindow::as_returning())
            .get_result(conn)
    }

    /// Windows of a check, latest start first.
    pub fn list_for_check(&self, check_id: Uuid) -> QueryResult<Vec<MaintenanceWindow>> {
        let conn = &mut self.dal.pool.get()?;
        maintenance_windows::table
            .filter(maintenance_windows::check_id.eq(check_id))
            .order(maintenance_windows::start_time.desc())
            .select(MaintenanceWindow::as_select())
            .load(conn)
    }

    /// Deletes a window of `check_id`. Returns the number of rows removed.
    pub fn delete(&self, window_id: Uuid, check_id: Uuid) -> QueryResult<usize> {
        let conn = &mut self.dal.pool.get()?;
        diesel::delete(
            maintenance_windows::table
                .filter(maintenance_windows::id.eq(window_id))
                .filter(maintenance_windows::check_id.eq(check_id)),
        )
        .execute(conn)
    }

    /// Number of windows per check. Checks without windows are absent from the map.
    pub fn count_for(&self, check_ids: &[Uuid]) -> QueryResult<HashMap<Uuid, i64>> {
        if check_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let conn = &mut self.dal.pool.get()?;
        let counts: Vec<(Uuid, i64)> = maintenance_windows::table
            .filter(maintenance_windows::check_id.eq_any(check_ids))
            .group_by(maintenance_windows::check_id)
            .select((maintenance_windows::check_id, count_star()))
            .load(conn)?;
        Ok(counts.into_iter().collect())
    }
}
