/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for ping labels.
//!
//! Label names are unique per check; inserting a duplicate fails with a unique
//! violation (see [`is_unique_violation`](crate::dal::is_unique_violation)).

use crate::dal::DAL;
use diesel::prelude::*;
use uuid::Uuid;
use vigil_models::models::ping_labels::{NewPingLabel, PingLabel};
use vigil_models::schema::ping_labels;

pub struct PingLabelsDAL<'a> {
    pub dal: &'a DAL,
}

impl PingLabelsDAL<'_> {
    pub fn create(&self, new_label: &NewPingLabel) -> QueryResult<PingLabel> {
        let conn = &mut self.dal.pool.get()?;
        diesel::insert_into(ping_labels::table)
            .values(new_label)
            .returning(PingLabel::as_returning())
            .get_result(conn)
    }

    /// Labels of a check ordered by name.
    pub fn list_for_check(&self, check_id: Uuid) -> QueryResult<Vec<PingLabel>> {
        let conn = &mut self.dal.pool.get()?;
        ping_labels::table
            .filter(ping_labels::check_id.eq(check_id))
            .order(ping_labels::name.asc())
            .select(PingLabel::as_select())
            .load(conn)
    }

    pub fn get_by_name(&self, check_id: Uuid, name: &str) -> QueryResult<Option<PingLabel>> {
        let conn = &mut self.dal.pool.get()?;
        ping_labels::table
            .filter(ping_labels::check_id.eq(check_id))
            .filter(ping_labels::name.eq(name))
            .select(PingLabel::as_select())
            .first(conn)
            .optional()
    }

    /// Deletes a label of `check_id`. Pings that carried it keep no label.
    pub fn delete(&self, label_id: Uuid, check_id: Uuid) -> QueryResult<usize> {
        let conn = &mut self.dal.pool.get()?;
        diesel::delete(
            ping_labels::table
                .filter(ping_labels::id.eq(label_id))
                .filter(ping_labels::check_id.eq(check_id)),
        )
        .execute(conn)
    }
}
