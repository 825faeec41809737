/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::dal::DAL;
use diesel::prelude::*;
use uuid::Uuid;
use vigil_models::models::archive_logs::ArchiveLog;
use vigil_models::schema::archive_logs;

/// Read access to archive history. Entries are written by
/// [`ChecksDAL::archive`](crate::dal::ChecksDAL::archive) and `restore`.
pub struct ArchiveLogsDAL<'a> {
    pub dal: &'a DAL,
}

impl ArchiveLogsDAL<'_> {
    /// Archive history of a check, newest first.
    pub fn list_for_check(&self, check_id: Uuid) -> QueryResult<Vec<ArchiveLog>> {
        let conn = &mut self.dal.pool.get()?;
        archive_logs::table
            .filter(archive_logs::check_id.eq(check_id))
            .order((archive_logs::created_at.desc(), archive_logs::id.desc()))
            .select(ArchiveLog::as_select())
            .load(conn)
    }
}
