/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer.
//!
//! `DAL` hands out one accessor per table family. Each accessor borrows the DAL,
//! takes a pooled connection per call and returns diesel `QueryResult`s, except
//! for the compound check operations, which return [`CheckOpError`] so callers
//! can tell domain refusals from database failures.

use crate::db::ConnectionPool;

pub mod activity_logs;
pub mod archive_logs;
pub mod checks;
pub mod clone_logs;
pub mod maintenance_windows;
pub mod ping_labels;
pub mod pings;
pub mod projects;

pub use activity_logs::ActivityLogsDAL;
pub use archive_logs::ArchiveLogsDAL;
pub use checks::{CheckFilter, CheckOpError, ChecksDAL};
pub use clone_logs::CloneLogsDAL;
pub use maintenance_windows::MaintenanceWindowsDAL;
pub use ping_labels::PingLabelsDAL;
pub use pings::{PingOutcome, PingsDAL};
pub use projects::ProjectsDAL;

#[derive(Clone)]
pub struct DAL {
    pub pool: ConnectionPool,
}

impl DAL {
    pub fn new(pool: ConnectionPool) -> Self {
        DAL { pool }
    }

    pub fn projects(&self) -> ProjectsDAL {
        ProjectsDAL { dal: self }
    }

    pub fn checks(&self) -> ChecksDAL {
        ChecksDAL { dal: self }
    }

    pub fn activity_logs(&self) -> ActivityLogsDAL {
        ActivityLogsDAL { dal: self }
    }

    pub fn archive_logs(&self) -> ArchiveLogsDAL {
        ArchiveLogsDAL { dal: self }
    }

    pub fn clone_logs(&self) -> CloneLogsDAL {
        CloneLogsDAL { dal: self }
    }

    pub fn maintenance_windows(&self) -> MaintenanceWindowsDAL {
        MaintenanceWindowsDAL { dal: self }
    }

    pub fn ping_labels(&self) -> PingLabelsDAL {
        PingLabelsDAL { dal: self }
    }

    pub fn pings(&self) -> PingsDAL {
        PingsDAL { dal: self }
    }
}

/// Wraps a model validation message as a diesel error.
pub(crate) fn invalid_input(message: String) -> diesel::result::Error {
    diesel::result::Error::QueryBuilderError(message.into())
}

/// True when `err` is a unique constraint violation.
pub fn is_unique_violation(err: &diesel::result::Error) -> bool {
    matches!(
        err,
        diesel::result::Error::DatabaseError(diesel::result::DatabaseErrorKind::UniqueViolation, _)
    )
}
