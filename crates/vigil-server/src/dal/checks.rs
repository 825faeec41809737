/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data access for checks.
//!
//! Plain reads return `QueryResult`. Operations that can be refused for domain
//! reasons (capacity, archive state, pause state) return [`CheckOpError`].
//! Every mutation that belongs in the project's activity log writes its entry
//! in the same transaction as the change itself.

use crate::dal::{invalid_input, projects::active_check_count, DAL};
use chrono::Utc;
use diesel::prelude::*;
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;
use vigil_models::models::activity_logs::{
    NewActivityLog, ACTION_CHECK_CREATED, ACTION_CHECK_DELETED, ACTION_CHECK_PAUSED,
    ACTION_CHECK_RESUMED, ACTION_CHECK_UPDATED,
};
use vigil_models::models::archive_logs::{NewArchiveLog, ACTION_ARCHIVED, ACTION_RESTORED};
use vigil_models::models::checks::{Check, CheckChangeset, NewCheck, STATUS_NEW, STATUS_PAUSED};
use vigil_models::models::clone_logs::NewCloneLog;
use vigil_models::models::projects::Project;
use vigil_models::schema::{activity_logs, archive_logs, checks, clone_logs, projects};

/// Why a compound check operation did not happen.
#[derive(Debug)]
pub enum CheckOpError {
    /// The project has no room for another active check.
    NoCapacity,
    AlreadyArchived,
    NotArchived,
    NotPaused,
    Database(diesel::result::Error),
}

impl fmt::Display for CheckOpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOpError::NoCapacity => write!(f, "no checks available"),
            CheckOpError::AlreadyArchived => write!(f, "check is already archived"),
            CheckOpError::NotArchived => write!(f, "check is not archived"),
            CheckOpError::NotPaused => write!(f, "check is not paused"),
            CheckOpError::Database(e) => write!(f, "database error: {}", e),
        }
    }
}

impl std::error::Error for CheckOpError {}

impl From<diesel::result::Error> for CheckOpError {
    fn from(e: diesel::result::Error) -> Self {
        CheckOpError::Database(e)
    }
}

/// Selection criteria for [`ChecksDAL::list_for_project`].
#[derive(Debug, Clone, Default)]
pub struct CheckFilter {
    /// Every tag must be an exact token of the check's tags.
    pub tags: BTreeSet<String>,
    /// List archived checks instead of active ones.
    pub archived: bool,
    pub slug: Option<String>,
}

pub struct ChecksDAL<'a> {
    pub dal: &'a DAL,
}

impl<'a> ChecksDAL<'a> {
    /// Creates a check, refusing when the project is at its check limit.
    pub fn create(&self, new_check: &NewCheck) -> Result<Check, CheckOpError> {
        new_check.validate().map_err(invalid_input)?;
        let conn = &mut self.dal.pool.get()?;

        conn.transaction(|conn| {
            let project = lock_project(conn, new_check.project_id)?;
            ensure_capacity(conn, &project)?;

            let check: Check = diesel::insert_into(checks::table)
                .values(new_check)
                .returning(Check::as_returning())
                .get_result(conn)?;

            log_activity(conn, &check, ACTION_CHECK_CREATED, &check.name)?;
            Ok(check)
        })
    }

    pub fn get(&self, check_id: Uuid) -> QueryResult<Option<Check>> {
        let conn = &mut self.dal.pool.get()?;
        checks::table
            .find(check_id)
            .select(Check::as_select())
            .first(conn)
            .optional()
    }

    /// Finds a project's check by slug, preferring active checks over archived ones.
    pub fn get_by_slug(&self, project_id: Uuid, slug: &str) -> QueryResult<Option<Check>> {
        let conn = &mut self.dal.pool.get()?;
        checks::table
            .filter(checks::project_id.eq(project_id))
            .filter(checks::slug.eq(slug))
            .order((checks::archived_at.desc().nulls_first(), checks::created.asc()))
            .select(Check::as_select())
            .first(conn)
            .optional()
    }

    /// Lists a project's checks, highest priority first and then by name.
    pub fn list_for_project(&self, project_id: Uuid, filter: &CheckFilter) -> QueryResult<Vec<Check>> {
        let conn = &mut self.dal.pool.get()?;

        let mut query = checks::table
            .filter(checks::project_id.eq(project_id))
            .select(Check::as_select())
            .order((checks::priority.desc(), checks::name.asc()))
            .into_boxed();

        query = if filter.archived {
            query.filter(checks::archived_at.is_not_null())
        } else {
            query.filter(checks::archived_at.is_null())
        };
        if let Some(ref slug) = filter.slug {
            query = query.filter(checks::slug.eq(slug));
        }

        let found = query.load(conn)?;
        Ok(found
            .into_iter()
            .filter(|check| check.matches_tag_set(&filter.tags))
            .collect())
    }

    /// Applies a partial configuration update and logs it.
    pub fn update(&self, check_id: Uuid, changes: &CheckChangeset) -> QueryResult<Check> {
        let conn = &mut self.dal.pool.get()?;

        conn.transaction(|conn| {
            let check: Check = if changes.is_empty() {
                checks::table
                    .find(check_id)
                    .select(Check::as_select())
                    .first(conn)?
            } else {
                diesel::update(checks::table.find(check_id))
                    .set(changes)
                    .returning(Check::as_returning())
                    .get_result(conn)?
            };

            log_activity(conn, &check, ACTION_CHECK_UPDATED, &check.name)?;
            Ok(check)
        })
    }

    /// Deletes a check together with everything that cascades from it.
    ///
    /// Returns the check as it was before deletion.
    pub fn delete(&self, check_id: Uuid) -> QueryResult<Check> {
        let conn = &mut self.dal.pool.get()?;

        conn.transaction(|conn| {
            let check: Check = diesel::delete(checks::table.find(check_id))
                .returning(Check::as_returning())
                .get_result(conn)?;

            log_activity(conn, &check, ACTION_CHECK_DELETED, &check.name)?;
            Ok(check)
        })
    }

    /// Pauses a check. Pausing an already paused check replaces its reason.
    pub fn pause(&self, check_id: Uuid, reason: &str) -> QueryResult<Check> {
        let conn = &mut self.dal.pool.get()?;

        conn.transaction(|conn| {
            let check: Check = diesel::update(checks::table.find(check_id))
                .set((
                    checks::status.eq(STATUS_PAUSED),
                    checks::pause_reason.eq(reason),
                    checks::alert_after.eq(None::<chrono::DateTime<Utc>>),
                ))
                .returning(Check::as_returning())
                .get_result(conn)?;

            log_activity(conn, &check, ACTION_CHECK_PAUSED, &check.name)?;
            Ok(check)
        })
    }

    /// Resumes a paused check, returning it to `new`.
    pub fn resume(&self, check_id: Uuid) -> Result<Check, CheckOpError> {
        let conn = &mut self.dal.pool.get()?;

        conn.transaction(|conn| {
            let current = lock_check(conn, check_id)?;
            if !current.is_paused() {
                return Err(CheckOpError::NotPaused);
            }

            let check: Check = diesel::update(checks::table.find(check_id))
                .set((
                    checks::status.eq(STATUS_NEW),
                    checks::pause_reason.eq(""),
                    checks::last_start.eq(None::<chrono::DateTime<Utc>>),
                    checks::alert_after.eq(None::<chrono::DateTime<Utc>>),
                ))
                .returning(Check::as_returning())
                .get_result(conn)?;

            log_activity(conn, &check, ACTION_CHECK_RESUMED, &check.name)?;
            Ok(check)
        })
    }

    /// Archives a check. Archived checks stop counting against the check limit.
    pub fn archive(&self, check_id: Uuid, actor: &str) -> Result<Check, CheckOpError> {
        let entry = NewArchiveLog::new(check_id, ACTION_ARCHIVED, actor).map_err(invalid_input)?;
        let conn = &mut self.dal.pool.get()?;

        conn.transaction(|conn| {
            let current = lock_check(conn, check_id)?;
            if current.is_archived() {
                return Err(CheckOpError::AlreadyArchived);
            }

            let check: Check = diesel::update(checks::table.find(check_id))
                .set(checks::archived_at.eq(Some(Utc::now())))
                .returning(Check::as_returning())
                .get_result(conn)?;

            diesel::insert_into(archive_logs::table)
                .values(&entry)
                .execute(conn)?;
            Ok(check)
        })
    }

    /// Restores an archived check with fresh runtime state.
    pub fn restore(&self, check_id: Uuid, actor: &str) -> Result<Check, CheckOpError> {
        let entry = NewArchiveLog::new(check_id, ACTION_RESTORED, actor).map_err(invalid_input)?;
        let conn = &mut self.dal.pool.get()?;

        conn.transaction(|conn| {
            let current = lock_check(conn, check_id)?;
            if !current.is_archived() {
                return Err(CheckOpError::NotArchived);
            }
            let project = lock_project(conn, current.project_id)?;
            ensure_capacity(conn, &project)?;

            let check: Check = diesel::update(checks::table.find(check_id))
                .set((
                    checks::archived_at.eq(None::<chrono::DateTime<Utc>>),
                    checks::status.eq(STATUS_NEW),
                    checks::n_pings.eq(0),
                    checks::last_ping.eq(None::<chrono::DateTime<Utc>>),
                    checks::last_start.eq(None::<chrono::DateTime<Utc>>),
                    checks::alert_after.eq(None::<chrono::DateTime<Utc>>),
                ))
                .returning(Check::as_returning())
                .get_result(conn)?;

            diesel::insert_into(archive_logs::table)
                .values(&entry)
                .execute(conn)?;
            Ok(check)
        })
    }

    /// Copies a check's configuration into `target_project_id` and records the clone.
    pub fn clone_to(
        &self,
        source: &Check,
        target_project_id: Uuid,
        name: Option<String>,
        cloned_by: &str,
    ) -> Result<Check, CheckOpError> {
        let new_check = source.clone_config(target_project_id, name);
        new_check.validate().map_err(invalid_input)?;
        let conn = &mut self.dal.pool.get()?;

        conn.transaction(|conn| {
            let project = lock_project(conn, target_project_id)?;
            ensure_capacity(conn, &project)?;

            let cloned: Check = diesel::insert_into(checks::table)
                .values(&new_check)
                .returning(Check::as_returning())
                .get_result(conn)?;

            let entry = NewCloneLog::new(source.id, cloned.id, target_project_id, cloned_by)
                .map_err(invalid_input)?;
            diesel::insert_into(clone_logs::table)
                .values(&entry)
                .execute(conn)?;
            Ok(cloned)
        })
    }
}

fn lock_project(conn: &mut PgConnection, project_id: Uuid) -> QueryResult<Project> {
    projects::table
        .find(project_id)
        .select(Project::as_select())
        .for_update()
        .first(conn)
}

fn lock_check(conn: &mut PgConnection, check_id: Uuid) -> QueryResult<Check> {
    checks::table
        .find(check_id)
        .select(Check::as_select())
        .for_update()
        .first(conn)
}

fn ensure_capacity(conn: &mut PgConnection, project: &Project) -> Result<(), CheckOpError> {
    let active = active_check_count(conn, project.id)?;
    if i64::from(project.check_limit) - active <= 0 {
        return Err(CheckOpError::NoCapacity);
    }
    Ok(())
}

fn log_activity(
    conn: &mut PgConnection,
    check: &Check,
    action: &str,
    details: &str,
) -> QueryResult<()> {
    let entry = NewActivityLog::new(check.project_id, action, Some(check.id), details)
        .map_err(invalid_input)?;
    diesel::insert_into(activity_logs::table)
        .values(&entry)
        .execute(conn)?;
    Ok(())
}
