/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data access for projects and their API keys.

use crate::dal::DAL;
use diesel::prelude::*;
use uuid::Uuid;
use vigil_models::models::projects::{NewProject, Project};
use vigil_models::schema::{checks, projects};

/// How a request authenticated against a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAccess {
    ReadWrite,
    ReadOnly,
}

pub struct ProjectsDAL<'a> {
    pub dal: &'a DAL,
}

impl<'a> ProjectsDAL<'a> {
    pub fn create(&self, new_project: &NewProject) -> QueryResult<Project> {
        let conn = &mut self.dal.pool.get()?;
        diesel::insert_into(projects::table)
            .values(new_project)
            .returning(Project::as_returning())
            .get_result(conn)
    }

    pub fn get(&self, project_id: Uuid) -> QueryResult<Option<Project>> {
        let conn = &mut self.dal.pool.get()?;
        projects::table
            .find(project_id)
            .select(Project::as_select())
            .first(conn)
            .optional()
    }

    pub fn list(&self) -> QueryResult<Vec<Project>> {
        let conn = &mut self.dal.pool.get()?;
        projects::table
            .order(projects::created_at.asc())
            .select(Project::as_select())
            .load(conn)
    }

    /// Finds the project owning the key with this SHA-256 hash.
    pub fn get_by_key_hash(&self, key_hash: &str) -> QueryResult<Option<(Project, KeyAccess)>> {
        let conn = &mut self.dal.pool.get()?;
        let project = projects::table
            .filter(
                projects::api_key_hash
                    .eq(key_hash)
                    .or(projects::api_key_readonly_hash.eq(key_hash)),
            )
            .select(Project::as_select())
            .first(conn)
            .optional()?;

        Ok(project.map(|p| {
            let access = if p.api_key_hash == key_hash {
                KeyAccess::ReadWrite
            } else {
                KeyAccess::ReadOnly
            };
            (p, access)
        }))
    }

    pub fn get_by_ping_key(&self, ping_key: &str) -> QueryResult<Option<Project>> {
        let conn = &mut self.dal.pool.get()?;
        projects::table
            .filter(projects::ping_key.eq(ping_key))
            .select(Project::as_select())
            .first(conn)
            .optional()
    }

    /// Replaces the key hashes (and ping key) of a project.
    pub fn update_keys(
        &self,
        project_id: Uuid,
        api_key_hash: &str,
        api_key_readonly_hash: Option<&str>,
        ping_key: Option<&str>,
    ) -> QueryResult<Project> {
        let conn = &mut self.dal.pool.get()?;
        diesel::update(projects::table.find(project_id))
            .set((
                projects::api_key_hash.eq(api_key_hash),
                projects::api_key_readonly_hash.eq(api_key_readonly_hash),
                projects::ping_key.eq(ping_key),
            ))
            .returning(Project::as_returning())
            .get_result(conn)
    }

    pub fn delete(&self, project_id: Uuid) -> QueryResult<usize> {
        let conn = &mut self.dal.pool.get()?;
        diesel::delete(projects::table.find(project_id)).execute(conn)
    }

    /// Remaining capacity: the check limit minus the number of non-archived checks.
    pub fn num_checks_available(&self, project: &Project) -> QueryResult<i64> {
        let conn = &mut self.dal.pool.get()?;
        let active = active_check_count(conn, project.id)?;
        Ok(i64::from(project.check_limit) - active)
    }
}

/// Number of checks of `project_id` that count against its limit.
pub(crate) fn active_check_count(conn: &mut PgConnection, project_id: Uuid) -> QueryResult<i64> {
    checks::table
        .filter(checks::project_id.eq(project_id))
        .filter(checks::archived_at.is_null())
        .count()
        .get_result(conn)
}
