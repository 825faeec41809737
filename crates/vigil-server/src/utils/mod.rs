/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Utility functions for the Vigil server.
//!
//! Project provisioning used by first startup and the CLI, plus the shutdown hook.

use crate::dal::DAL;
use std::fs;
use std::path::Path;
use tokio::sync::oneshot;
use uuid::Uuid;
use vigil_models::models::projects::{NewProject, Project};
use vigil_utils::config::Settings;
use vigil_utils::logging::prelude::*;

pub mod keys;

use keys::ProjectKeys;

/// Name of the project created on first startup.
pub const DEFAULT_PROJECT_NAME: &str = "Default Project";

/// Waits for the shutdown signal, then removes the key file written at first startup.
pub async fn shutdown(shutdown_rx: oneshot::Receiver<()>, key_file: String) {
    let _ = shutdown_rx.await;
    let _ = fs::remove_file(key_file);
}

/// Performs first-time startup operations: creates the default project and
/// writes its keys to `projects.key_file`.
pub fn first_startup(dal: &DAL, config: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let (project, keys) = create_project(dal, DEFAULT_PROJECT_NAME, config.projects.default_check_limit)?;
    info!("Created default project {}", project.id);
    write_key_file(Path::new(&config.projects.key_file), &project, &keys)?;
    Ok(())
}

/// Creates a project with a fresh key set.
pub fn create_project(
    dal: &DAL,
    name: &str,
    check_limit: i32,
) -> Result<(Project, ProjectKeys), Box<dyn std::error::Error>> {
    let keys = ProjectKeys::generate();
    let new_project = NewProject::new(
        name.to_string(),
        keys.api_key_hash(),
        Some(keys.api_key_readonly_hash()),
        Some(keys.ping_key.clone()),
        check_limit,
    )?;
    let project = dal.projects().create(&new_project)?;
    Ok((project, keys))
}

/// Replaces every key of a project. The old keys stop working immediately.
pub fn rotate_project_keys(
    dal: &DAL,
    project_id: Uuid,
) -> Result<(Project, ProjectKeys), Box<dyn std::error::Error>> {
    dal.projects()
        .get(project_id)?
        .ok_or_else(|| format!("Project not found: {}", project_id))?;

    let keys = ProjectKeys::generate();
    let project = dal.projects().update_keys(
        project_id,
        &keys.api_key_hash(),
        Some(&keys.api_key_readonly_hash()),
        Some(&keys.ping_key),
    )?;
    Ok((project, keys))
}

/// Writes a project's plain keys to `path`, creating parent directories.
pub fn write_key_file(
    path: &Path,
    project: &Project,
    keys: &ProjectKeys,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    info!("Writing project keys to {}", path.display());
    fs::write(path, render_keys(project, keys))?;
    Ok(())
}

fn render_keys(project: &Project, keys: &ProjectKeys) -> String {
    format!(
        "project={}\napi_key={}\napi_key_readonly={}\nping_key={}\n",
        project.id, keys.api_key, keys.api_key_readonly, keys.ping_key
    )
}
