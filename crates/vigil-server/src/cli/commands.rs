/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::api;
use crate::dal::DAL;
use crate::db::{create_shared_connection_pool, ConnectionPool};
use crate::utils;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel::sql_query;
use diesel::sql_types::BigInt;
use tokio::signal;
use uuid::Uuid;
use vigil_utils::config::Settings;
use vigil_utils::logging::prelude::*;

// Struct to hold the count result from SQL query
#[derive(QueryableByName, Debug)]
struct Count {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

/// Opens a pool on the configured database and schema.
fn open_pool(config: &Settings, max_size: u32) -> Result<ConnectionPool, Box<dyn std::error::Error>> {
    create_shared_connection_pool(
        &config.database.url,
        max_size,
        config.database.schema.as_deref(),
    )
}

/// Function to start the Vigil server
///
/// This function initializes the database, runs migrations, checks for first-time setup,
/// configures API routes, and starts the server with graceful shutdown support.
pub async fn serve(config: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Vigil server");

    info!("Creating database connection pool");
    let connection_pool = open_pool(config, 5)?;
    info!("Database connection pool created successfully");

    if let Some(ref schema) = config.database.schema {
        info!("Setting up schema: {}", schema);
        connection_pool.setup_schema()?;
    }

    info!("Running pending database migrations");
    connection_pool
        .run_migrations()
        .map_err(|e| format!("Failed to run migrations: {}", e))?;
    info!("Database migrations completed successfully");

    // Check if this is the first time running the application
    let mut conn = connection_pool.get()?;
    let is_first_run = conn.transaction(|conn| {
        let result: Count =
            sql_query("SELECT COUNT(*) as count FROM app_initialization").get_result(conn)?;
        if result.count == 0 {
            sql_query("INSERT INTO app_initialization DEFAULT VALUES").execute(conn)?;
            Ok::<bool, DieselError>(true)
        } else {
            Ok::<bool, DieselError>(false)
        }
    })?;
    drop(conn);

    info!("Initializing Data Access Layer");
    let dal = DAL::new(connection_pool.clone());

    if is_first_run {
        info!("First time application startup detected. Creating default project...");
        utils::first_startup(&dal, config)?;
    } else {
        info!("Existing application detected. Proceeding with normal startup.");
    }

    info!("Configuring API routes");
    let app = api::configure_api_routes(dal.clone(), config).with_state(dal);

    let addr = config.server.listen_addr.as_str();
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Set up shutdown signal handler
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for ctrl+c: {}", e);
        }
        shutdown_tx.send(()).ok();
    });

    info!("Vigil is now running");
    axum::serve(listener, app)
        .with_graceful_shutdown(utils::shutdown(shutdown_rx, config.projects.key_file.clone()))
        .await?;

    Ok(())
}

pub fn create_project(
    config: &Settings,
    name: String,
    check_limit: Option<i32>,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Creating new project: {}", name);

    let dal = DAL::new(open_pool(config, 1)?);
    let limit = check_limit.unwrap_or(config.projects.default_check_limit);
    let (project, keys) = utils::create_project(&dal, &name, limit)?;

    info!("Successfully created project with ID: {}", project.id);
    println!("Project created successfully:");
    println!("ID: {}", project.id);
    println!("Name: {}", project.name);
    println!("Check limit: {}", project.check_limit);
    println!("API key: {}", keys.api_key);
    println!("Read-only API key: {}", keys.api_key_readonly);
    println!("Ping key: {}", keys.ping_key);

    Ok(())
}

pub fn rotate_keys(config: &Settings, project_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
    info!("Rotating keys of project {}", project_id);

    let dal = DAL::new(open_pool(config, 1)?);
    let (project, keys) = utils::rotate_project_keys(&dal, project_id)?;

    info!("Keys rotated successfully for project: {}", project.name);
    println!("API key: {}", keys.api_key);
    println!("Read-only API key: {}", keys.api_key_readonly);
    println!("Ping key: {}", keys.ping_key);

    Ok(())
}

pub fn list_projects(config: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let dal = DAL::new(open_pool(config, 1)?);

    for project in dal.projects().list()? {
        let available = dal.projects().num_checks_available(&project)?;
        println!(
            "{}\t{}\t{} of {} checks available",
            project.id, project.name, available, project.check_limit
        );
    }
    Ok(())
}
