/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Vigil server CLI application

use vigil_server::cli::commands;
use vigil_server::cli::{parse_cli, Commands};
use vigil_utils::config::Settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let cli = parse_cli();

    let config = Settings::new(cli.config.clone())?;
    vigil_utils::logging::init_from_settings(&config.log)?;

    match cli.command {
        Commands::Serve => commands::serve(&config).await?,
        Commands::CreateProject { name, check_limit } => {
            commands::create_project(&config, name, check_limit)?
        }
        Commands::RotateKeys { project } => commands::rotate_keys(&config, project)?,
        Commands::ListProjects => commands::list_projects(&config)?,
    }
    Ok(())
}
