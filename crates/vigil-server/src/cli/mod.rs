/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Command-line interface for the Vigil server.

pub mod commands;

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Vigil CLI
///
/// Serves the API and manages projects and their keys.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a configuration file layered over the defaults
    #[arg(long, global = true, env = "VIGIL_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the Vigil server
    Serve,

    /// Create a project and print its keys
    CreateProject {
        /// Name of the project
        #[arg(long)]
        name: String,
        /// Number of active checks the project may own
        #[arg(long)]
        check_limit: Option<i32>,
    },

    /// Replace every key of a project and print the new ones
    RotateKeys {
        /// UUID of the project
        #[arg(long)]
        project: Uuid,
    },

    /// List projects
    ListProjects,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
