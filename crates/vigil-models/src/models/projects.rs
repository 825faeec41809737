/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Projects Module
//!
//! A project owns checks and the API keys used to manage them.
//!
//! ## Data Model
//!
//! - `id`: Uuid, the project code
//! - `name`: VARCHAR(100)
//! - `api_key_hash`: SHA-256 hex digest of the read-write API key
//! - `api_key_readonly_hash`: SHA-256 hex digest of the read-only key, if one was issued
//! - `ping_key`: key used in slug-based ping URLs, if one was issued
//! - `check_limit`: how many active (non-archived) checks the project may hold
//! - `created_at`: creation timestamp
//!
//! Deleting a project removes its checks and its activity log.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a project in the database.
#[derive(Queryable, Selectable, Identifiable, AsChangeset, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing)]
    pub api_key_hash: String,
    #[serde(skip_serializing)]
    pub api_key_readonly_hash: Option<String>,
    pub ping_key: Option<String>,
    pub check_limit: i32,
    pub created_at: DateTime<Utc>,
}

/// Represents a new project to be inserted into the database.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::projects)]
pub struct NewProject {
    pub name: String,
    pub api_key_hash: String,
    pub api_key_readonly_hash: Option<String>,
    pub ping_key: Option<String>,
    pub check_limit: i32,
}

impl NewProject {
    /// Creates a new `NewProject`.
    ///
    /// Key hashes must be 64-character hex strings and the check limit may not be negative.
    pub fn new(
        name: String,
        api_key_hash: String,
        api_key_readonly_hash: Option<String>,
        ping_key: Option<String>,
        check_limit: i32,
    ) -> Result<Self, String> {
        if name.chars().count() > 100 {
            return Err("Project name cannot exceed 100 characters".to_string());
        }
        if !is_sha256_hex(&api_key_hash) {
            return Err("Invalid API key hash".to_string());
        }
        if let Some(hash) = &api_key_readonly_hash {
            if !is_sha256_hex(hash) {
                return Err("Invalid read-only API key hash".to_string());
            }
        }
        if check_limit < 0 {
            return Err("Check limit cannot be negative".to_string());
        }

        Ok(NewProject {
            name,
            api_key_hash,
            api_key_readonly_hash,
            ping_key,
            check_limit,
        })
    }
}

fn is_sha256_hex(hash: &str) -> bool {
    hash.len() == 64 && hash.chars().all(|c| c.is_ascii_hexdigit())
}
