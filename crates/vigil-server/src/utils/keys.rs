/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! API key generation and hashing.
//!
//! Keys are 32 alphanumeric characters. Only their SHA-256 hex digest is
//! stored; the plain key is shown once, when it is created.

use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of every API key.
pub const API_KEY_LENGTH: usize = 32;
/// Length of a project's ping key.
pub const PING_KEY_LENGTH: usize = 22;

/// A freshly generated key set for a project.
#[derive(Debug, Clone)]
pub struct ProjectKeys {
    pub api_key: String,
    pub api_key_readonly: String,
    pub ping_key: String,
}

impl ProjectKeys {
    pub fn generate() -> Self {
        ProjectKeys {
            api_key: generate_api_key(),
            api_key_readonly: generate_api_key(),
            ping_key: generate_ping_key(),
        }
    }

    pub fn api_key_hash(&self) -> String {
        hash_key(&self.api_key)
    }

    pub fn api_key_readonly_hash(&self) -> String {
        hash_key(&self.api_key_readonly)
    }
}

pub fn generate_api_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(API_KEY_LENGTH)
        .map(char::from)
        .collect()
}

/// Ping keys appear in URLs, so they are lowercase.
pub fn generate_ping_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PING_KEY_LENGTH)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

/// SHA-256 hex digest of `key`.
pub fn hash_key(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}
