/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Vigil Server
//!
//! `vigil-server` serves the check management API under `/api/v1`, `/api/v2`
//! and `/api/v3`, the public ping endpoints and the operational endpoints,
//! backed by PostgreSQL through diesel.

pub mod api;
pub mod cli;
pub mod dal;
pub mod db;
pub mod metrics;
pub mod utils;
