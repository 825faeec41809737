/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Storage types for Vigil: the diesel schema, row structs, insert structs
//! with their validation, and the JSON shapes records are rendered as.

pub mod models;
pub mod schema;
pub mod timefmt;
