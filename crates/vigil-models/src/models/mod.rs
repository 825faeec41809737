/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data models for the Vigil storage layer
pub mod activity_logs;
pub mod archive_logs;
pub mod checks;
pub mod clone_logs;
pub mod maintenance_windows;
pub mod ping_labels;
pub mod pings;
pub mod projects;

pub use activity_logs::{ActivityLog, NewActivityLog};
pub use archive_logs::{ArchiveLog, NewArchiveLog};
pub use checks::{Check, CheckChangeset, NewCheck};
pub use clone_logs::{CloneLog, NewCloneLog};
pub use maintenance_windows::{MaintenanceWindow, NewMaintenanceWindow};
pub use ping_labels::{NewPingLabel, PingLabel};
pub use pings::{NewPing, Ping, PingRequest};
pub use projects::{NewProject, Project};
