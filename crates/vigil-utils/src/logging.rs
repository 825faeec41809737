/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Vigil Logging Module
//!
//! A small process-wide implementation of the `log` facade.
//!
//! ## Usage
//!
//! ```ignore
//! use vigil_utils::logging;
//! use vigil_utils::logging::prelude::*;
//!
//! logging::init_with_format("info", "json")?;
//! info!("server started");
//! logging::update_log_level("debug")?;
//! ```
//!
//! Records go to stderr, either as `timestamp - LEVEL: message` lines or as one
//! JSON object per line. The level can be changed at any time from any thread.

use crate::config::Log;
use log::{LevelFilter, Metadata, Record, SetLoggerError};
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub use log::{debug, error, info, trace, warn};

static LOGGER: VigilLogger = VigilLogger;
static CURRENT_LEVEL: AtomicUsize = AtomicUsize::new(LevelFilter::Info as usize);
static JSON_FORMAT: AtomicBool = AtomicBool::new(false);
static INIT: OnceCell<()> = OnceCell::new();

pub struct VigilLogger;

impl log::Log for VigilLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= level_filter_from_usize(CURRENT_LEVEL.load(Ordering::Relaxed))
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if JSON_FORMAT.load(Ordering::Relaxed) {
            eprintln!("{}", json_line(record));
        } else {
            eprintln!(
                "{} - {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

fn json_line(record: &Record) -> serde_json::Value {
    serde_json::json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "level": record.level().to_string().to_lowercase(),
        "target": record.target(),
        "message": format!("{}", record.args()),
        "module": record.module_path(),
        "line": record.line()
    })
}

/// Initializes logging with the given level and the text format.
pub fn init(level: &str) -> Result<(), SetLoggerError> {
    init_with_format(level, "text")
}

/// Initializes logging with the given level and format ("text" or "json").
///
/// Calling this more than once is allowed; later calls only change the level
/// and format of the already installed logger.
pub fn init_with_format(level: &str, format: &str) -> Result<(), SetLoggerError> {
    let level_filter = str_to_level_filter(level);

    INIT.get_or_try_init(|| log::set_logger(&LOGGER))?;

    JSON_FORMAT.store(format.eq_ignore_ascii_case("json"), Ordering::Relaxed);
    CURRENT_LEVEL.store(level_filter as usize, Ordering::Relaxed);
    log::set_max_level(level_filter);
    Ok(())
}

/// Initializes logging from the `[log]` configuration section.
pub fn init_from_settings(log: &Log) -> Result<(), SetLoggerError> {
    init_with_format(&log.level, &log.format)
}

/// Updates the current log level. Unknown level names fall back to "info".
pub fn update_log_level(level: &str) -> Result<(), String> {
    let new_level = str_to_level_filter(level);
    CURRENT_LEVEL.store(new_level as usize, Ordering::Relaxed);
    log::set_max_level(new_level);
    Ok(())
}

fn str_to_level_filter(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn level_filter_from_usize(v: usize) -> LevelFilter {
    match v {
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        5 => LevelFilter::Trace,
        _ => LevelFilter::Off,
    }
}

pub mod prelude {
    pub use log::{debug, error, info, trace, warn};
}
