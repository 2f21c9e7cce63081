//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Level priority: explicit level (CLI flag) > `PROGRESS_CURVE_LOG` > `info`.
//! Logs go to stderr so stdout stays free for tables and exported data.

use crate::config::LOG_ENV;
use anyhow::{Result, anyhow};
use tracing::Level;
use tracing_subscriber::fmt;

pub fn init_logging(level: Option<&str>) -> Result<()> {
    let level = match level {
        Some(s) => parse_level_str(s).ok_or_else(|| anyhow!("unknown log level '{s}'"))?,
        None => std::env::var(LOG_ENV)
            .ok()
            .and_then(|s| parse_level_str(&s))
            .unwrap_or(Level::INFO),
    };

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}

pub fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
