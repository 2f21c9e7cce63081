use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

pub const HTTP_ADDR_ENV: &str = "PROGRESS_CURVE_HTTP_ADDR";
pub const LOG_ENV: &str = "PROGRESS_CURVE_LOG";
pub const SAMPLE_ENV: &str = "PROGRESS_CURVE_SAMPLE";
pub const LABELS_ENV: &str = "PROGRESS_CURVE_LABELS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub http_addr: SocketAddr,
    pub log_level: Option<String>,
    /// Start the session with the built-in sample tasks.
    pub seed_sample: bool,
    /// Default for the per-bar chart labels toggle.
    pub show_labels: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            log_level: None,
            seed_sample: true,
            show_labels: false,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(addr) = lookup(HTTP_ADDR_ENV) {
            config.http_addr = addr
                .trim()
                .parse()
                .map_err(|e| format!("{HTTP_ADDR_ENV}='{addr}' is not a socket address: {e}"))?;
        }
        if let Some(level) = lookup(LOG_ENV) {
            config.log_level = Some(level);
        }
        if let Some(value) = lookup(SAMPLE_ENV) {
            config.seed_sample = parse_flag(SAMPLE_ENV, &value)?;
        }
        if let Some(value) = lookup(LABELS_ENV) {
            config.show_labels = parse_flag(LABELS_ENV, &value)?;
        }
        Ok(config)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("{key}='{other}' is not a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            (HTTP_ADDR_ENV, "127.0.0.1:8080"),
            (SAMPLE_ENV, "off"),
            (LABELS_ENV, "TRUE"),
        ]))
        .unwrap();
        assert_eq!(config.http_addr.port(), 8080);
        assert!(!config.seed_sample);
        assert!(config.show_labels);
    }

    #[test]
    fn bad_flag_is_reported() {
        let err = AppConfig::from_lookup(lookup(&[(SAMPLE_ENV, "maybe")])).unwrap_err();
        assert!(err.contains(SAMPLE_ENV));
    }
}
