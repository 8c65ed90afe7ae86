//! Runtime settings read from the environment (after `.env` is loaded).

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api/dynamic-aggregation/";
pub const DEFAULT_LOG_FILE: &str = "logs/transit_dashboard.log";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Aggregation endpoint or local JSON file.
    pub api_url: String,
    /// Directory export files are written into.
    pub output_dir: PathBuf,
    pub log_file_path: PathBuf,
    pub fetch_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            output_dir: PathBuf::from("."),
            log_file_path: PathBuf::from(DEFAULT_LOG_FILE),
            fetch_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup, falling back to defaults.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        let defaults = Self::default();

        let fetch_timeout = match lookup("DASHBOARD_FETCH_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .with_context(|| format!("invalid DASHBOARD_FETCH_TIMEOUT_SECS '{}'", raw))?,
            ),
            None => defaults.fetch_timeout,
        };

        Ok(Self {
            api_url: lookup("DASHBOARD_API_URL").unwrap_or(defaults.api_url),
            output_dir: lookup("DASHBOARD_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            log_file_path: lookup("LOG_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file_path),
            fetch_timeout,
        })
    }
}
