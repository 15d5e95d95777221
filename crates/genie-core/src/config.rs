//! Application configuration
//!
//! ## Configuration Resolution
//!
//! Config is loaded in layers:
//! 1. Explicit path (`--config`), if given and present
//! 2. Override in data dir (~/.local/share/genie/config/genie.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! Environment variables are applied last and win over file values.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/genie.toml");

pub const MAX_ROWS_ENV: &str = "GENIE_MAX_ROWS";
pub const MAX_UPLOAD_BYTES_ENV: &str = "GENIE_MAX_UPLOAD_BYTES";
pub const FORECAST_HORIZON_ENV: &str = "GENIE_FORECAST_HORIZON";
pub const SESSION_TIMEOUT_ENV: &str = "GENIE_SESSION_TIMEOUT_SECS";

/// Resolved application settings
#[derive(Debug, Clone, PartialEq)]
pub struct GenieConfig {
    /// Uploads with more data rows than this are rejected
    pub max_rows: usize,
    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
    /// Positions produced by multi-step forecasts when no horizon is given
    pub default_horizon: usize,
    /// Idle server sessions expire after this long
    pub session_timeout: Duration,
}

impl Default for GenieConfig {
    fn default() -> Self {
        Self {
            max_rows: 100_000,
            max_upload_bytes: 10 * 1024 * 1024,
            default_horizon: 3,
            session_timeout: Duration::from_secs(30 * 60),
        }
    }
}

impl GenieConfig {
    /// Load config from the standard locations plus environment overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let content = match explicit {
            Some(path) => read_config(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => read_config(&path)?,
                _ => DEFAULT_CONFIG.to_string(),
            },
        };

        let mut config = parse_config(&content)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment overrides through a lookup function
    fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(MAX_ROWS_ENV) {
            self.max_rows = parse_env(MAX_ROWS_ENV, &v)?;
        }
        if let Some(v) = lookup(MAX_UPLOAD_BYTES_ENV) {
            self.max_upload_bytes = parse_env(MAX_UPLOAD_BYTES_ENV, &v)?;
        }
        if let Some(v) = lookup(FORECAST_HORIZON_ENV) {
            self.default_horizon = parse_env(FORECAST_HORIZON_ENV, &v)?;
        }
        if let Some(v) = lookup(SESSION_TIMEOUT_ENV) {
            self.session_timeout = Duration::from_secs(parse_env(SESSION_TIMEOUT_ENV, &v)?);
        }
        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("genie").join("config").join("genie.toml"))
}

fn read_config(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }
    fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} must be a positive integer, got '{}'", key, value)))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    limits: Option<RawLimits>,
    forecast: Option<RawForecast>,
    server: Option<RawServer>,
}

#[derive(Debug, Deserialize)]
struct RawLimits {
    max_rows: Option<usize>,
    max_upload_bytes: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    default_horizon: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    session_timeout_secs: Option<u64>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<GenieConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = GenieConfig::default();

    if let Some(limits) = raw.limits {
        if let Some(max_rows) = limits.max_rows {
            config.max_rows = max_rows;
        }
        if let Some(max_upload_bytes) = limits.max_upload_bytes {
            config.max_upload_bytes = max_upload_bytes;
        }
    }

    if let Some(forecast) = raw.forecast {
        if let Some(horizon) = forecast.default_horizon {
            config.default_horizon = horizon;
        }
    }

    if let Some(server) = raw.server {
        if let Some(secs) = server.session_timeout_secs {
            config.session_timeout = Duration::from_secs(secs);
        }
    }

    if config.max_rows == 0 {
        return Err(Error::Config("limits.max_rows must be greater than 0".into()));
    }

    Ok(config)
}
