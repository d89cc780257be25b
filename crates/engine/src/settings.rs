use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};

/// Environment prefix for run configuration overrides.
pub const ENV_PREFIX: &str = "PHANTOMFLOW";

/// Settings for the shared HTTP client and its connection pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    pub max_idle_per_host: usize,
    pub max_connections_per_host: usize,
    pub idle_timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub keepalive_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_idle_per_host: 4096,
            max_connections_per_host: 4096,
            idle_timeout_ms: 90_000,
            connect_timeout_ms: 3_000,
            keepalive_ms: 90_000,
            request_timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub interval_ms: u64,
    /// Zone name or `+HH:MM` offset progress timestamps are rendered in.
    pub timezone: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            interval_ms: 1_000,
            timezone: "Asia/Seoul".to_string(),
        }
    }
}

impl ReportSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsSettings {
    pub enabled: bool,
    pub listen: String,
}

impl Default for DiagnosticsSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            listen: "127.0.0.1:6060".to_string(),
        }
    }
}

/// Everything about a run that is not part of the command line bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub pool: PoolSettings,
    pub report: ReportSettings,
    pub diagnostics: DiagnosticsSettings,

    /// Base seed for worker generators; the spawn timestamp when unset.
    pub seed: Option<u64>,

    // Logging
    pub log_level: String,
    pub log_format: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            pool: PoolSettings::default(),
            report: ReportSettings::default(),
            diagnostics: DiagnosticsSettings::default(),
            seed: None,
            log_level: "warn".to_string(),
            log_format: "compact".to_string(),
        }
    }
}

impl RunConfig {
    /// Load defaults, then the optional file, then `PHANTOMFLOW_*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// Same as [`RunConfig::load`] with a custom environment prefix.
    ///
    /// Nested keys use `__`, e.g. `PHANTOMFLOW_POOL__REQUEST_TIMEOUT_MS`.
    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(EngineError::InvalidConfig(format!(
                    "configuration file {} not found",
                    path.display()
                )));
            }
            builder = builder.add_source(ConfigFile::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: RunConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make a run meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.pool.max_connections_per_host == 0 {
            return Err(EngineError::InvalidConfig(
                "pool.max_connections_per_host must be greater than zero".to_string(),
            ));
        }
        if self.pool.request_timeout_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "pool.request_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.report.interval_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "report.interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
