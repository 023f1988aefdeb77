use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per call (including the first).
    pub max_attempts: u32,
    /// Backoff delay in milliseconds after the first failed attempt.
    pub initial_delay_ms: u64,
    /// Maximum backoff delay in milliseconds.
    pub max_delay_ms: u64,
    /// Randomize each backoff delay in [0, computed delay].
    pub jitter: bool,
    /// Hard per-attempt timeout in milliseconds.
    pub per_attempt_timeout_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 100,
            max_delay_ms: 1000,
            jitter: true,
            per_attempt_timeout_ms: 5000,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            jitter: self.jitter,
            per_attempt_timeout: Duration::from_millis(self.per_attempt_timeout_ms),
        }
    }
}

/// Global configuration loaded from `~/.config/rex/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RexConfig {
    /// Default endpoint the CLI sends requests to.
    pub endpoint: String,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for RexConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:4000".to_string(),
            retry: None,
        }
    }
}

impl RexConfig {
    /// The effective retry policy: the `[retry]` section if present,
    /// otherwise the built-in defaults.
    pub fn policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryConfig::to_policy)
            .unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rex")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RexConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RexConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: RexConfig = toml::from_str(&data)?;
    Ok(cfg)
}
