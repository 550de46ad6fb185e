use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::handle::FailurePolicy;
use crate::retry::RetryPolicy;

/// Retry policy parameters for resolution closures (optional `[retry]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.1 = 100ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.1,
            max_delay_secs: 5,
        }
    }
}

/// Global configuration loaded from `~/.config/lazyart/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LazyartConfig {
    /// Where resolved artifacts are copied. Defaults to `~/.cache/lazyart`.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// What a handle does with its closure after a failed resolution.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Report resolutions as `tracing` spans (false = record only).
    #[serde(default = "default_trace_operations")]
    pub trace_operations: bool,
    /// Optional retry policy; if missing, resolution is attempted once.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

fn default_trace_operations() -> bool {
    true
}

impl Default for LazyartConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            failure_policy: FailurePolicy::Retain,
            trace_operations: true,
            retry: None,
        }
    }
}

impl LazyartConfig {
    /// Configured cache directory, or the XDG cache home.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(xdg::BaseDirectories::with_prefix("lazyart")?.get_cache_home()),
        }
    }

    pub fn retry_policy(&self) -> Option<RetryPolicy> {
        self.retry.as_ref().map(|r| RetryPolicy {
            max_attempts: r.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(r.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(r.max_delay_secs),
        })
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("lazyart")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<LazyartConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = LazyartConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: LazyartConfig = toml::from_str(&data)?;
    Ok(cfg)
}
