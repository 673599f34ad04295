use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::endpoints::Endpoints;
use crate::rate_limit::RatePolicy;
use crate::retry::RetryPolicy;
use crate::transfer::CurlOptions;

/// Environment variable that overrides `api_base`.
pub const API_BASE_ENV: &str = "UPQ_API_BASE";

/// Server rate limit: `requests` uploads per `window_secs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub requests: u32,
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests: 40,
            window_secs: 60,
        }
    }
}

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per item (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

/// Global configuration loaded from `~/.config/upq/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpqConfig {
    /// Base address of the upload server, e.g. `http://localhost:8000`.
    pub api_base: String,
    /// Fixed delay before each push-channel reconnect attempt.
    pub reconnect_delay_ms: u64,
    /// Connect timeout for uploads.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout for one upload (0 = no limit).
    pub transfer_timeout_secs: u64,
    pub rate_limit: RateLimitConfig,
    /// Optional retry policy; if missing, a failed upload is not retried.
    pub retry: Option<RetryConfig>,
}

impl Default for UpqConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000".to_string(),
            reconnect_delay_ms: 2000,
            connect_timeout_secs: 30,
            transfer_timeout_secs: 300,
            rate_limit: RateLimitConfig::default(),
            retry: None,
        }
    }
}

impl UpqConfig {
    pub fn endpoints(&self) -> Result<Endpoints> {
        Endpoints::new(&self.api_base)
    }

    pub fn rate_policy(&self) -> RatePolicy {
        RatePolicy {
            requests: self.rate_limit.requests,
            window: Duration::from_secs(self.rate_limit.window_secs),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryPolicy::from_config)
            .unwrap_or_default()
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn curl_options(&self) -> CurlOptions {
        CurlOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: (self.transfer_timeout_secs > 0)
                .then(|| Duration::from_secs(self.transfer_timeout_secs)),
        }
    }

    /// Replace `api_base` with `value` when it is set and non-empty.
    pub fn apply_api_base_override(&mut self, value: Option<String>) {
        if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
            tracing::debug!(api_base = %v, "api_base overridden from environment");
            self.api_base = v;
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("upq")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
/// `UPQ_API_BASE` takes precedence over the file's `api_base`.
pub fn load_or_init() -> Result<UpqConfig> {
    let path = config_path()?;
    let mut cfg = if path.exists() {
        let data = fs::read_to_string(&path)
            .with_context(|| format!("read config {}", path.display()))?;
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?
    } else {
        let default_cfg = UpqConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        default_cfg
    };
    cfg.apply_api_base_override(std::env::var(API_BASE_ENV).ok());
    Ok(cfg)
}
