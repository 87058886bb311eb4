//! Watchdog configuration
//!
//! Loaded once per run from defaults, an optional file and `WATCHDOG_*`
//! environment variables, then passed by reference to the detector and the
//! dispatcher. Nothing here is mutated after loading.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::alert::{NotificationTarget, DEFAULT_TIMEOUT};
use crate::drift::DEFAULT_THRESHOLD;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "WATCHDOG";

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("threshold must be a number, got {0}")]
    InvalidThreshold(f64),

    #[error("invalid webhook URL '{url}': {reason}")]
    InvalidWebhookUrl { url: String, reason: String },

    #[error("timeout_secs must be greater than zero")]
    InvalidTimeout,
}

/// Drift check configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchdogConfig {
    /// Relative mean shift tolerated before a column is flagged
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Incoming webhook URL; alerts are skipped when absent
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Channel label ("slack", "teams"); informational only
    #[serde(default = "default_alert_channel")]
    pub alert_channel: String,

    /// Webhook request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_alert_channel() -> String {
    "slack".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            webhook_url: None,
            alert_channel: default_alert_channel(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl WatchdogConfig {
    /// Load configuration from an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Load configuration with an explicit environment source
    pub fn load_with_env(
        path: Option<&Path>,
        env: config::Environment,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("threshold", DEFAULT_THRESHOLD)?
            .set_default("alert_channel", default_alert_channel())?
            .set_default("timeout_secs", default_timeout_secs() as i64)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let config: Self = builder.add_source(env).build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Builder: override the threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Builder: set the webhook URL
    pub fn with_webhook_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }

    /// Builder: set the channel label
    pub fn with_alert_channel(mut self, channel: impl Into<String>) -> Self {
        self.alert_channel = channel.into();
        self
    }

    /// Check values that deserialization alone cannot rule out
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threshold.is_nan() {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        self.notification_target()?;
        Ok(())
    }

    /// Resolve the configured notification target
    ///
    /// A missing or blank URL yields [`NotificationTarget::NoOp`].
    pub fn notification_target(&self) -> Result<NotificationTarget, ConfigError> {
        match self.webhook_url.as_deref().map(str::trim) {
            None | Some("") => Ok(NotificationTarget::NoOp),
            Some(raw) => {
                let url = Url::parse(raw).map_err(|e| ConfigError::InvalidWebhookUrl {
                    url: raw.to_string(),
                    reason: e.to_string(),
                })?;
                match url.scheme() {
                    "http" | "https" => Ok(NotificationTarget::Webhook(url)),
                    other => Err(ConfigError::InvalidWebhookUrl {
                        url: raw.to_string(),
                        reason: format!("unsupported scheme '{}'", other),
                    }),
                }
            }
        }
    }

    /// Webhook request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
