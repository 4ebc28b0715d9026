//! Realtime channel configuration
//!
//! Loaded from a YAML file (path resolved by the binary layer) with every
//! field defaulted to the platform constants, so an empty file is a valid
//! config.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeConfig {
    /// HTTP origin of the platform API; the channel URL is derived from it
    pub service_origin: String,

    // === Heartbeat ===
    pub heartbeat_interval_secs: u64,
    /// How long a probe may go unanswered before the connection is
    /// considered dead (3x the interval by default)
    pub liveness_timeout_secs: u64,

    // === Reconnection ===
    pub backoff_base_secs: u64,
    pub backoff_max_secs: u64,
    pub max_reconnect_attempts: usize,

    // === Store ===
    pub retention_ceiling: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            service_origin: "https://api.creatorhub.io".to_string(),
            heartbeat_interval_secs: 30,
            liveness_timeout_secs: 90,
            backoff_base_secs: 1,
            backoff_max_secs: 30,
            max_reconnect_attempts: 5,
            retention_ceiling: 50,
        }
    }
}

impl RealtimeConfig {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn liveness_timeout(&self) -> Duration {
        Duration::from_secs(self.liveness_timeout_secs)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_secs(self.backoff_base_secs)
    }

    pub fn backoff_max(&self) -> Duration {
        Duration::from_secs(self.backoff_max_secs)
    }

    pub fn with_service_origin(mut self, origin: impl Into<String>) -> Self {
        self.service_origin = origin.into();
        self
    }

    pub fn with_heartbeat_interval_secs(mut self, secs: u64) -> Self {
        self.heartbeat_interval_secs = secs;
        self
    }

    pub fn with_retention_ceiling(mut self, ceiling: usize) -> Self {
        self.retention_ceiling = ceiling;
        self
    }
}
