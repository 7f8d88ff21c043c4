use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Above this, `run` wants `--force`.
pub const MAX_CONCURRENCY: usize = 4096;

/// Run parameters read from the JSON config file (`sni.json`).
///
/// Durations are in milliseconds. `handshake_timeout` is optional and falls
/// back to `timeout`.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SniConfig {
    pub concurrency: usize,
    pub timeout: u64,
    #[serde(default)]
    pub handshake_timeout: Option<u64>,
    pub delay: u64,
    pub server_name: Vec<String>,
    #[serde(default)]
    pub sort_by_delay: bool,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("concurrency must be at least 1, got {0}")]
    Concurrency(usize),
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
    #[error("server_name must list at least one hostname")]
    NoServerNames,
    #[error("server_name entry {0} is blank")]
    BlankServerName(usize),
}

impl SniConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let cfg: SniConfig = serde_json::from_str(text).context("parse config json")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("load config file {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::Concurrency(self.concurrency));
        }
        if self.timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.server_name.is_empty() {
            return Err(ConfigError::NoServerNames);
        }
        if let Some(i) = self.server_name.iter().position(|s| s.trim().is_empty()) {
            return Err(ConfigError::BlankServerName(i));
        }
        Ok(())
    }

    pub fn dial_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout.unwrap_or(self.timeout))
    }
}
