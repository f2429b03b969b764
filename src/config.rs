//! Configuration Management
//!
//! Handles persistent configuration storage for stripe-client.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::http::{DEFAULT_API_BASE, DEFAULT_TIMEOUT};
use crate::error::{Error, Result};

/// Environment variable consulted for the secret key
pub const KEY_ENV: &str = "STRIPE_KEY";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Secret API key
    #[serde(default)]
    pub api_key: Option<String>,
    /// API root, e.g. a local mock
    #[serde(default)]
    pub api_base: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("stripe-client").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Get effective key (explicit > STRIPE_KEY > config)
    pub fn effective_key(&self, explicit: Option<&str>) -> Result<String> {
        explicit
            .map(str::to_string)
            .or_else(|| std::env::var(KEY_ENV).ok().filter(|k| !k.is_empty()))
            .or_else(|| self.api_key.clone())
            .ok_or_else(|| {
                Error::config(format!(
                    "No API key configured. Set {KEY_ENV} or use --key"
                ))
            })
    }

    /// Get effective API base (explicit > config > production)
    pub fn effective_base(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_string)
            .or_else(|| self.api_base.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Set key and save
    pub fn set_key(&mut self, key: &str) -> anyhow::Result<()> {
        self.api_key = Some(key.to_string());
        self.save()
    }
}
