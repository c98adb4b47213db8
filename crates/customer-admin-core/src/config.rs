//! Application configuration management.
//!
//! Configuration is stored at `~/.config/customer-admin/config.json`. The API
//! base URL can be overridden with the `CUSTOMER_ADMIN_API_BASE_URL`
//! environment variable, which takes precedence over the file. A command-line
//! override beats both and is never written back.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::AuthPolicy;
use crate::auth::DEFAULT_TOKEN_TTL_MINUTES;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "customer-admin";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable holding the API base URL
pub const BASE_URL_ENV: &str = "CUSTOMER_ADMIN_API_BASE_URL";

/// Used when neither the environment nor the config file names a server
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub base_url: Option<String>,
    /// No timeout is applied unless this is set.
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub create_requires_auth: bool,
    pub token_ttl_minutes: Option<i64>,
    pub last_username: Option<String>,
    /// Set from the command line; beats both the environment and the file.
    #[serde(skip)]
    pub base_url_override: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Resolve the base URL from the environment, then the file, then the default.
    pub fn base_url(&self) -> String {
        self.base_url_with(std::env::var(BASE_URL_ENV).ok().as_deref())
    }

    fn base_url_with(&self, env_value: Option<&str>) -> String {
        self.base_url_override
            .as_deref()
            .or(env_value.filter(|v| !v.trim().is_empty()))
            .or(self.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim()
            .trim_end_matches('/')
            .to_string()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn auth_policy(&self) -> AuthPolicy {
        AuthPolicy {
            create_requires_auth: self.create_requires_auth,
        }
    }

    /// Non-positive or out-of-range values fall back to the default.
    pub fn token_ttl(&self) -> chrono::Duration {
        let default = chrono::Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES);
        match self.token_ttl_minutes {
            None => default,
            Some(minutes) => chrono::Duration::try_minutes(minutes)
                .filter(|ttl| *ttl > chrono::Duration::zero())
                .unwrap_or_else(|| {
                    warn!(token_ttl_minutes = minutes, "Invalid token TTL in config, using default");
                    default
                }),
        }
    }
}
