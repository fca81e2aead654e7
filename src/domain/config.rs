//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file (`config.yaml`).
//! Defines the structs for the connected services, the relay destination and the initial
//! monitor settings. The file is read once at startup; nothing re-reads it afterwards.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::domain::types::FilterMode;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub services: ServicesConfig,
    pub relay: RelayConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub system: SystemConfig,
}

impl AppConfig {
    /// Reads and validates the YAML file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: AppConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.monitor.poll_interval_secs == 0 {
            bail!("monitor.poll_interval_secs must be greater than zero");
        }
        if self.relay.room.trim().is_empty() {
            bail!("relay.room must name a room ID or alias");
        }
        Ok(())
    }

    /// Returns true if `sender` is one of the configured admins (case-insensitive).
    pub fn is_admin(&self, sender: &str) -> bool {
        self.system
            .admin
            .iter()
            .any(|a| a.eq_ignore_ascii_case(sender))
    }
}

/// Configuration for various connected services.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    pub matrix: MatrixConfig,
    #[serde(default)]
    pub bluesky: BlueskyConfig,
}

/// Specific configuration for the Matrix service.
#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    pub username: String,
    pub password: String,
    pub homeserver: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Bluesky AppView settings. Credentials are optional; the public AppView
/// serves profiles and author feeds without a session.
#[derive(Debug, Deserialize, Clone)]
pub struct BlueskyConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub app_password: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

impl Default for BlueskyConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            identifier: None,
            app_password: None,
            timeout_secs: default_request_timeout(),
        }
    }
}

fn default_api_base() -> String {
    "https://public.api.bsky.app".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

/// Where matched posts are relayed.
#[derive(Debug, Deserialize, Clone)]
pub struct RelayConfig {
    /// Room ID (`!abc:server`) or alias (`#news:server`).
    pub room: String,
}

/// Initial monitor settings. Accounts and filter values seed the runtime state;
/// the interval and per-account delay are fixed for the life of the process.
#[derive(Debug, Deserialize, Clone)]
pub struct MonitorConfig {
    #[serde(default)]
    pub accounts: Vec<String>,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_account_delay")]
    pub account_delay_ms: u64,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub mode: FilterMode,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            accounts: Vec::new(),
            poll_interval_secs: default_poll_interval(),
            account_delay_ms: default_account_delay(),
            keywords: Vec::new(),
            mode: FilterMode::default(),
            case_sensitive: false,
        }
    }
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn account_delay(&self) -> Duration {
        Duration::from_millis(self.account_delay_ms)
    }
}

fn default_poll_interval() -> u64 {
    60
}

fn default_account_delay() -> u64 {
    1000
}

/// System-level settings for the bot.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct SystemConfig {
    /// Matrix user IDs allowed to mutate the monitor.
    #[serde(default)]
    pub admin: Vec<String>,
}
