//! Configuration handling

use crate::state::ResetTimer;
use crate::transport::{DEFAULT_ENDPOINT_URL, DEFAULT_RELAY_URL};
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default bind address for `contact-tui serve`
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";

/// Which backend receives submissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Third-party form relay
    #[default]
    Relay,
    /// Same-origin `/api/contact` endpoint
    Endpoint,
}

impl FromStr for TransportKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relay" => Ok(Self::Relay),
            "endpoint" => Ok(Self::Endpoint),
            other => Err(ConfigError::UnknownTransport(other.to_string())),
        }
    }
}

/// One line of contact details shown beside the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEntry {
    pub title: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error(
        "the relay transport needs an access key: set access_key in the config file \
         (contact-tui init-config creates it) or export CONTACT_TUI_ACCESS_KEY"
    )]
    MissingAccessKey,
    #[error("unknown transport '{0}', expected 'relay' or 'endpoint'")]
    UnknownTransport(String),
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),
    #[error("invalid request timeout '{0}', expected whole seconds")]
    InvalidTimeout(String),
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ContactConfig {
    /// Backend that receives submissions
    pub transport: Option<TransportKind>,
    /// Form relay address
    pub relay_url: Option<String>,
    /// Access key sent with every relay submission
    pub access_key: Option<String>,
    /// Contact endpoint address (endpoint transport)
    pub endpoint_url: Option<String>,
    /// Listen address for `serve`
    pub bind_address: Option<String>,
    /// Request timeout in seconds; no timeout when unset
    pub request_timeout_secs: Option<u64>,
    /// How long the success view stays up, in seconds (default 5)
    pub success_window_secs: Option<u64>,
    /// Contact details listed in the sidebar
    #[serde(default)]
    pub contact_entries: Vec<ContactEntry>,
}

impl ContactConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "contact-tui", "contact-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Directory for the log file written while the form is on screen
    pub fn log_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "contact-tui", "contact-tui")
            .map(|dirs| dirs.data_local_dir().to_path_buf())
    }

    /// Load the config file (if any), then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: ContactConfig = serde_json::from_str(&content)?;
                tracing::debug!(path = %path.display(), "Loaded config file");
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to file, returning where it was written
    pub fn save(&self) -> Result<Option<PathBuf>> {
        let Some(path) = Self::config_path() else {
            return Ok(None);
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(Some(path))
    }

    /// Override file values with `CONTACT_TUI_*` variables
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(kind) = get("CONTACT_TUI_TRANSPORT") {
            self.transport = Some(kind.parse()?);
        }
        if let Some(url) = get("CONTACT_TUI_RELAY_URL") {
            self.relay_url = Some(url);
        }
        if let Some(key) = get("CONTACT_TUI_ACCESS_KEY") {
            self.access_key = Some(key);
        }
        if let Some(url) = get("CONTACT_TUI_ENDPOINT_URL") {
            self.endpoint_url = Some(url);
        }
        if let Some(bind) = get("CONTACT_TUI_BIND") {
            self.bind_address = Some(bind);
        }
        if let Some(secs) = get("CONTACT_TUI_TIMEOUT_SECS") {
            let parsed = secs
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(secs.clone()))?;
            self.request_timeout_secs = Some(parsed);
        }
        Ok(())
    }

    pub fn transport_kind(&self) -> TransportKind {
        self.transport.unwrap_or_default()
    }

    pub fn relay_url(&self) -> &str {
        self.relay_url.as_deref().unwrap_or(DEFAULT_RELAY_URL)
    }

    pub fn endpoint_url(&self) -> &str {
        self.endpoint_url.as_deref().unwrap_or(DEFAULT_ENDPOINT_URL)
    }

    pub fn require_access_key(&self) -> Result<&str, ConfigError> {
        self.access_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingAccessKey)
    }

    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        let raw = self.bind_address.as_deref().unwrap_or(DEFAULT_BIND_ADDRESS);
        raw.parse()
            .map_err(|_| ConfigError::InvalidBindAddress(raw.to_string()))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn success_window(&self) -> Duration {
        self.success_window_secs
            .map(Duration::from_secs)
            .unwrap_or(ResetTimer::SUCCESS_WINDOW)
    }
}
