//! Configuration management for trendwatch
//!
//! Credentials and request settings come from three layers, later ones
//! winning: built-in defaults, the config file at
//! ~/.config/trendwatch/config.toml, and the process environment
//! (after loading any `.env` file).

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env::VarError;
use std::path::{Path, PathBuf};

pub const YOUTUBE_API_KEY_VAR: &str = "YOUTUBE_API_KEY";
pub const TWITCH_CLIENT_ID_VAR: &str = "TWITCH_CLIENT_ID";
pub const TWITCH_CLIENT_SECRET_VAR: &str = "TWITCH_CLIENT_SECRET";
pub const REGION_VAR: &str = "TRENDWATCH_REGION";
pub const TIMEOUT_VAR: &str = "TRENDWATCH_TIMEOUT_SECS";

const DEFAULT_REGION: &str = "US";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration, handed to each platform client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub youtube_api_key: Option<String>,
    pub twitch_client_id: Option<String>,
    pub twitch_client_secret: Option<String>,
    /// Region for the YouTube most-popular chart
    pub region_code: String,
    /// Per-request HTTP timeout
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            youtube_api_key: None,
            twitch_client_id: None,
            twitch_client_secret: None,
            region_code: DEFAULT_REGION.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Get config file path (~/.config/trendwatch/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("trendwatch").join("config.toml"))
    }

    /// Load `.env`, the config file (default location or `path`), then the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let file = match path {
            Some(p) => Self::read_file(p)?,
            None => Self::path()
                .filter(|p| p.exists())
                .map(|p| Self::read_file(&p))
                .transpose()?
                .unwrap_or_default(),
        };

        Ok(file.with_lookup(|key| std::env::var(key)))
    }

    /// Parse a TOML config file
    pub fn read_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = toml::from_str(&text)?;
        Ok(config)
    }

    /// Overlay values from `lookup` (normally `std::env::var`) onto `self`.
    ///
    /// Empty values count as unset.
    pub fn with_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let get = |key: &str| lookup(key).ok().filter(|v| !v.trim().is_empty());

        if let Some(key) = get(YOUTUBE_API_KEY_VAR) {
            self.youtube_api_key = Some(key);
        }
        if let Some(id) = get(TWITCH_CLIENT_ID_VAR) {
            self.twitch_client_id = Some(id);
        }
        if let Some(secret) = get(TWITCH_CLIENT_SECRET_VAR) {
            self.twitch_client_secret = Some(secret);
        }
        if let Some(region) = get(REGION_VAR) {
            self.region_code = region.trim().to_uppercase();
        }
        if let Some(raw) = get(TIMEOUT_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.request_timeout_secs = secs,
                _ => tracing::warn!(
                    var = TIMEOUT_VAR,
                    value = %raw,
                    "Ignoring invalid timeout, using {}s",
                    self.request_timeout_secs
                ),
            }
        }

        self
    }

    /// Build from `lookup` alone, ignoring any config file
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        Self::default().with_lookup(lookup)
    }

    /// YouTube API key, if set and non-empty
    pub fn youtube_api_key(&self) -> Option<&str> {
        non_empty(&self.youtube_api_key)
    }

    /// Twitch client id and secret, only when both are set
    pub fn twitch_credentials(&self) -> Option<(&str, &str)> {
        Some((
            non_empty(&self.twitch_client_id)?,
            non_empty(&self.twitch_client_secret)?,
        ))
    }

    /// Which settings are present, without revealing secrets
    pub fn status(&self) -> ConfigStatus {
        ConfigStatus {
            youtube_api_key: self.youtube_api_key().is_some(),
            twitch_client_id: non_empty(&self.twitch_client_id).is_some(),
            twitch_client_secret: non_empty(&self.twitch_client_secret).is_some(),
            region_code: self.region_code.clone(),
            request_timeout_secs: self.request_timeout_secs,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Credential presence report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigStatus {
    pub youtube_api_key: bool,
    pub twitch_client_id: bool,
    pub twitch_client_secret: bool,
    pub region_code: String,
    pub request_timeout_secs: u64,
}
