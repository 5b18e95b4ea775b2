use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::chart::Viewport;

pub const DEFAULT_DEBOUNCE_MS: u64 = 800;
pub const DEFAULT_ROW_CAP: usize = 100;

const ENV_API_URL: &str = "FINANCE_TRACKER_API_URL";
const ENV_API_KEY: &str = "FINANCE_TRACKER_API_KEY";
const ENV_OWNER_ID: &str = "FINANCE_TRACKER_OWNER_ID";
const ENV_DEBOUNCE_MS: &str = "FINANCE_TRACKER_DEBOUNCE_MS";
const ENV_ROW_CAP: &str = "FINANCE_TRACKER_ROW_CAP";

/// Runtime configuration for the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the backend, e.g. `"https://project.example.co"`.
    pub api_url: String,

    /// Public (anon) API key sent with every request.
    pub api_key: String,

    /// Identity of the signed-in user; rows are filtered by it.
    pub owner_id: String,

    /// Quiet period before a committed range is fetched.
    pub debounce_ms: u64,

    /// Maximum rows returned per fetch.
    pub row_cap: usize,

    pub viewport: Viewport,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:54321".to_string(),
            api_key: String::new(),
            owner_id: String::new(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            row_cap: DEFAULT_ROW_CAP,
            viewport: Viewport::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json)
            .map_err(|e| CoreError::Config(format!("Failed to parse settings: {e}")))
    }

    /// Defaults overlaid with any `FINANCE_TRACKER_*` environment variables.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        if let Some(url) = lookup(ENV_API_URL) {
            settings.api_url = url;
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            settings.api_key = key;
        }
        if let Some(owner) = lookup(ENV_OWNER_ID) {
            settings.owner_id = owner;
        }
        if let Some(ms) = lookup(ENV_DEBOUNCE_MS) {
            settings.debounce_ms = ms.trim().parse().map_err(|_| {
                CoreError::Config(format!("{ENV_DEBOUNCE_MS} must be an integer, got '{ms}'"))
            })?;
        }
        if let Some(cap) = lookup(ENV_ROW_CAP) {
            settings.row_cap = cap.trim().parse().map_err(|_| {
                CoreError::Config(format!("{ENV_ROW_CAP} must be an integer, got '{cap}'"))
            })?;
        }
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.owner_id.trim().is_empty() {
            return Err(CoreError::Config("owner_id must not be empty".into()));
        }
        if self.row_cap == 0 {
            return Err(CoreError::Config("row_cap must be at least 1".into()));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(CoreError::Config(format!(
                "api_url must start with http:// or https://, got '{}'",
                self.api_url
            )));
        }
        Ok(())
    }

    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}
