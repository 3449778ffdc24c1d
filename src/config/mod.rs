//! Configuration system (layered: code > env > config file).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::Deserialize;

use crate::error::SwarmError;

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Layered configuration for Swarm.
///
/// Resolution order:
/// 1. Explicit values (`set_api_key`, `set_base_url`, ...)
/// 2. Environment variables (`OPENAI_API_KEY`, `OPENAI_BASE_URL`,
///    `SWARM_MODEL`, `SWARM_REQUEST_TIMEOUT_SECS`, plus `.env`)
/// 3. `config.toml` in the platform config directory, or an explicit file
#[derive(Debug, Clone)]
pub struct SwarmConfig {
    api_keys: Arc<RwLock<HashMap<String, String>>>,
    base_urls: Arc<RwLock<HashMap<String, String>>>,
    default_model: Option<String>,
    request_timeout: Duration,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// On-disk form of the config file.
///
/// ```toml
/// default_model = "gpt-4o-mini"
/// request_timeout_secs = 60
///
/// [providers.openai]
/// api_key = "sk-..."
/// base_url = "https://api.openai.com/v1"
/// ```
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    default_model: Option<String>,
    request_timeout_secs: Option<u64>,
    #[serde(default)]
    providers: HashMap<String, ProviderSection>,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderSection {
    api_key: Option<String>,
    base_url: Option<String>,
}

impl SwarmConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self {
            api_keys: Arc::new(RwLock::new(HashMap::new())),
            base_urls: Arc::new(RwLock::new(HashMap::new())),
            default_model: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Default location of the config file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "swarm")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Read a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SwarmError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text).map_err(|e| {
            SwarmError::Configuration(format!("{}: {e}", path.display()))
        })
    }

    /// Parse config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, SwarmError> {
        let file: FileConfig =
            toml::from_str(text).map_err(|e| SwarmError::Configuration(e.to_string()))?;
        let mut config = Self::new();
        config.default_model = file.default_model;
        if let Some(secs) = file.request_timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        for (provider, section) in file.providers {
            if let Some(key) = section.api_key {
                config.set_api_key(&provider, key);
            }
            if let Some(url) = section.base_url {
                config.set_base_url(&provider, url);
            }
        }
        Ok(config)
    }

    /// Load from environment variables only (and `.env` if present).
    pub fn from_env() -> Self {
        let mut config = Self::new();
        config.apply_env();
        config
    }

    /// Load the config file at `path` (or the default location when it
    /// exists), then overlay the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, SwarmError> {
        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path().filter(|p| p.is_file()),
        };
        let mut config = match file {
            Some(p) => Self::from_file(p)?,
            None => Self::new(),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.set_api_key("openai", key);
        }
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            self.set_base_url("openai", url);
        }
        if let Ok(model) = std::env::var("SWARM_MODEL") {
            self.default_model = Some(model);
        }
        if let Some(secs) = std::env::var("SWARM_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.request_timeout = Duration::from_secs(secs);
        }
    }

    pub fn set_api_key(&self, provider: &str, key: String) {
        if let Ok(mut keys) = self.api_keys.write() {
            keys.insert(provider.to_string(), key);
        }
    }

    pub fn get_api_key(&self, provider: &str) -> Option<String> {
        self.api_keys.read().ok()?.get(provider).cloned()
    }

    pub fn set_base_url(&self, provider: &str, url: String) {
        if let Ok(mut urls) = self.base_urls.write() {
            urls.insert(provider.to_string(), url);
        }
    }

    pub fn get_base_url(&self, provider: &str) -> Option<String> {
        self.base_urls.read().ok()?.get(provider).cloned()
    }

    /// Check if a provider has credentials configured.
    pub fn has_credentials(&self, provider: &str) -> bool {
        self.get_api_key(provider).is_some()
    }

    /// Model that replaces every agent's own model for a run (`SWARM_MODEL`).
    ///
    /// Applied as [`RunRequest::model_override`](crate::engine::RunRequest),
    /// so handoff targets with their own model are overridden too.
    pub fn default_model(&self) -> Option<&str> {
        self.default_model.as_deref()
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
