use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::common::constants::{self, API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECONDS};
use crate::common::error::{DashboardError, Result};

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default = "default_views")]
    pub views: Vec<ViewConfig>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// One dashboard view: a name and the endpoint it is fed from
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ViewConfig {
    pub name: String,
    pub endpoint: String,
    /// Overrides `api.base_url` for catalogs hosted elsewhere
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_views() -> Vec<ViewConfig> {
    constants::default_views()
        .into_iter()
        .map(|(name, endpoint)| ViewConfig {
            name: name.to_string(),
            endpoint: endpoint.to_string(),
            base_url: None,
        })
        .collect()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            views: default_views(),
        }
    }
}

impl Config {
    /// Load `path` if it exists, otherwise fall back to the built-in views
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(path).map_err(|e| {
            DashboardError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config = Self::from_toml(&config_content)?;
        info!("Loaded {} views from {}", config.views.len(), path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.views.is_empty() {
            return Err(DashboardError::Config("at least one [[views]] entry is required".to_string()));
        }
        Ok(config)
    }

    pub fn view(&self, name: &str) -> Option<&ViewConfig> {
        self.views.iter().find(|v| v.name == name)
    }

    /// Base URL a view's requests go to
    pub fn base_url_for<'a>(&'a self, view: &'a ViewConfig) -> &'a str {
        view.base_url.as_deref().unwrap_or(&self.api.base_url)
    }
}

/// Read the API key from the environment (after `.env` has been loaded)
pub fn api_key() -> Result<String> {
    let key = std::env::var(API_KEY_ENV)?;
    if key.trim().is_empty() {
        return Err(DashboardError::Config(format!("{API_KEY_ENV} is set but empty")));
    }
    Ok(key)
}
