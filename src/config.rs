use crate::error::{DashboardError, Result};
use serde::Deserialize;
use std::fs;

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/products/";
const DEFAULT_TIMEOUT_MS: u64 = 5000;
const DEFAULT_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout applied to every catalog fetch.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Quiet period before a burst of filter updates becomes one fetch.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                base_url: default_base_url(),
                timeout_ms: default_timeout_ms(),
                debounce_ms: default_debounce_ms(),
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = "config.toml";
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            DashboardError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path, e
            ))
        })?;

        let mut config: Config = toml::from_str(&config_content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load `config.toml` when present, falling back to defaults otherwise.
    /// Env overrides apply in both cases.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default configuration: {}", e);
                let mut config = Self::default();
                config.apply_env_overrides();
                config
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("CATALOG_API_URL") {
            if !url.trim().is_empty() {
                self.catalog.base_url = url;
            }
        }
    }
}
