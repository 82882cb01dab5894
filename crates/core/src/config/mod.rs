//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SKRY_*)
//! 2. TOML config file (if SKRY_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! The configuration is loaded once at process start and is immutable for
//! the process lifetime.

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SKRY_*)
/// 2. TOML config file (if SKRY_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Maximum number of cached results (search and crawl combined).
    ///
    /// Set via SKRY_CACHE_MAX_SIZE environment variable.
    #[serde(default = "default_cache_max_size")]
    pub cache_max_size: usize,

    /// Seconds a cached result is served before it expires.
    ///
    /// Set via SKRY_CACHE_TTL_SECONDS environment variable.
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,

    /// Maximum number of search hits returned per query.
    ///
    /// Set via SKRY_MAX_SEARCH_RESULTS environment variable.
    #[serde(default = "default_max_search_results")]
    pub max_search_results: usize,

    /// Maximum number of pages fetched concurrently per crawl batch.
    ///
    /// Set via SKRY_CRAWL_CONCURRENCY environment variable.
    #[serde(default = "default_crawl_concurrency")]
    pub crawl_concurrency: usize,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via SKRY_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via SKRY_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum bytes to fetch per page.
    ///
    /// Set via SKRY_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

fn default_cache_max_size() -> usize {
    1024
}

fn default_cache_ttl_seconds() -> u64 {
    14_400 // 4 hours
}

fn default_max_search_results() -> usize {
    8
}

fn default_crawl_concurrency() -> usize {
    4
}

fn default_user_agent() -> String {
    "skry/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_max_size: default_cache_max_size(),
            cache_ttl_seconds: default_cache_ttl_seconds(),
            max_search_results: default_max_search_results(),
            crawl_concurrency: default_crawl_concurrency(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
        }
    }
}

impl AppConfig {
    /// Request timeout as a Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SKRY_`
    /// 2. TOML file from `SKRY_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SKRY_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SKRY_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
