//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use thiserror::Error;

use crate::config::AppConfig;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `cache_max_size` or `cache_ttl_seconds` is 0
    /// - `max_search_results` is 0 or exceeds 50
    /// - `crawl_concurrency` is 0 or exceeds 16
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_max_size == 0 {
            return Err(ConfigError::Invalid {
                field: "cache_max_size".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.cache_ttl_seconds == 0 {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_seconds".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.max_search_results == 0 || self.max_search_results > 50 {
            return Err(ConfigError::Invalid {
                field: "max_search_results".into(),
                reason: "must be between 1 and 50".into(),
            });
        }

        if self.crawl_concurrency == 0 || self.crawl_concurrency > 16 {
            return Err(ConfigError::Invalid {
                field: "crawl_concurrency".into(),
                reason: "must be between 1 and 16".into(),
            });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.max_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must not exceed 50MB".into() });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_cache_size() {
        let config = AppConfig { cache_max_size: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "cache_max_size"));
    }

    #[test]
    fn test_validate_zero_ttl() {
        let config = AppConfig { cache_ttl_seconds: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "cache_ttl_seconds"));
    }

    #[test]
    fn test_validate_search_results_bounds() {
        let config = AppConfig { max_search_results: 0, ..Default::default() };
        assert!(config.validate().is_err());

        let config = AppConfig { max_search_results: 51, ..Default::default() };
        assert!(config.validate().is_err());

        let config = AppConfig { max_search_results: 50, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_concurrency_bounds() {
        let config = AppConfig { crawl_concurrency: 0, ..Default::default() };
        assert!(config.validate().is_err());

        let config = AppConfig { crawl_concurrency: 17, ..Default::default() };
        assert!(config.validate().is_err());

        let config = AppConfig { crawl_concurrency: 16, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));

        let config = AppConfig { timeout_ms: 301_000, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_max_bytes_bounds() {
        let config = AppConfig { max_bytes: 0, ..Default::default() };
        assert!(config.validate().is_err());

        let config = AppConfig { max_bytes: 51 * 1024 * 1024, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }
}
