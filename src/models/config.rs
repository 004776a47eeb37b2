//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Provider identity reported by the status endpoint
    #[serde(default)]
    pub provider: ProviderConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Background checker settings
    #[serde(default)]
    pub checker: CheckerConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.provider.name.trim().is_empty() {
            return Err(AppError::config("provider.name is empty"));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::config("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::config("http.timeout_secs must be > 0"));
        }
        if self.checker.interval_secs == 0 {
            return Err(AppError::config("checker.interval_secs must be > 0"));
        }
        if self.checker.recheck_secs == 0 {
            return Err(AppError::config("checker.recheck_secs must be > 0"));
        }
        Ok(())
    }
}

/// Provider identity settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider name shown in status responses
    #[serde(default = "defaults::provider_name")]
    pub name: String,

    /// Provider version string
    #[serde(default = "defaults::provider_version")]
    pub version: String,

    /// Project URL shown in status responses
    #[serde(default)]
    pub url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: defaults::provider_name(),
            version: defaults::provider_version(),
            url: String::new(),
        }
    }
}

/// HTTP client settings for the export fetcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Background checker cadence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Sleep between checker ticks, in seconds
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,

    /// Offset added to `next_check` after each non-throttled check, in seconds
    #[serde(default = "defaults::recheck")]
    pub recheck_secs: u64,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval(),
            recheck_secs: defaults::recheck(),
        }
    }
}

mod defaults {
    pub fn provider_name() -> String {
        "sched-provider".to_string()
    }

    pub fn provider_version() -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    pub fn user_agent() -> String {
        format!("sched-provider/{}", env!("CARGO_PKG_VERSION"))
    }

    pub fn timeout() -> u64 {
        30
    }

    // 30 minutes for both; the upstream source claimed 30 minutes while
    // sleeping 1080 s, the documented intent wins here.
    pub fn interval() -> u64 {
        1800
    }

    pub fn recheck() -> u64 {
        1800
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = Config::default();
        config.checker.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [checker]
            interval_secs = 60
            "#,
        )
        .unwrap();
        assert_eq!(config.checker.interval_secs, 60);
        assert_eq!(config.checker.recheck_secs, 1800);
        assert!(!config.http.user_agent.is_empty());
    }
}
