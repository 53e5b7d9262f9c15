//! Prediction API connection settings.

use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://crypto-and-stock.onrender.com";

/// Prediction API environment configuration
#[derive(Debug, Clone)]
pub struct ApiEnvConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub cache_ttl: Duration,
}

impl Default for ApiEnvConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(30),
        }
    }
}

impl ApiEnvConfig {
    pub fn from_lookup(var: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let base_url = var("FORECAST_API_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.base_url);
        url::Url::parse(&base_url)
            .with_context(|| format!("FORECAST_API_BASE_URL is not a valid URL: {}", base_url))?;

        let secs = |key: &str, fallback: Duration| -> Result<Duration> {
            match var(key) {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .with_context(|| format!("{} must be a number of seconds, got '{}'", key, raw)),
                None => Ok(fallback),
            }
        };

        Ok(Self {
            base_url,
            request_timeout: secs("FORECAST_REQUEST_TIMEOUT_SECS", defaults.request_timeout)?,
            connect_timeout: secs("FORECAST_CONNECT_TIMEOUT_SECS", defaults.connect_timeout)?,
            cache_ttl: secs("FORECAST_CACHE_TTL_SECS", defaults.cache_ttl)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_config_defaults() {
        let config = ApiEnvConfig::from_lookup(&|_| None).unwrap();
        assert_eq!(config.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.cache_ttl, Duration::from_secs(30));
    }

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let config = ApiEnvConfig::from_lookup(&|k| {
            (k == "FORECAST_API_BASE_URL").then(|| "http://localhost:8000/ ".to_string())
        })
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let result = ApiEnvConfig::from_lookup(&|k| {
            (k == "FORECAST_REQUEST_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }
}
