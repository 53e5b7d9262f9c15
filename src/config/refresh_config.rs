//! Auto-refresh settings.

use anyhow::{Context, Result};
use std::time::Duration;

pub const MIN_REFRESH_SECS: u64 = 10;
pub const MAX_REFRESH_SECS: u64 = 600;

#[derive(Debug, Clone)]
pub struct RefreshEnvConfig {
    pub auto_refresh: bool,
    pub interval: Duration,
}

impl Default for RefreshEnvConfig {
    fn default() -> Self {
        Self {
            auto_refresh: true,
            interval: Duration::from_secs(60),
        }
    }
}

impl RefreshEnvConfig {
    pub fn from_lookup(var: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let auto_refresh = match var("FORECAST_AUTO_REFRESH") {
            Some(raw) => raw
                .trim()
                .to_lowercase()
                .parse::<bool>()
                .with_context(|| format!("FORECAST_AUTO_REFRESH must be true/false, got '{}'", raw))?,
            None => true,
        };

        let secs = match var("FORECAST_REFRESH_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("FORECAST_REFRESH_SECS must be a number, got '{}'", raw))?,
            None => 60,
        };

        Ok(Self {
            auto_refresh,
            interval: clamp_interval(secs),
        })
    }
}

/// Keeps the refresh interval inside the range the controls allow
pub fn clamp_interval(secs: u64) -> Duration {
    Duration::from_secs(secs.clamp(MIN_REFRESH_SECS, MAX_REFRESH_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_defaults() {
        let config = RefreshEnvConfig::from_lookup(&|_| None).unwrap();
        assert!(config.auto_refresh);
        assert_eq!(config.interval, Duration::from_secs(60));
    }

    #[test]
    fn test_interval_is_clamped() {
        let config = RefreshEnvConfig::from_lookup(&|k| {
            (k == "FORECAST_REFRESH_SECS").then(|| "2".to_string())
        })
        .unwrap();
        assert_eq!(config.interval, Duration::from_secs(MIN_REFRESH_SECS));
        assert_eq!(clamp_interval(10_000), Duration::from_secs(MAX_REFRESH_SECS));
    }
}
