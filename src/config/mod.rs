//! Configuration module for forecastdash.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: API connection, default query, auto-refresh and export.

mod api_config;
mod export_config;
mod refresh_config;

pub use api_config::{ApiEnvConfig, DEFAULT_API_BASE_URL};
pub use export_config::ExportEnvConfig;
pub use refresh_config::{MAX_REFRESH_SECS, MIN_REFRESH_SECS, RefreshEnvConfig, clamp_interval};

use crate::domain::forecast::{Asset, ForecastQuery, HistoryWindow, Horizon};
use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Main application configuration.
#[derive(Debug, Clone, Default)]
pub struct DashboardConfig {
    pub api: ApiEnvConfig,
    pub default_query: ForecastQuery,
    pub refresh: RefreshEnvConfig,
    pub export: ExportEnvConfig,
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    pub fn from_lookup(var: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let api = ApiEnvConfig::from_lookup(var).context("Failed to load API config")?;
        let refresh = RefreshEnvConfig::from_lookup(var).context("Failed to load refresh config")?;
        let export = ExportEnvConfig::from_lookup(var);

        let asset = match var("FORECAST_DEFAULT_ASSET") {
            Some(raw) => Asset::from_str(&raw)?,
            None => Asset::default(),
        };

        let horizon = match var("FORECAST_DEFAULT_HORIZON") {
            Some(raw) => {
                let steps = raw
                    .trim()
                    .parse::<u32>()
                    .with_context(|| format!("FORECAST_DEFAULT_HORIZON must be a number, got '{}'", raw))?;
                Horizon::new(steps)?
            }
            None => Horizon::default(),
        };

        let window = match var("FORECAST_HISTORY_DAYS") {
            Some(raw) => {
                let days = raw
                    .trim()
                    .parse::<u32>()
                    .with_context(|| format!("FORECAST_HISTORY_DAYS must be a number, got '{}'", raw))?;
                HistoryWindow::from_days(days)?
            }
            None => HistoryWindow::default(),
        };

        Ok(Self {
            api,
            default_query: ForecastQuery {
                asset,
                horizon,
                window,
            },
            refresh,
            export,
        })
    }
}
