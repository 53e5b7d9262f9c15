use crate::domain::errors::ForecastError;
use crate::domain::forecast::{Asset, HistoryWindow, Horizon, PricePoint};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Result of the `/health` probe
#[derive(Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub ok: bool,
    pub detail: String,
}

/// Payload of `/predict`, already normalised to calendar dates
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionBatch {
    pub last_date: Option<NaiveDate>,
    pub last_value: Option<f64>,
    pub points: Vec<PricePoint>,
}

// Need async_trait for async functions in traits
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn health(&self) -> Result<HealthStatus, ForecastError>;
    async fn predict(&self, asset: Asset, horizon: Horizon)
    -> Result<PredictionBatch, ForecastError>;
    async fn history(
        &self,
        asset: Asset,
        window: HistoryWindow,
    ) -> Result<Vec<PricePoint>, ForecastError>;
}
