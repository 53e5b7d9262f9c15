use crate::domain::errors::ForecastError;
use crate::domain::forecast::{Asset, HistoryWindow, Horizon, PricePoint};
use crate::domain::ports::{ForecastProvider, HealthStatus, PredictionBatch};
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::info;

/// A call received by the mock, in arrival order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockRequest {
    Health,
    Predict { asset: Asset, horizon: Horizon },
    History { asset: Asset, window: HistoryWindow },
}

/// In-memory prediction API with deterministic series.
///
/// History ends on `anchor`, predictions start the day after it. Each endpoint
/// can be switched to fail independently.
pub struct MockForecastProvider {
    anchor: NaiveDate,
    requests: Mutex<Vec<MockRequest>>,
    pub unhealthy: AtomicBool,
    pub fail_predict: AtomicBool,
    pub fail_history: AtomicBool,
    /// Extra prediction points returned beyond the requested horizon
    pub overshoot: AtomicUsize,
}

impl MockForecastProvider {
    pub fn new() -> Self {
        Self::with_anchor(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap_or_default())
    }

    pub fn with_anchor(anchor: NaiveDate) -> Self {
        Self {
            anchor,
            requests: Mutex::new(Vec::new()),
            unhealthy: AtomicBool::new(false),
            fail_predict: AtomicBool::new(false),
            fail_history: AtomicBool::new(false),
            overshoot: AtomicUsize::new(0),
        }
    }

    pub fn requests(&self) -> Vec<MockRequest> {
        match self.requests.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn predict_requests(&self) -> Vec<(Asset, Horizon)> {
        self.requests()
            .into_iter()
            .filter_map(|r| match r {
                MockRequest::Predict { asset, horizon } => Some((asset, horizon)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, request: MockRequest) {
        match self.requests.lock() {
            Ok(mut guard) => guard.push(request),
            Err(poisoned) => poisoned.into_inner().push(request),
        }
    }

    /// Base level per asset so series are distinguishable in tests
    pub fn base_value(asset: Asset) -> f64 {
        match asset {
            Asset::Sl20Syn => 1_250.0,
            Asset::BtcUsd => 64_000.0,
            Asset::EthUsd => 3_100.0,
        }
    }
}

impl Default for MockForecastProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ForecastProvider for MockForecastProvider {
    async fn health(&self) -> Result<HealthStatus, ForecastError> {
        self.record(MockRequest::Health);
        if self.unhealthy.load(Ordering::SeqCst) {
            return Ok(HealthStatus {
                ok: false,
                detail: r#"{"status":"degraded"}"#.to_string(),
            });
        }
        Ok(HealthStatus {
            ok: true,
            detail: r#"{"status":"ok"}"#.to_string(),
        })
    }

    async fn predict(
        &self,
        asset: Asset,
        horizon: Horizon,
    ) -> Result<PredictionBatch, ForecastError> {
        self.record(MockRequest::Predict { asset, horizon });
        if self.fail_predict.load(Ordering::SeqCst) {
            return Err(ForecastError::HttpStatus {
                endpoint: "/predict".to_string(),
                status: 500,
                body: "mock failure".to_string(),
            });
        }

        let base = Self::base_value(asset);
        let count = horizon.steps() as usize + self.overshoot.load(Ordering::SeqCst);
        let points = (1..=count as u64)
            .filter_map(|i| {
                self.anchor
                    .checked_add_days(Days::new(i))
                    .map(|date| PricePoint::new(date, base + i as f64))
            })
            .collect();

        info!("MockForecastProvider: predict {} x{}", asset, count);
        Ok(PredictionBatch {
            last_date: Some(self.anchor),
            last_value: Some(base),
            points,
        })
    }

    async fn history(
        &self,
        asset: Asset,
        window: HistoryWindow,
    ) -> Result<Vec<PricePoint>, ForecastError> {
        self.record(MockRequest::History { asset, window });
        if self.fail_history.load(Ordering::SeqCst) {
            return Err(ForecastError::HttpStatus {
                endpoint: "/history".to_string(),
                status: 404,
                body: "Not Found".to_string(),
            });
        }

        let base = Self::base_value(asset);
        let days = window.days() as u64;
        Ok((0..days)
            .rev()
            .filter_map(|back| {
                self.anchor
                    .checked_sub_days(Days::new(back))
                    .map(|date| PricePoint::new(date, base - back as f64 * 0.5))
            })
            .collect())
    }
}
