use crate::domain::errors::ForecastError;
use crate::domain::forecast::{ForecastQuery, ForecastSnapshot};
use crate::domain::ports::ForecastProvider;
use std::sync::Arc;
use tracing::{info, warn};

/// Runs one refresh cycle against a prediction API.
///
/// `/health` and `/predict` must succeed. `/history` is optional: when it
/// fails the snapshot is built with `history_supported = false`.
pub struct DashboardService {
    provider: Arc<dyn ForecastProvider>,
}

impl DashboardService {
    pub fn new(provider: Arc<dyn ForecastProvider>) -> Self {
        Self { provider }
    }

    pub async fn refresh(&self, query: &ForecastQuery) -> Result<ForecastSnapshot, ForecastError> {
        info!(
            "Refreshing forecast: asset={}, horizon={}, history={}",
            query.asset, query.horizon, query.window
        );

        match self.provider.health().await {
            Ok(status) if status.ok => {}
            Ok(status) => {
                warn!("Prediction API unhealthy: {}", status.detail);
                return Err(ForecastError::Unhealthy {
                    detail: status.detail,
                });
            }
            Err(e) => {
                warn!("Prediction API health check failed: {}", e);
                return Err(ForecastError::Unhealthy {
                    detail: e.to_string(),
                });
            }
        }

        let batch = self.provider.predict(query.asset, query.horizon).await?;

        let history = match self.provider.history(query.asset, query.window).await {
            Ok(points) => Some(points),
            Err(e) => {
                warn!("History unavailable, showing forecast only: {}", e);
                None
            }
        };

        let snapshot = ForecastSnapshot::new(
            query,
            batch.last_date,
            batch.last_value,
            batch.points,
            history,
        );

        info!(
            "Forecast ready: {} predicted, {} actual points",
            snapshot.predictions.len(),
            snapshot.history.len()
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forecast::{Asset, HistoryWindow, Horizon};
    use crate::infrastructure::mock::{MockForecastProvider, MockRequest};
    use std::sync::atomic::Ordering;

    fn query(asset: Asset, horizon: u32) -> ForecastQuery {
        ForecastQuery {
            asset,
            horizon: Horizon::new(horizon).unwrap(),
            window: HistoryWindow::Days90,
        }
    }

    #[tokio::test]
    async fn test_refresh_calls_endpoints_in_order() {
        let mock = Arc::new(MockForecastProvider::new());
        let service = DashboardService::new(mock.clone());

        let snapshot = service.refresh(&query(Asset::BtcUsd, 5)).await.unwrap();

        assert_eq!(snapshot.asset, Asset::BtcUsd);
        assert_eq!(snapshot.predictions.len(), 5);
        assert_eq!(snapshot.history.len(), 90);
        assert!(snapshot.history_supported);
        assert_eq!(
            mock.requests(),
            vec![
                MockRequest::Health,
                MockRequest::Predict {
                    asset: Asset::BtcUsd,
                    horizon: Horizon::new(5).unwrap()
                },
                MockRequest::History {
                    asset: Asset::BtcUsd,
                    window: HistoryWindow::Days90
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_unhealthy_api_stops_refresh() {
        let mock = Arc::new(MockForecastProvider::new());
        mock.unhealthy.store(true, Ordering::SeqCst);
        let service = DashboardService::new(mock.clone());

        let result = service.refresh(&query(Asset::EthUsd, 7)).await;

        assert!(matches!(result, Err(ForecastError::Unhealthy { .. })));
        assert_eq!(mock.requests(), vec![MockRequest::Health]);
    }

    #[tokio::test]
    async fn test_predict_failure_is_an_error() {
        let mock = Arc::new(MockForecastProvider::new());
        mock.fail_predict.store(true, Ordering::SeqCst);
        let service = DashboardService::new(mock);

        let result = service.refresh(&query(Asset::EthUsd, 7)).await;
        assert!(matches!(
            result,
            Err(ForecastError::HttpStatus { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_history_degrades_gracefully() {
        let mock = Arc::new(MockForecastProvider::new());
        mock.fail_history.store(true, Ordering::SeqCst);
        let service = DashboardService::new(mock);

        let snapshot = service.refresh(&query(Asset::Sl20Syn, 7)).await.unwrap();

        assert!(!snapshot.history_supported);
        assert!(snapshot.history.is_empty());
        assert_eq!(snapshot.predictions.len(), 7);
    }

    #[tokio::test]
    async fn test_overlong_prediction_is_truncated_to_horizon() {
        let mock = Arc::new(MockForecastProvider::new());
        mock.overshoot.store(6, Ordering::SeqCst);
        let service = DashboardService::new(mock);

        let snapshot = service.refresh(&query(Asset::BtcUsd, 3)).await.unwrap();
        assert_eq!(snapshot.predictions.len(), 3);
    }
}
