use forecastdash::application::dashboard_service::DashboardService;
use forecastdash::config::ApiEnvConfig;
use forecastdash::domain::errors::ForecastError;
use forecastdash::domain::forecast::{Asset, ForecastQuery, HistoryWindow, Horizon};
use forecastdash::domain::ports::ForecastProvider;
use forecastdash::infrastructure::HttpForecastProvider;
use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn provider(server: &MockServer, cache_ttl: Duration) -> HttpForecastProvider {
    let config = ApiEnvConfig {
        base_url: server.base_url(),
        cache_ttl,
        ..ApiEnvConfig::default()
    };
    HttpForecastProvider::new(&config)
}

fn predict_body() -> serde_json::Value {
    json!({
        "last_date": "2025-03-01",
        "last_value": 100.0,
        "predictions": [
            {"date": "2025-03-02", "yhat": 101.5},
            {"date": "2025-03-03T00:00:00", "yhat": 102.0},
            {"date": "2025-03-04", "yhat": 99.0}
        ]
    })
}

#[tokio::test]
async fn test_predict_sends_asset_and_horizon() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/predict")
                .query_param("asset", "BTC-USD")
                .query_param("horizon", "3");
            then.status(200).json_body(predict_body());
        })
        .await;

    let api = provider(&server, Duration::ZERO);
    let batch = api
        .predict(Asset::BtcUsd, Horizon::new(3).unwrap())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(batch.points.len(), 3);
    assert_eq!(batch.last_value, Some(100.0));
    assert_eq!(batch.points[1].date.to_string(), "2025-03-03");
}

#[tokio::test]
async fn test_history_sends_period_days() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/history")
                .query_param("asset", "SL20_SYN")
                .query_param("period_days", "180");
            then.status(200).json_body(json!({
                "history": [
                    {"date": "2025-02-27", "close": 98.0},
                    {"date": "2025-02-28", "close": 99.5}
                ]
            }));
        })
        .await;

    let api = provider(&server, Duration::ZERO);
    let history = api
        .history(Asset::Sl20Syn, HistoryWindow::Days180)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].value, 99.5);
}

#[tokio::test]
async fn test_server_error_is_reported_with_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/predict");
            then.status(500).body("model not loaded");
        })
        .await;

    let api = provider(&server, Duration::ZERO);
    let err = api
        .predict(Asset::EthUsd, Horizon::default())
        .await
        .unwrap_err();

    match err {
        ForecastError::HttpStatus { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "model not loaded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_json_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/predict");
            then.status(200).body("<html>maintenance</html>");
        })
        .await;

    let api = provider(&server, Duration::ZERO);
    let err = api
        .predict(Asset::BtcUsd, Horizon::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ForecastError::MalformedPayload { .. }));
}

#[tokio::test]
async fn test_unparseable_date_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/predict");
            then.status(200).json_body(json!({
                "last_date": "2025-03-01",
                "last_value": 1.0,
                "predictions": [{"date": "next tuesday", "yhat": 2.0}]
            }));
        })
        .await;

    let api = provider(&server, Duration::ZERO);
    let err = api
        .predict(Asset::BtcUsd, Horizon::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ForecastError::MalformedPayload { .. }));
}

#[tokio::test]
async fn test_cached_response_is_reused_within_ttl() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/predict");
            then.status(200).json_body(predict_body());
        })
        .await;

    let api = provider(&server, Duration::from_secs(30));
    let horizon = Horizon::new(3).unwrap();
    api.predict(Asset::BtcUsd, horizon).await.unwrap();
    api.predict(Asset::BtcUsd, horizon).await.unwrap();
    mock.assert_hits_async(1).await;

    api.invalidate_cache();
    api.predict(Asset::BtcUsd, horizon).await.unwrap();
    mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn test_unhealthy_api_stops_refresh() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/health");
            then.status(200).json_body(json!({"status": "starting"}));
        })
        .await;
    let predict = server
        .mock_async(|when, then| {
            when.method(GET).path("/predict");
            then.status(200).json_body(predict_body());
        })
        .await;

    let service = DashboardService::new(Arc::new(provider(&server, Duration::ZERO)));
    let err = service.refresh(&ForecastQuery::default()).await.unwrap_err();

    assert!(matches!(err, ForecastError::Unhealthy { .. }));
    predict.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_missing_history_endpoint_still_shows_forecast() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/health");
            then.status(200).json_body(json!({"status": "ok"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/predict");
            then.status(200).json_body(predict_body());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/history");
            then.status(404).body("Not Found");
        })
        .await;

    let service = DashboardService::new(Arc::new(provider(&server, Duration::ZERO)));
    let query = ForecastQuery {
        asset: Asset::BtcUsd,
        horizon: Horizon::new(2).unwrap(),
        window: HistoryWindow::Days90,
    };
    let snapshot = service.refresh(&query).await.unwrap();

    assert!(!snapshot.history_supported);
    assert!(snapshot.history.is_empty());
    // Horizon bounds the series even if the API returns more
    assert_eq!(snapshot.predictions.len(), 2);
}
