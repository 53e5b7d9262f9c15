use crate::config::ApiEnvConfig;
use crate::domain::errors::ForecastError;
use crate::domain::forecast::{Asset, HistoryWindow, Horizon, PricePoint, parse_api_date};
use crate::domain::ports::{ForecastProvider, HealthStatus, PredictionBatch};
use crate::infrastructure::core::{HttpClientFactory, build_url_with_query};
use crate::infrastructure::response_cache::ResponseCache;
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info};

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    last_date: Option<String>,
    #[serde(default)]
    last_value: Option<f64>,
    #[serde(default)]
    predictions: Vec<PredictionRow>,
}

#[derive(Debug, Deserialize)]
struct PredictionRow {
    date: String,
    yhat: f64,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    history: Vec<HistoryRow>,
}

#[derive(Debug, Deserialize)]
struct HistoryRow {
    date: String,
    close: f64,
}

/// Prediction API adapter (`/health`, `/predict`, `/history`)
pub struct HttpForecastProvider {
    client: ClientWithMiddleware,
    base_url: String,
    cache: ResponseCache,
}

impl HttpForecastProvider {
    pub fn new(config: &ApiEnvConfig) -> Self {
        Self {
            client: HttpClientFactory::create_client(config),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache: ResponseCache::new(config.cache_ttl),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Drops cached responses so the next call hits the API
    pub fn invalidate_cache(&self) {
        self.cache.clear();
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, ForecastError> {
        let url = build_url_with_query(&self.base_url, endpoint, params)?;
        let key = url.to_string();

        let body = match self.cache.get(&key) {
            Some(cached) => cached,
            None => {
                debug!("HttpForecastProvider: GET {}", key);
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| ForecastError::network(endpoint, e))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let error_text = response.text().await.unwrap_or_default();
                    error!(
                        "HttpForecastProvider: API error {} for {}: {}",
                        status, endpoint, error_text
                    );
                    return Err(ForecastError::HttpStatus {
                        endpoint: endpoint.to_string(),
                        status: status.as_u16(),
                        body: error_text,
                    });
                }

                let text = response
                    .text()
                    .await
                    .map_err(|e| ForecastError::network(endpoint, e))?;
                let body: Value = serde_json::from_str(&text)
                    .map_err(|e| ForecastError::malformed(endpoint, e))?;
                self.cache.insert(key, body.clone());
                body
            }
        };

        serde_json::from_value(body).map_err(|e| ForecastError::malformed(endpoint, e))
    }
}

#[async_trait]
impl ForecastProvider for HttpForecastProvider {
    async fn health(&self) -> Result<HealthStatus, ForecastError> {
        let body: Value = self.get_json("/health", &[]).await?;
        let ok = body.get("status").and_then(Value::as_str) == Some("ok");
        Ok(HealthStatus {
            ok,
            detail: body.to_string(),
        })
    }

    async fn predict(
        &self,
        asset: Asset,
        horizon: Horizon,
    ) -> Result<PredictionBatch, ForecastError> {
        let body: PredictResponse = self
            .get_json(
                "/predict",
                &[
                    ("asset", asset.as_str().to_string()),
                    ("horizon", horizon.steps().to_string()),
                ],
            )
            .await?;

        let last_date = body
            .last_date
            .as_deref()
            .map(parse_api_date)
            .transpose()
            .map_err(|e| ForecastError::malformed("/predict", e))?;

        let points = body
            .predictions
            .into_iter()
            .map(|row| {
                parse_api_date(&row.date)
                    .map(|date| PricePoint::new(date, row.yhat))
                    .map_err(|e| ForecastError::malformed("/predict", e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Fetched {} predictions for {} (horizon {})",
            points.len(),
            asset,
            horizon
        );

        Ok(PredictionBatch {
            last_date,
            last_value: body.last_value,
            points,
        })
    }

    async fn history(
        &self,
        asset: Asset,
        window: HistoryWindow,
    ) -> Result<Vec<PricePoint>, ForecastError> {
        let body: HistoryResponse = self
            .get_json(
                "/history",
                &[
                    ("asset", asset.as_str().to_string()),
                    ("period_days", window.days().to_string()),
                ],
            )
            .await?;

        let points = body
            .history
            .into_iter()
            .map(|row| {
                parse_api_date(&row.date)
                    .map(|date| PricePoint::new(date, row.close))
                    .map_err(|e| ForecastError::malformed("/history", e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!("Fetched {} history points for {} ({})", points.len(), asset, window);
        Ok(points)
    }
}
