use crate::config::ApiEnvConfig;
use crate::domain::errors::ForecastError;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use url::Url;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates the HTTP client used for every prediction API call.
    ///
    /// Failed requests are reported as-is; nothing is retried.
    pub fn create_client(config: &ApiEnvConfig) -> ClientWithMiddleware {
        let client = Client::builder()
            .pool_max_idle_per_host(5)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!("forecastdash/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        ClientBuilder::new(client).build()
    }
}

/// Joins `base_url` and `path` and appends percent-encoded query parameters.
///
/// reqwest-middleware does not expose `.query()`, so the URL is built up front.
pub fn build_url_with_query<K, V>(
    base_url: &str,
    path: &str,
    params: &[(K, V)],
) -> Result<Url, ForecastError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let mut url = Url::parse(&joined).map_err(|e| ForecastError::InvalidParameter {
        name: "API base URL",
        reason: format!("'{}': {}", base_url, e),
    })?;

    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in params {
            pairs.append_pair(k.as_ref(), v.as_ref());
        }
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_with_query() {
        let url = build_url_with_query(
            "https://api.example.com/",
            "/predict",
            &[("asset", "BTC-USD"), ("horizon", "7")],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/predict?asset=BTC-USD&horizon=7"
        );
    }

    #[test]
    fn test_build_url_encodes_values() {
        let url = build_url_with_query("http://localhost:8000", "history", &[("asset", "A B&C")])
            .unwrap();
        assert_eq!(url.query(), Some("asset=A+B%26C"));
    }

    #[test]
    fn test_build_url_without_params() {
        let empty: [(&str, &str); 0] = [];
        let url = build_url_with_query("http://localhost:8000", "health", &empty).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/health");
    }

    #[test]
    fn test_invalid_base_url() {
        let empty: [(&str, &str); 0] = [];
        assert!(build_url_with_query("not a url", "health", &empty).is_err());
    }
}
