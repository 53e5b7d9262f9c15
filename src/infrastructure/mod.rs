pub mod core;
pub mod csv_export;
pub mod mock;
pub mod prediction_api;
pub mod response_cache;

pub use self::core::HttpClientFactory;
pub use mock::MockForecastProvider;
pub use prediction_api::HttpForecastProvider;
pub use response_cache::ResponseCache;
