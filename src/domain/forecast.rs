use crate::domain::errors::ForecastError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Assets the prediction API has trained models for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Asset {
    #[default]
    #[serde(rename = "SL20_SYN")]
    Sl20Syn,
    #[serde(rename = "BTC-USD")]
    BtcUsd,
    #[serde(rename = "ETH-USD")]
    EthUsd,
}

impl Asset {
    pub const ALL: [Asset; 3] = [Asset::Sl20Syn, Asset::BtcUsd, Asset::EthUsd];

    /// Identifier sent as the `asset` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sl20Syn => "SL20_SYN",
            Self::BtcUsd => "BTC-USD",
            Self::EthUsd => "ETH-USD",
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Asset {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Asset::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ForecastError::InvalidParameter {
                name: "asset",
                reason: format!(
                    "unknown asset '{}', expected one of SL20_SYN, BTC-USD, ETH-USD",
                    s
                ),
            })
    }
}

/// Number of future steps the API is asked to predict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Horizon(u32);

impl Horizon {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 14;

    pub fn new(steps: u32) -> Result<Self, ForecastError> {
        if (Self::MIN..=Self::MAX).contains(&steps) {
            Ok(Self(steps))
        } else {
            Err(ForecastError::InvalidParameter {
                name: "horizon",
                reason: format!(
                    "must be between {} and {}, got {}",
                    Self::MIN,
                    Self::MAX,
                    steps
                ),
            })
        }
    }

    pub fn clamped(steps: u32) -> Self {
        Self(steps.clamp(Self::MIN, Self::MAX))
    }

    pub fn steps(&self) -> u32 {
        self.0
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self(7)
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Length of the actual series requested from `/history`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HistoryWindow {
    Days90,
    Days180,
    #[default]
    Days365,
    Days730,
}

impl HistoryWindow {
    pub const ALL: [HistoryWindow; 4] = [
        HistoryWindow::Days90,
        HistoryWindow::Days180,
        HistoryWindow::Days365,
        HistoryWindow::Days730,
    ];

    pub fn days(&self) -> u32 {
        match self {
            Self::Days90 => 90,
            Self::Days180 => 180,
            Self::Days365 => 365,
            Self::Days730 => 730,
        }
    }

    pub fn from_days(days: u32) -> Result<Self, ForecastError> {
        HistoryWindow::ALL
            .into_iter()
            .find(|w| w.days() == days)
            .ok_or_else(|| ForecastError::InvalidParameter {
                name: "history window",
                reason: format!("{} days is not one of 90, 180, 365, 730", days),
            })
    }
}

impl fmt::Display for HistoryWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} days", self.days())
    }
}

/// Parameters of a single refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForecastQuery {
    pub asset: Asset,
    pub horizon: Horizon,
    pub window: HistoryWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Everything rendered by one refresh cycle. Discarded on the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSnapshot {
    pub asset: Asset,
    pub horizon: Horizon,
    pub last_date: Option<NaiveDate>,
    pub last_value: Option<f64>,
    pub predictions: Vec<PricePoint>,
    pub history: Vec<PricePoint>,
    pub history_supported: bool,
    pub fetched_at: DateTime<Utc>,
}

impl ForecastSnapshot {
    /// Builds a snapshot, sorting both series by date.
    /// The predicted series is cut down to `horizon` points.
    pub fn new(
        query: &ForecastQuery,
        last_date: Option<NaiveDate>,
        last_value: Option<f64>,
        mut predictions: Vec<PricePoint>,
        history: Option<Vec<PricePoint>>,
    ) -> Self {
        predictions.sort_by_key(|p| p.date);
        predictions.truncate(query.horizon.steps() as usize);

        let history_supported = history.is_some();
        let mut history = history.unwrap_or_default();
        history.sort_by_key(|p| p.date);

        Self {
            asset: query.asset,
            horizon: query.horizon,
            last_date,
            last_value,
            predictions,
            history,
            history_supported,
            fetched_at: Utc::now(),
        }
    }

    pub fn last_actual(&self) -> Option<&PricePoint> {
        self.history.last()
    }

    pub fn first_prediction(&self) -> Option<&PricePoint> {
        self.predictions.first()
    }
}

/// Normalises API timestamps to a calendar date.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS[.f]`, `YYYY-MM-DD HH:MM:SS` and RFC 3339.
pub fn parse_api_date(raw: &str) -> Result<NaiveDate, ForecastError> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(dt.date());
        }
    }

    Err(ForecastError::InvalidParameter {
        name: "date",
        reason: format!("unrecognised date '{}'", raw),
    })
}
