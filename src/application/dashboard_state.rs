use crate::application::client::{FetchOutcome, FetchRequest};
use crate::application::refresh_timer::RefreshTimer;
use crate::config::{DashboardConfig, clamp_interval};
use crate::domain::forecast::{Asset, ForecastQuery, ForecastSnapshot, HistoryWindow, Horizon};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Values of the sidebar controls
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardControls {
    pub base_url: String,
    pub query: ForecastQuery,
    pub auto_refresh: bool,
    pub refresh_interval: Duration,
}

/// Controls, current chart data and fetch bookkeeping.
///
/// At most one fetch is in flight. A failed fetch keeps the previous snapshot.
pub struct DashboardState {
    controls: DashboardControls,
    snapshot: Option<ForecastSnapshot>,
    last_error: Option<String>,
    in_flight: Option<u64>,
    dirty: bool,
    next_id: u64,
    timer: RefreshTimer,
}

impl DashboardState {
    pub fn new(config: &DashboardConfig) -> Self {
        let controls = DashboardControls {
            base_url: config.api.base_url.clone(),
            query: config.default_query,
            auto_refresh: config.refresh.auto_refresh,
            refresh_interval: config.refresh.interval,
        };
        let timer = RefreshTimer::new(controls.refresh_interval, controls.auto_refresh);

        Self {
            controls,
            snapshot: None,
            last_error: None,
            in_flight: None,
            dirty: true,
            next_id: 1,
            timer,
        }
    }

    pub fn controls(&self) -> &DashboardControls {
        &self.controls
    }

    pub fn snapshot(&self) -> Option<&ForecastSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn needs_fetch(&self) -> bool {
        self.dirty
    }

    pub fn set_asset(&mut self, asset: Asset) {
        if self.controls.query.asset != asset {
            debug!("Asset changed to {}", asset);
            self.controls.query.asset = asset;
            self.dirty = true;
        }
    }

    pub fn set_horizon(&mut self, steps: u32) {
        let horizon = Horizon::clamped(steps);
        if self.controls.query.horizon != horizon {
            self.controls.query.horizon = horizon;
            self.dirty = true;
        }
    }

    pub fn set_history_window(&mut self, window: HistoryWindow) {
        if self.controls.query.window != window {
            self.controls.query.window = window;
            self.dirty = true;
        }
    }

    pub fn set_base_url(&mut self, base_url: &str) {
        let base_url = base_url.trim().trim_end_matches('/');
        if !base_url.is_empty() && self.controls.base_url != base_url {
            info!("Backend changed to {}", base_url);
            self.controls.base_url = base_url.to_string();
            self.dirty = true;
        }
    }

    pub fn set_auto_refresh(&mut self, enabled: bool) {
        self.controls.auto_refresh = enabled;
        self.timer.set_enabled(enabled);
    }

    pub fn set_refresh_interval_secs(&mut self, secs: u64) {
        let interval = clamp_interval(secs);
        self.controls.refresh_interval = interval;
        self.timer.set_interval(interval);
    }

    /// Manual "refresh now"
    pub fn request_refresh(&mut self) {
        self.dirty = true;
    }

    /// Stops auto-refresh, e.g. when the window closes
    pub fn cancel_timer(&mut self) {
        self.timer.cancel();
    }

    /// Time until auto-refresh wants to run again
    pub fn time_until_refresh(&self, now: Instant) -> Option<Duration> {
        self.timer.time_until_due(now)
    }

    /// Starts a fetch if one is wanted and none is in flight.
    ///
    /// A fetch is wanted when controls changed, a refresh was requested, or
    /// the auto-refresh timer is due.
    pub fn begin_fetch(&mut self, now: Instant) -> Option<FetchRequest> {
        if self.in_flight.is_some() {
            return None;
        }
        if !self.dirty && !self.timer.is_due(now) {
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.in_flight = Some(id);
        self.dirty = false;
        self.timer.mark_fired(now);

        Some(FetchRequest {
            id,
            base_url: self.controls.base_url.clone(),
            query: self.controls.query,
        })
    }

    /// Releases the in-flight slot without an outcome (the request never left).
    ///
    /// Nothing is re-queued; the next timer tick or a manual refresh retries.
    pub fn abort_fetch(&mut self, id: u64, reason: &str) {
        if self.in_flight == Some(id) {
            self.in_flight = None;
            self.last_error = Some(reason.to_string());
        }
    }

    pub fn apply_outcome(&mut self, outcome: FetchOutcome) {
        if self.in_flight != Some(outcome.id) {
            warn!("Ignoring stale fetch outcome #{}", outcome.id);
            return;
        }
        self.in_flight = None;
        let query = outcome.query;

        match outcome.result {
            Ok(snapshot) => {
                debug!(
                    "Applied refresh #{} for {} (horizon {}, {})",
                    outcome.id, query.asset, query.horizon, query.window
                );
                self.snapshot = Some(snapshot);
                self.last_error = None;
            }
            Err(e) => {
                warn!(
                    "Refresh #{} for {} failed, keeping previous chart",
                    outcome.id, query.asset
                );
                self.last_error = Some(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ForecastError;

    fn state() -> DashboardState {
        DashboardState::new(&DashboardConfig::default())
    }

    fn ok_outcome(request: &FetchRequest) -> FetchOutcome {
        FetchOutcome {
            id: request.id,
            query: request.query,
            result: Ok(ForecastSnapshot::new(&request.query, None, Some(1.0), Vec::new(), None)),
        }
    }

    #[test]
    fn test_initial_state_wants_a_fetch() {
        let mut state = state();
        let request = state.begin_fetch(Instant::now()).unwrap();
        assert_eq!(request.query, ForecastQuery::default());
        assert!(state.is_fetching());
    }

    #[test]
    fn test_only_one_fetch_in_flight() {
        let mut state = state();
        let t0 = Instant::now();
        let first = state.begin_fetch(t0).unwrap();

        state.set_asset(Asset::EthUsd);
        assert!(state.begin_fetch(t0).is_none());

        state.apply_outcome(ok_outcome(&first));
        let second = state.begin_fetch(t0).unwrap();
        assert_eq!(second.query.asset, Asset::EthUsd);
        assert_eq!(second.id, first.id + 1);
    }

    #[test]
    fn test_unchanged_control_does_not_refetch() {
        let mut state = state();
        let t0 = Instant::now();
        let first = state.begin_fetch(t0).unwrap();
        state.apply_outcome(ok_outcome(&first));

        state.set_asset(first.query.asset);
        state.set_horizon(first.query.horizon.steps());
        assert!(state.begin_fetch(t0 + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn test_horizon_control_is_clamped() {
        let mut state = state();
        state.set_horizon(99);
        assert_eq!(state.controls().query.horizon.steps(), 14);
    }

    #[test]
    fn test_failure_keeps_previous_snapshot() {
        let mut state = state();
        let t0 = Instant::now();
        let first = state.begin_fetch(t0).unwrap();
        state.apply_outcome(ok_outcome(&first));
        let before = state.snapshot().cloned();

        state.request_refresh();
        let second = state.begin_fetch(t0).unwrap();
        state.apply_outcome(FetchOutcome {
            id: second.id,
            query: second.query,
            result: Err(ForecastError::Unhealthy {
                detail: "connection refused".to_string(),
            }),
        });

        assert_eq!(state.snapshot().cloned(), before);
        assert!(state.last_error().unwrap().contains("connection refused"));
        assert!(!state.is_fetching());
    }

    #[test]
    fn test_stale_outcome_is_ignored() {
        let mut state = state();
        let request = state.begin_fetch(Instant::now()).unwrap();
        state.apply_outcome(FetchOutcome {
            id: request.id + 10,
            query: request.query,
            result: Err(ForecastError::Unhealthy {
                detail: "late".to_string(),
            }),
        });
        assert!(state.is_fetching());
        assert!(state.last_error().is_none());
    }

    #[test]
    fn test_base_url_normalised() {
        let mut state = state();
        let t0 = Instant::now();
        let first = state.begin_fetch(t0).unwrap();
        state.apply_outcome(ok_outcome(&first));

        state.set_base_url("  http://localhost:8000/ ");
        let request = state.begin_fetch(t0).unwrap();
        assert_eq!(request.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_abort_releases_slot() {
        let mut state = state();
        let request = state.begin_fetch(Instant::now()).unwrap();
        state.abort_fetch(request.id, "worker unavailable");
        assert!(!state.is_fetching());
        assert_eq!(state.last_error(), Some("worker unavailable"));
    }

    #[test]
    fn test_abort_waits_for_timer_or_manual_refresh() {
        let mut config = DashboardConfig::default();
        config.refresh.interval = Duration::from_secs(60);
        let mut state = DashboardState::new(&config);
        let t0 = Instant::now();

        let request = state.begin_fetch(t0).unwrap();
        state.abort_fetch(request.id, "worker unavailable");
        assert!(!state.needs_fetch());
        assert!(state.begin_fetch(t0 + Duration::from_millis(200)).is_none());
        assert!(state.begin_fetch(t0 + Duration::from_secs(59)).is_none());

        let retry = state.begin_fetch(t0 + Duration::from_secs(60)).unwrap();
        state.abort_fetch(retry.id, "worker unavailable");

        state.request_refresh();
        assert!(state.begin_fetch(t0 + Duration::from_secs(61)).is_some());
    }

    #[test]
    fn test_parameter_change_restarts_countdown() {
        let mut config = DashboardConfig::default();
        config.refresh.interval = Duration::from_secs(60);
        let mut state = DashboardState::new(&config);
        let t0 = Instant::now();

        let first = state.begin_fetch(t0).unwrap();
        state.apply_outcome(ok_outcome(&first));

        state.set_asset(Asset::BtcUsd);
        let changed = state.begin_fetch(t0 + Duration::from_secs(50)).unwrap();
        assert_eq!(changed.query.asset, Asset::BtcUsd);
        state.apply_outcome(ok_outcome(&changed));

        // The original schedule would have fired at t0+60s
        assert!(state.begin_fetch(t0 + Duration::from_secs(61)).is_none());
        assert_eq!(
            state.time_until_refresh(t0 + Duration::from_secs(61)),
            Some(Duration::from_secs(49))
        );
        assert!(state.begin_fetch(t0 + Duration::from_secs(109)).is_none());

        let tick = state.begin_fetch(t0 + Duration::from_secs(110)).unwrap();
        assert_eq!(tick.query.asset, Asset::BtcUsd);
    }
}
