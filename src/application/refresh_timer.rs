use std::time::{Duration, Instant};

/// Fixed-interval auto-refresh timer driven by caller-supplied instants.
///
/// Fires at most once per interval, counted from the last fetch (automatic or
/// manual). A disabled timer never fires.
#[derive(Debug, Clone)]
pub struct RefreshTimer {
    interval: Duration,
    enabled: bool,
    last_fired: Option<Instant>,
}

impl RefreshTimer {
    pub fn new(interval: Duration, enabled: bool) -> Self {
        Self {
            interval,
            enabled,
            last_fired: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Stops the timer for good (until re-enabled)
    pub fn cancel(&mut self) {
        self.enabled = false;
    }

    pub fn is_due(&self, now: Instant) -> bool {
        if !self.enabled {
            return false;
        }
        match self.last_fired {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }

    /// Records that a fetch started at `now`; restarts the countdown
    pub fn mark_fired(&mut self, now: Instant) {
        self.last_fired = Some(now);
    }

    /// Time left until the next fire, `None` when disabled
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        if !self.enabled {
            return None;
        }
        Some(match self.last_fired {
            Some(last) => (last + self.interval).saturating_duration_since(now),
            None => Duration::ZERO,
        })
    }
}
