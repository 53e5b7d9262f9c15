use crate::application::client::{ClientEvent, ForecastClient};
use crate::application::dashboard_state::DashboardState;
use crate::config::DashboardConfig;
use crate::infrastructure::csv_export;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

const MAX_ACTIVITY_LINES: usize = 500;

/// UI-independent side of the desktop dashboard.
///
/// Owns the control state and the worker client; the egui layer only reads
/// from it and forwards user input.
pub struct DashboardApp {
    pub client: ForecastClient,
    pub state: DashboardState,
    pub activity: VecDeque<String>,
    pub export_dir: PathBuf,
    pub export_status: Option<Result<PathBuf, String>>,
    // Scratch buffer for the base URL text field; applied on Enter
    pub base_url_input: String,
}

impl DashboardApp {
    pub fn new(client: ForecastClient, config: &DashboardConfig) -> Self {
        Self {
            client,
            state: DashboardState::new(config),
            activity: VecDeque::new(),
            export_dir: config.export.dir.clone(),
            export_status: None,
            base_url_input: config.api.base_url.clone(),
        }
    }

    /// Drains worker events and starts a fetch when one is due
    pub fn tick(&mut self, now: Instant) {
        while let Some(event) = self.client.poll_next() {
            match event {
                ClientEvent::Outcome(outcome) => self.state.apply_outcome(outcome),
                ClientEvent::Log(line) => self.push_activity(line),
            }
        }

        if let Some(request) = self.state.begin_fetch(now) {
            let id = request.id;
            if let Err(e) = self.client.submit(request) {
                error!("Could not dispatch refresh #{}: {}", id, e);
                self.state.abort_fetch(id, &e.to_string());
            }
        }
    }

    pub fn push_activity(&mut self, line: String) {
        let line = line.trim_end().to_string();
        if line.is_empty() {
            return;
        }
        self.activity.push_back(line);
        // Keep history manageable
        while self.activity.len() > MAX_ACTIVITY_LINES {
            self.activity.pop_front();
        }
    }

    /// Writes the displayed series to the export directory
    pub fn export_csv(&mut self) {
        let Some(snapshot) = self.state.snapshot() else {
            self.export_status = Some(Err("No forecast loaded yet.".to_string()));
            return;
        };

        self.export_status = Some(
            csv_export::write_csv_file(&self.export_dir, snapshot).map_err(|e| e.to_string()),
        );
    }
}

impl Drop for DashboardApp {
    fn drop(&mut self) {
        self.state.cancel_timer();
        info!("Dashboard closed, auto-refresh cancelled.");
    }
}
