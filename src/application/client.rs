use crate::domain::errors::ForecastError;
use crate::domain::forecast::{ForecastQuery, ForecastSnapshot};
use anyhow::Result;
use crossbeam_channel::Receiver;
use tokio::sync::mpsc;

/// Work item handed to the background worker
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub id: u64,
    pub base_url: String,
    pub query: ForecastQuery,
}

/// Result of one refresh cycle, tagged with the request it answers
#[derive(Debug)]
pub struct FetchOutcome {
    pub id: u64,
    pub query: ForecastQuery,
    pub result: Result<ForecastSnapshot, ForecastError>,
}

/// Unified event type for the User Interface
#[derive(Debug)]
pub enum ClientEvent {
    Outcome(FetchOutcome),
    Log(String),
}

/// A client interface for the background fetch worker.
/// Abstracts away channel management so the UI thread never blocks.
pub struct ForecastClient {
    request_tx: mpsc::Sender<FetchRequest>,
    outcome_rx: Receiver<FetchOutcome>,
    log_rx: Receiver<String>,
}

impl ForecastClient {
    pub fn new(
        request_tx: mpsc::Sender<FetchRequest>,
        outcome_rx: Receiver<FetchOutcome>,
        log_rx: Receiver<String>,
    ) -> Self {
        Self {
            request_tx,
            outcome_rx,
            log_rx,
        }
    }

    /// Poll for the next available event from any channel.
    /// Outcomes are checked before logs.
    pub fn poll_next(&self) -> Option<ClientEvent> {
        if let Ok(outcome) = self.outcome_rx.try_recv() {
            return Some(ClientEvent::Outcome(outcome));
        }
        if let Ok(msg) = self.log_rx.try_recv() {
            return Some(ClientEvent::Log(msg));
        }
        None
    }

    pub fn submit(&self, request: FetchRequest) -> Result<()> {
        self.request_tx
            .try_send(request)
            .map_err(|e| anyhow::anyhow!("Failed to send fetch request: {}", e))
    }
}
