use crate::application::client::{FetchOutcome, FetchRequest};
use crate::application::dashboard_service::DashboardService;
use crate::domain::ports::ForecastProvider;
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Builds a provider for a given API base URL
pub type ProviderFactory = Arc<dyn Fn(&str) -> Arc<dyn ForecastProvider> + Send + Sync>;

pub struct WorkerHandle {
    pub request_tx: mpsc::Sender<FetchRequest>,
    pub outcome_rx: Receiver<FetchOutcome>,
    pub join: JoinHandle<()>,
}

/// Spawns the fetch worker on the current tokio runtime.
///
/// Requests are served one at a time. The service is rebuilt whenever the
/// base URL differs from the previous request.
pub fn spawn_worker(factory: ProviderFactory) -> WorkerHandle {
    let (request_tx, request_rx) = mpsc::channel(4);
    let (outcome_tx, outcome_rx) = crossbeam_channel::unbounded();

    let join = tokio::spawn(run_worker(factory, request_rx, outcome_tx));

    WorkerHandle {
        request_tx,
        outcome_rx,
        join,
    }
}

async fn run_worker(
    factory: ProviderFactory,
    mut request_rx: mpsc::Receiver<FetchRequest>,
    outcome_tx: Sender<FetchOutcome>,
) {
    info!("Fetch worker started.");
    let mut current: Option<(String, DashboardService)> = None;

    while let Some(request) = request_rx.recv().await {
        let reuse = matches!(&current, Some((url, _)) if *url == request.base_url);
        if !reuse {
            info!("Connecting to prediction API at {}", request.base_url);
            let provider = factory(&request.base_url);
            current = Some((request.base_url.clone(), DashboardService::new(provider)));
        }

        let Some((_, service)) = current.as_ref() else {
            continue;
        };

        let result = service.refresh(&request.query).await;
        if let Err(e) = &result {
            error!("Refresh #{} failed: {}", request.id, e);
        }

        let outcome = FetchOutcome {
            id: request.id,
            query: request.query,
            result,
        };
        if outcome_tx.send(outcome).is_err() {
            info!("Outcome receiver dropped, stopping fetch worker.");
            break;
        }
    }

    info!("Fetch worker stopped.");
}
