use forecastdash::application::client::ForecastClient;
use forecastdash::application::dashboard_app::DashboardApp;
use forecastdash::application::worker::{ProviderFactory, spawn_worker};
use forecastdash::config::DashboardConfig;
use forecastdash::domain::ports::ForecastProvider;
use forecastdash::infrastructure::HttpForecastProvider;
use std::sync::Arc;

use tracing::{Level, info};
use tracing_subscriber::prelude::*;

// A writer that sends logs to the UI via a crossbeam channel
struct ChannelWriter {
    sender: crossbeam_channel::Sender<String>,
}

impl std::io::Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf).to_string();
        let _ = self.sender.try_send(msg);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

// Cloneable wrapper for MakeWriter
#[derive(Clone)]
struct ChannelWriterFactory {
    sender: crossbeam_channel::Sender<String>,
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for ChannelWriterFactory {
    type Writer = ChannelWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ChannelWriter {
            sender: self.sender.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    // 0. Load Env (before starting anything)
    dotenvy::dotenv().ok();

    // 1. Create Log Channel
    let (log_tx, log_rx) = crossbeam_channel::bounded(1024);

    // 2. Setup Logging (Stdout + UI)
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    let ui_layer = tracing_subscriber::fmt::layer()
        .with_writer(ChannelWriterFactory { sender: log_tx })
        .with_ansi(false) // No color codes for UI text
        .with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .with(ui_layer)
        .init();

    info!("Starting forecastdash {}...", env!("CARGO_PKG_VERSION"));

    let config = DashboardConfig::from_env()?;
    info!(
        "Configuration loaded: backend={}, asset={}, horizon={}, auto_refresh={} every {:?}",
        config.api.base_url,
        config.default_query.asset,
        config.default_query.horizon,
        config.refresh.auto_refresh,
        config.refresh.interval
    );

    // 3. Create Tokio Runtime in a background thread
    let (worker_tx, worker_rx) = crossbeam_channel::bounded(1);
    let api_config = config.api.clone();

    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                tracing::error!("Failed to build Tokio runtime: {}", e);
                return;
            }
        };

        rt.block_on(async move {
            let factory: ProviderFactory = Arc::new(move |base_url: &str| {
                let mut api = api_config.clone();
                api.base_url = base_url.to_string();
                Arc::new(HttpForecastProvider::new(&api)) as Arc<dyn ForecastProvider>
            });

            let worker = spawn_worker(factory);
            let _ = worker_tx.send((worker.request_tx, worker.outcome_rx));
            info!("Background runtime started.");

            if let Err(e) = worker.join.await {
                tracing::error!("Fetch worker crashed: {}", e);
            }
        });
    });

    // 4. Wait for the worker channels
    let (request_tx, outcome_rx) = worker_rx
        .recv()
        .map_err(|_| anyhow::anyhow!("Background runtime failed to start"))?;

    let client = ForecastClient::new(request_tx, outcome_rx, log_rx);
    let app = DashboardApp::new(client, &config);

    // 5. Run UI (Blocks Main Thread)
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_title("Forecast Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Forecast Dashboard",
        native_options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("Eframe error: {}", e))?;

    Ok(())
}
