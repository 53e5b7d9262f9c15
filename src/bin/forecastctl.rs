//! forecastctl - headless companion to the dashboard
//!
//! Runs the same refresh cycle as the desktop UI and prints KPIs, writes the
//! CSV export, or keeps refreshing on the configured interval.
//!
//! # Usage
//! ```sh
//! cargo run --bin forecastctl -- show --asset BTC-USD --horizon 7
//! cargo run --bin forecastctl -- watch --interval 60
//! ```
//!
//! Defaults come from the same `FORECAST_*` environment variables as the UI.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use forecastdash::application::dashboard_service::DashboardService;
use forecastdash::application::refresh_timer::RefreshTimer;
use forecastdash::config::{DashboardConfig, clamp_interval};
use forecastdash::domain::forecast::{
    Asset, ForecastQuery, ForecastSnapshot, HistoryWindow, Horizon,
};
use forecastdash::domain::kpi::{ForecastKpis, format_grouped, format_value, mean_absolute_error, residuals};
use forecastdash::domain::ports::ForecastProvider;
use forecastdash::infrastructure::{HttpForecastProvider, csv_export};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Level, error, info};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Stock market and crypto forecast client", long_about = None)]
struct Cli {
    /// Prediction API base URL (overrides FORECAST_API_BASE_URL)
    #[arg(long, global = true)]
    api: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone)]
struct QueryArgs {
    /// Asset identifier (SL20_SYN, BTC-USD, ETH-USD)
    #[arg(short, long)]
    asset: Option<String>,

    /// Forecast horizon in steps (1-14)
    #[arg(long)]
    horizon: Option<u32>,

    /// History window in days (90, 180, 365, 730)
    #[arg(long)]
    history_days: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the /health endpoint
    Health,
    /// Fetch once and print KPIs and the forecast table
    Show {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Fetch once and write the CSV export
    Export {
        #[command(flatten)]
        query: QueryArgs,

        /// Output directory (overrides FORECAST_EXPORT_DIR)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Keep refreshing on a fixed interval until Ctrl+C
    Watch {
        #[command(flatten)]
        query: QueryArgs,

        /// Refresh interval in seconds (10-600)
        #[arg(short, long)]
        interval: Option<u64>,
    },
}

impl QueryArgs {
    fn resolve(&self, defaults: ForecastQuery) -> Result<ForecastQuery> {
        let asset = match &self.asset {
            Some(raw) => Asset::from_str(raw)?,
            None => defaults.asset,
        };
        let horizon = match self.horizon {
            Some(steps) => Horizon::new(steps)?,
            None => defaults.horizon,
        };
        let window = match self.history_days {
            Some(days) => HistoryWindow::from_days(days)?,
            None => defaults.window,
        };
        Ok(ForecastQuery {
            asset,
            horizon,
            window,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let cli = Cli::parse();
    let mut config = DashboardConfig::from_env()?;
    if let Some(api) = &cli.api {
        config.api.base_url = api.trim().trim_end_matches('/').to_string();
    }

    let provider = Arc::new(HttpForecastProvider::new(&config.api));
    info!("Backend: {}", provider.base_url());

    match cli.command {
        Commands::Health => {
            let status = provider.health().await.context("Health check failed")?;
            if status.ok {
                println!("API healthy: {}", status.detail);
            } else {
                anyhow::bail!("API unhealthy: {}", status.detail);
            }
        }
        Commands::Show { query } => {
            let query = query.resolve(config.default_query)?;
            let service = DashboardService::new(provider);
            let snapshot = service.refresh(&query).await?;
            print_snapshot(&snapshot);
        }
        Commands::Export { query, out_dir } => {
            let query = query.resolve(config.default_query)?;
            let service = DashboardService::new(provider);
            let snapshot = service.refresh(&query).await?;
            let dir = out_dir.unwrap_or(config.export.dir);
            let path = csv_export::write_csv_file(&dir, &snapshot)?;
            println!("{}", path.display());
        }
        Commands::Watch { query, interval } => {
            let query = query.resolve(config.default_query)?;
            let interval = interval
                .map(clamp_interval)
                .unwrap_or(config.refresh.interval);
            watch(provider, query, interval).await?;
        }
    }

    Ok(())
}

async fn watch(
    provider: Arc<HttpForecastProvider>,
    query: ForecastQuery,
    interval: std::time::Duration,
) -> Result<()> {
    let service = DashboardService::new(provider.clone());
    let mut timer = RefreshTimer::new(interval, true);
    info!("Auto-refresh enabled: every {} seconds.", interval.as_secs());

    loop {
        let now = Instant::now();
        if timer.is_due(now) {
            timer.mark_fired(now);
            // Cached responses would hide updates between ticks
            provider.invalidate_cache();
            match service.refresh(&query).await {
                Ok(snapshot) => print_snapshot(&snapshot),
                Err(e) => error!("Refresh failed, keeping previous output: {}", e),
            }
        }

        let wait = timer.time_until_due(Instant::now()).unwrap_or(interval);
        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = tokio::signal::ctrl_c() => {
                timer.cancel();
                info!("Shutdown signal received. Exiting...");
                return Ok(());
            }
        }
    }
}

fn print_snapshot(snapshot: &ForecastSnapshot) {
    let kpis = ForecastKpis::compute(snapshot);
    let change = |c: Option<forecastdash::domain::kpi::Change>| match c {
        Some(c) => format!(
            "{} {} ({})",
            c.trend().arrow(),
            format_grouped(c.delta, 2),
            c.pct
                .map(|p| format!("{}%", format_grouped(p, 3)))
                .unwrap_or_else(|| "-".to_string())
        ),
        None => "-".to_string(),
    };

    println!(
        "{}  updated {}",
        snapshot.asset,
        snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "  last value      {} ({})",
        format_value(kpis.last_value),
        snapshot
            .last_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("  next forecast   {}", format_value(kpis.next_forecast));
    println!("  next vs last    {}", change(kpis.change_next));
    let horizon_change = kpis.change_horizon.filter(|c| c.pct.is_some());
    println!(
        "  horizon change  {} ({} steps)",
        change(horizon_change),
        snapshot.horizon
    );

    println!("  {:<12} {:>14}", "Date", "Predicted");
    for point in &snapshot.predictions {
        println!("  {:<12} {:>14}", point.date, format_value(Some(point.value)));
    }

    if !snapshot.history_supported {
        println!("  history endpoint not available");
    } else if let Some(mae) = mean_absolute_error(&residuals(&snapshot.history, &snapshot.predictions)) {
        println!("  MAE on overlapping dates: {:.4}", mae);
    }
}
