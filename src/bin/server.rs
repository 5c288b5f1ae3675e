//! dstat dashboard server
//!
//! Run with: cargo run --bin dstat-server
//!
//! # Configuration
//!
//! Read from the standard config locations (see `dstat-cli config path`),
//! then overridden by environment variables:
//! - `DSTAT_METRICS_ENDPOINT`: Snapshot endpoint
//! - `DSTAT_HOST`: Host to bind to (default: 0.0.0.0)
//! - `DSTAT_PORT`: Port to listen on (default: 8090)
//! - `RUST_LOG`: Log filter (default: dstat=info,tower_http=debug)

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use dstat::chart::LiveSeriesView;
use dstat::config::Config;
use dstat::dashboard::spawn_series_feed;
use dstat::metrics::{MetricsClient, MetricsPoller};
use dstat::server::{serve, AppState};

#[derive(Parser, Debug)]
#[command(name = "dstat-server", version, about = "Serve the dstat dashboard over HTTP")]
struct Args {
    /// Config file (default: search the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port, overrides the config
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(port) = args.port {
        config.server.port = port;
    }

    dstat::logging::init(&config.logging, &["tower_http=debug"]);
    tracing::info!("Starting dstat server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Metrics endpoint: {}", config.metrics.endpoint);

    let client = MetricsClient::new(config.metrics.client_config()).context("Failed to build metrics client")?;
    let poller = Arc::new(MetricsPoller::new(Arc::new(client), config.metrics.poller_config()));
    let view = Arc::new(LiveSeriesView::new(
        config.chart.path_builder(),
        config.chart.transition_delay(),
    ));

    let feed = spawn_series_feed(&poller, Arc::clone(&view));
    let poll_handle = Arc::clone(&poller).start();

    let server_config = config.server_config();
    let state = AppState::new(Arc::clone(&poller), Arc::clone(&view), server_config.clone());

    let result = serve(state, &server_config).await;

    tracing::info!("Stopping metrics poller...");
    poll_handle.stop();
    feed.abort();
    view.close();

    result?;
    tracing::info!("dstat server stopped");
    Ok(())
}
