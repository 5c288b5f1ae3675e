//! dstat CLI
//!
//! One-shot operations against the metrics and analytics endpoints:
//! - Fetch and print a snapshot
//! - Render the chart of a snapshot to SVG
//! - Send a single page view or exit event
//! - Generate or show configuration

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use dstat::analytics::{
    FixedEnvironment, HttpTransport, MemorySessionStore, PageViewReporter, SessionIdentifier,
};
use dstat::chart::{render_svg, AxisLabels, ChartFrame, ChartStyle, Interpolation, PathBuilder};
use dstat::config::{generate_default_config, Config};
use dstat::dashboard::cards::{headline_cards, health_cards, stats_cards};
use dstat::dashboard::term::{render_card, sparkline};
use dstat::metrics::{MetricsClient, SnapshotSource};
use dstat::model::MetricsSnapshot;

#[derive(Parser)]
#[command(name = "dstat-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "One-shot dstat operations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Metrics endpoint, overrides the config
    #[arg(long, global = true)]
    pub endpoint: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch one snapshot and print it
    Snapshot {
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Render the chart of a snapshot as SVG
    Render {
        /// Snapshot JSON file (default: fetch from the endpoint)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// smooth or linear (default: from config)
        #[arg(long)]
        interpolation: Option<Interpolation>,
        /// Line color (default: from config)
        #[arg(long)]
        color: Option<String>,
    },

    /// Send a page view, or a page exit with --exit
    Track {
        /// Page path
        #[arg(short, long, default_value = "/")]
        page: String,
        /// Referrer
        #[arg(short, long, default_value = "")]
        referrer: String,
        /// Send the exit beacon instead of a page view
        #[arg(long)]
        exit: bool,
    },

    /// Generate default config file, or show the effective one
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the effective configuration instead
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::from_env(),
    };
    if let Some(endpoint) = cli.endpoint {
        config.metrics.endpoint = endpoint;
    }
    dstat::logging::init(&config.logging, &[]);

    match cli.command {
        Commands::Snapshot { format } => {
            let snapshot = fetch(&config).await?;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
                return Ok(());
            }

            println!(
                "{} snapshot ({}) at {}",
                snapshot.metric_type,
                snapshot.status,
                snapshot.timestamp.as_deref().unwrap_or("unknown time")
            );
            if let Some(aggregates) = &snapshot.aggregates {
                let cards = headline_cards(aggregates)
                    .into_iter()
                    .chain(health_cards(aggregates))
                    .chain(stats_cards(aggregates).into_iter().take(1));
                for card in cards {
                    println!("{}", render_card(&card));
                }
            }

            let frame = frame_for(&snapshot, PathBuilder::new(config.chart.interpolation));
            println!("  {} points  {}", snapshot.series.len(), sparkline(&frame));
            println!(
                "  {} … {} … {}",
                frame.x_labels.start, frame.x_labels.middle, frame.x_labels.end
            );
        }

        Commands::Render {
            input,
            output,
            interpolation,
            color,
        } => {
            let snapshot = match input {
                Some(path) => {
                    let content = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    serde_json::from_str::<MetricsSnapshot>(&content)
                        .with_context(|| format!("Invalid snapshot in {}", path.display()))?
                }
                None => fetch(&config).await?,
            };

            let builder = PathBuilder::new(interpolation.unwrap_or(config.chart.interpolation));
            let style = ChartStyle::new(color.unwrap_or(config.chart.color.clone()), "areaGradient");
            let svg = render_svg(&frame_for(&snapshot, builder), &style);

            match output {
                Some(path) => {
                    std::fs::write(&path, svg)?;
                    println!("Chart written to {}", path.display());
                }
                None => println!("{}", svg),
            }
        }

        Commands::Track { page, referrer, exit } => {
            let transport = Arc::new(HttpTransport::new(Duration::from_millis(
                config.analytics.request_timeout_ms,
            ))?);
            let environment = Arc::new(FixedEnvironment::new(page).with_referrer(referrer));
            let reporter = PageViewReporter::new(
                config.analytics.endpoint.clone(),
                environment,
                transport.clone(),
                SessionIdentifier::new(Arc::new(MemorySessionStore::new())),
            );
            let session_id = reporter.session_id();

            if exit {
                if !reporter.send_page_exit(&session_id) {
                    anyhow::bail!("Exit beacon could not be queued");
                }
                let abandoned = transport
                    .flush(Duration::from_millis(config.analytics.flush_timeout_ms))
                    .await;
                println!("Exit beacon sent for {} ({} abandoned)", session_id, abandoned);
            } else {
                match reporter.send_page_view(&session_id).await {
                    Some(response) => println!("{}", serde_json::to_string_pretty(&response)?),
                    None => println!("Page view sent for {} (no response body)", session_id),
                }
            }
        }

        Commands::Config { output, show } => {
            let content = if show {
                toml::to_string_pretty(&config)?
            } else {
                generate_default_config()
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Config written to {}", path.display());
                }
                None => println!("{}", content),
            }
        }
    }

    Ok(())
}

async fn fetch(config: &Config) -> anyhow::Result<MetricsSnapshot> {
    let client = MetricsClient::new(config.metrics.client_config())?;
    client
        .fetch()
        .await
        .with_context(|| format!("Failed to fetch snapshot from {}", client.url()))
}

/// A frame with the snapshot's series both committed and incoming
fn frame_for(snapshot: &MetricsSnapshot, builder: PathBuilder) -> ChartFrame {
    ChartFrame {
        paths: builder.build(&snapshot.series),
        x_labels: AxisLabels::x_axis(&snapshot.series),
        y_labels: AxisLabels::y_axis(&snapshot.series),
        point_count: snapshot.series.len(),
        transitioning: false,
    }
}
