//! dstat terminal dashboard
//!
//! Polls the metrics endpoint and redraws on every snapshot or chart
//! commit. Reads commands from stdin:
//!
//! - a section id (`charts`) or its number (`2`) navigates
//! - `r` refreshes now, `t` toggles the menu, `q` quits
//!
//! Page views are reported for every navigation; quitting (or Ctrl+C)
//! sends the exit beacon and waits briefly for it to go out.

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use dstat::analytics::{
    HttpTransport, MemorySessionStore, PageViewReporter, SessionIdentifier, TerminalEnvironment,
};
use dstat::chart::LiveSeriesView;
use dstat::config::Config;
use dstat::dashboard::{render_screen, spawn_series_feed, DashboardShell, Section};
use dstat::metrics::{MetricsClient, MetricsPoller};

#[derive(Parser, Debug)]
#[command(name = "dstat", version, about = "Live RPS dashboard in the terminal")]
struct Args {
    /// Config file (default: search the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Metrics endpoint, overrides the config
    #[arg(long)]
    endpoint: Option<String>,

    /// Section to open
    #[arg(long, default_value = "dashboard")]
    section: String,

    /// Do not report page views
    #[arg(long)]
    no_analytics: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Navigate(Section),
    Refresh,
    ToggleMenu,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        match line {
            "" => None,
            "q" | "quit" | "exit" => Some(Command::Quit),
            "r" | "refresh" => Some(Command::Refresh),
            "t" | "toggle" => Some(Command::ToggleMenu),
            _ => match line.parse::<usize>() {
                Ok(position) => Section::from_position(position).map(Command::Navigate),
                Err(_) => Some(Command::Navigate(Section::from_id(line))),
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(endpoint) = args.endpoint {
        config.metrics.endpoint = endpoint;
    }
    if args.no_analytics {
        config.analytics.enabled = false;
    }

    dstat::logging::init(&config.logging, &[]);
    tracing::info!("dstat v{}", env!("CARGO_PKG_VERSION"));

    let client = MetricsClient::new(config.metrics.client_config()).context("Failed to build metrics client")?;
    let poller = Arc::new(MetricsPoller::new(Arc::new(client), config.metrics.poller_config()));
    let view = Arc::new(LiveSeriesView::new(
        config.chart.path_builder(),
        config.chart.transition_delay(),
    ));
    let feed = spawn_series_feed(&poller, Arc::clone(&view));

    let initial = Section::from_id(&args.section);
    let mut shell = DashboardShell::new(Arc::clone(&poller), Arc::clone(&view)).layout(config.chart.layout());
    shell.navigate(initial);

    let environment = Arc::new(TerminalEnvironment::new(initial.path()));
    let (transport, mounted) = if config.analytics.enabled {
        let transport = Arc::new(
            HttpTransport::new(Duration::from_millis(config.analytics.request_timeout_ms))
                .context("Failed to build analytics transport")?,
        );
        let reporter = Arc::new(PageViewReporter::new(
            config.analytics.endpoint.clone(),
            environment.clone(),
            transport.clone(),
            SessionIdentifier::new(Arc::new(MemorySessionStore::new())),
        ));
        let mounted = reporter.mount(environment.subscribe());
        tracing::info!(session_id = %mounted.session_id(), "Page view reporting enabled");
        (Some(transport), Some(mounted))
    } else {
        (None, None)
    };

    let poll_handle = Arc::clone(&poller).start();

    let mut snapshots = poller.subscribe();
    let mut revisions = view.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    draw(&shell);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match Command::parse(&line) {
                    Some(Command::Quit) => break,
                    Some(Command::Refresh) => {
                        let poller = Arc::clone(&poller);
                        tokio::spawn(async move {
                            poller.refresh_now().await;
                        });
                    }
                    Some(Command::ToggleMenu) => {
                        shell.toggle_navigation();
                    }
                    Some(Command::Navigate(section)) => {
                        if shell.navigate(section) {
                            environment.navigate(&section.path());
                        }
                    }
                    None => {}
                },
                Ok(None) => stdin_open = false,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read stdin");
                    stdin_open = false;
                }
            },
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            changed = revisions.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
        draw(&shell);
    }

    tracing::info!("Shutting down...");
    poll_handle.stop();
    feed.abort();
    view.close();

    if let Some(mounted) = mounted {
        mounted.unload().await;
    }
    if let Some(transport) = transport {
        let abandoned = transport
            .flush(Duration::from_millis(config.analytics.flush_timeout_ms))
            .await;
        if abandoned > 0 {
            tracing::warn!(abandoned, "Exit beacon not delivered before shutdown");
        }
    }

    tracing::info!("dstat stopped");
    Ok(())
}

fn draw(shell: &DashboardShell) {
    let screen = render_screen(&shell.render(), shell.navigation(), shell.poller().is_refreshing());
    let mut stdout = std::io::stdout().lock();
    // Clear and home the cursor before each frame
    let _ = write!(stdout, "\x1B[2J\x1B[H{}", screen);
    let _ = stdout.flush();
}
