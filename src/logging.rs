//! Logging setup shared by the binaries
//!
//! `RUST_LOG` wins over the configured level. Output goes to stderr so the
//! terminal dashboard can own stdout.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Default filter for a configured level, e.g. `dstat=info`
pub fn default_filter(config: &LoggingConfig, extra: &[&str]) -> String {
    let mut directives = vec![format!("dstat={}", config.level)];
    directives.extend(extra.iter().map(|d| d.to_string()));
    directives.join(",")
}

/// Install the global subscriber; later calls are ignored
pub fn init(config: &LoggingConfig, extra: &[&str]) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config, extra)));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("Logging already initialized: {}", e);
    }
}
