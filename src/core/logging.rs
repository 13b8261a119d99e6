//! Logging setup.
//!
//! Installs a `tracing` subscriber writing to stderr so stdout stays free for
//! transformer output. `RUST_LOG` takes precedence over the configured level.

use crate::core::config::LoggingConfig;
use crate::core::error::{AppError, Result};
use chrono::Local;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Timestamp formatter using the local timezone (respects `TZ`).
pub struct LocalTime;

impl tracing_subscriber::fmt::time::FormatTime for LocalTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Build the filter directive string.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies to every
/// target.
pub fn filter_directives(config: &LoggingConfig, rust_log: Option<&str>) -> String {
    match rust_log {
        Some(directives) if !directives.trim().is_empty() => directives.to_string(),
        _ => config.level.clone(),
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = EnvFilter::try_new(filter_directives(config, rust_log.as_deref()))
        .map_err(|e| AppError::Logging(e.to_string()))?;

    let result = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_timer(LocalTime)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_timer(LocalTime)
                    .with_ansi(!config.no_color)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| AppError::Logging(e.to_string()))
}
