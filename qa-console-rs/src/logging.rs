//! Structured logging setup for the console.
//!
//! Logs go to stderr so rendered output on stdout stays clean.

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

// Flag to track if logging has been initialized
static LOGGING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Configuration for the logging system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level used when `RUST_LOG` is not set (trace, debug, info, warn, error)
    pub level: String,
    /// The service name for identification
    pub service_name: String,
    /// Whether to use JSON formatting
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            service_name: "qa-console".to_string(),
            json_format: false,
        }
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    if LOGGING_INITIALIZED.load(Ordering::SeqCst) {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let subscriber = Registry::default().with(filter);

    if config.json_format {
        let json_layer = fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_target(true)
            .with_writer(std::io::stderr);

        tracing::subscriber::set_global_default(subscriber.with(json_layer))
            .context("Failed to set global subscriber")?;
    } else {
        let text_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

        tracing::subscriber::set_global_default(subscriber.with(text_layer))
            .context("Failed to set global subscriber")?;
    }

    LOGGING_INITIALIZED.store(true, Ordering::SeqCst);

    tracing::debug!(
        service = %config.service_name,
        json_format = config.json_format,
        "Logging initialized"
    );

    Ok(())
}
