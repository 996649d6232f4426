//! Tracing subscriber setup.
//!
//! The crate itself only emits `tracing` events; embedding applications
//! decide where they go. This module offers a small default setup for
//! binaries and harnesses that do not bring their own subscriber.

use tracing_subscriber::EnvFilter;

use crate::error::TelemetryError;

/// Output format for tracing logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text format.
    #[default]
    Text,
    /// Line-delimited JSON.
    Json,
}

/// Configuration for the default tracing subscriber.
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    pub log_level: tracing::Level,
    pub output_format: OutputFormat,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            log_level: tracing::Level::INFO,
            output_format: OutputFormat::Text,
        }
    }
}

impl SubscriberConfig {
    pub fn debug() -> Self {
        Self {
            log_level: tracing::Level::DEBUG,
            ..Self::default()
        }
    }
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the
/// configured level when set. Fails if a subscriber is already installed.
pub fn init_subscriber(config: SubscriberConfig) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match config.output_format {
        OutputFormat::Text => builder
            .try_init()
            .map_err(|source| TelemetryError::Init(source.to_string())),
        OutputFormat::Json => builder
            .json()
            .try_init()
            .map_err(|source| TelemetryError::Init(source.to_string())),
    }
}
