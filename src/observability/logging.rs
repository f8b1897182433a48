//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the logging subsystem once per process
//! - JSON format for production, pretty format for development
//! - Log level from RUST_LOG when set, config default otherwise
//!
//! Key material is never logged; key types redact their Debug output.

use tracing_subscriber::EnvFilter;

use crate::config::schema::ObservabilityConfig;

/// Initialize the tracing subscriber. Safe to call more than once; later
/// calls are no-ops.
pub fn init(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    let result = match config.log_format.as_str() {
        "json" => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
    };

    if result.is_ok() {
        tracing::info!(
            level = %config.log_level,
            format = %config.log_format,
            "logging initialized"
        );
    }
}
