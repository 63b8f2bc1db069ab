//! Observability: tracing init.
//!
//! Uses config::ObservabilityConfig for HIVELITE_QUIET, HIVELITE_LOG_LEVEL, HIVELITE_LOG_JSON.
//! Logs go to stderr; stdout carries tool result envelopes only.

use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::ObservabilityConfig;

/// Resolve the filter directive: quiet wins over the configured level.
fn filter_directive(cfg: &ObservabilityConfig) -> String {
    if cfg.quiet {
        "hivelite=warn".to_string()
    } else {
        cfg.log_level.clone()
    }
}

/// Initialize tracing. Call at process startup.
/// `RUST_LOG` takes precedence over HIVELITE_LOG_LEVEL when set.
pub fn init_tracing() {
    let cfg = ObservabilityConfig::from_env();
    let level = filter_directive(cfg);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    };
}
