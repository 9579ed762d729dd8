//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{defaults, LogFormat, TracingConfig};

static INIT: Once = Once::new();

/// Initialize logging from the `CADENCE_LOG` environment variable.
///
/// Format: `CADENCE_LOG=cadence_interval=debug,cadence_deferred=info`.
/// Falls back to `cadence=info` if unset or invalid.
///
/// Idempotent; only the first call installs a subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(defaults::LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(defaults::DEFAULT_LOG_FILTER));
    install(filter, LogFormat::Pretty);
}

/// Initialize logging from a resolved [`TracingConfig`].
///
/// An invalid filter falls back to the default; run
/// `CadenceConfig::validate` first to reject it instead.
pub fn init_tracing_with_config(config: &TracingConfig) {
    let filter = EnvFilter::try_new(config.effective_filter())
        .unwrap_or_else(|_| EnvFilter::new(defaults::DEFAULT_LOG_FILTER));
    install(filter, config.effective_format());
}

fn install(filter: EnvFilter, format: LogFormat) {
    INIT.call_once(|| {
        let registry = tracing_subscriber::registry().with(filter);
        // `try_init` fails when a subscriber (e.g. a test harness) is already set.
        let _ = match format {
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init(),
            LogFormat::Json => registry
                .with(fmt::layer().json().with_target(true).with_thread_ids(true))
                .try_init(),
        };
    });
}
