//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::defaults::DEFAULT_LOG_FILTER;

static INIT: Once = Once::new();

/// Initialize the crawler's tracing/logging system.
///
/// Reads the `CRAWL_LOG` environment variable for per-target log levels,
/// e.g. `CRAWL_LOG=crawl_engine=debug,crawl_cli=info`.
/// Falls back to `crawl=info` if `CRAWL_LOG` is not set or is invalid.
///
/// Idempotent: calling it more than once is safe.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("CRAWL_LOG").unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    install(filter);
}

/// Initialize tracing with a custom filter string (for `-v` flags or tests).
pub fn init_tracing_with_filter(filter: &str) {
    install(EnvFilter::new(filter));
}

fn install(filter: EnvFilter) {
    INIT.call_once(|| {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .init();
    });
}
