//! Tracing subscriber setup shared by all binaries

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);

    match config.format.as_str() {
        "pretty" | "text" => registry.with(fmt::layer().pretty()).init(),
        _ => registry.with(fmt::layer().json()).init(),
    }
}
