//! Process-wide `tracing` subscriber setup

use tracing::Level;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Environment variable holding extra filter directives, e.g. `kestrel_server=debug`.
pub const LOG_ENV_VAR: &str = "KESTREL_LOG";

/// Filter at `level`, refined by comma-separated `directives`. Unparsable
/// directives are skipped.
pub fn build_filter(level: Level, directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .parse_lossy(directives.unwrap_or_default())
}

/// Install a stderr subscriber at `level`, with per-crate overrides from `KESTREL_LOG`.
///
/// Must be called at most once per process; binaries call it first thing in `main`.
pub fn init_logging(level: Level) {
    let directives = std::env::var(LOG_ENV_VAR).ok();
    let filter = build_filter(level, directives.as_deref());

    let formatting_layer = fmt::layer()
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(formatting_layer)
        .init();
}
