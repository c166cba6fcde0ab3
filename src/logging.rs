//! Logging system initialization

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber. Call once at startup; respects
/// `RUST_LOG`, defaulting to `info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true)
        .init();
}
