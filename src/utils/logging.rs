//! Logging setup for the demo binary and host shells

use env_logger::Env;

/// Initialize the process-wide logger.
///
/// Defaults to INFO; the `RUST_LOG` environment variable overrides the
/// level. Call once, early in `main`.
pub fn init_logger() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}
