//! Logging setup shared by every binary that embeds the stock engine.

/// Tracing subscriber configuration and installation.
pub mod tracing;

pub use crate::tracing::LoggingConfig;

/// Initialize process-wide logging with defaults.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init_with(&LoggingConfig::default());
}

/// Initialize process-wide logging from configuration.
pub fn init_with(config: &LoggingConfig) {
    tracing::init_with(config);
}
