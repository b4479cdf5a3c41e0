//! Tracing and logging (shared setup).

/// Initialize process-wide logging from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(&config::ObservabilityConfig::from_env());
}

/// Environment-driven settings.
pub mod config;

/// Subscriber construction (filters, formatting).
pub mod tracing;

pub use config::{LogFormat, ObservabilityConfig};
