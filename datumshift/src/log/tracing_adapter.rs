//! Tracing library adapter implementation.

use crate::log::{LogLevel, Logger};
use std::fmt::Arguments;

/// Logger implementation that delegates to the `tracing` crate.
///
/// Events are emitted under the `datumshift` target so an application's
/// `EnvFilter` can tune engine verbosity independently.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    /// Create a new tracing logger adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "datumshift", "{}", args),
            LogLevel::Debug => tracing::debug!(target: "datumshift", "{}", args),
            LogLevel::Info => tracing::info!(target: "datumshift", "{}", args),
            LogLevel::Warn => tracing::warn!(target: "datumshift", "{}", args),
            LogLevel::Error => tracing::error!(target: "datumshift", "{}", args),
        }
    }
}
