//! Logging abstraction layer.
//!
//! The engine never calls `tracing` directly. Every component that logs holds
//! an `Arc<dyn Logger>`, so an embedding application can route messages to its
//! own sink and tests can silence them.
//!
//! - `Logger` trait: the interface components log through
//! - `TracingLogger`: production adapter that forwards to `tracing`
//! - `NoOpLogger`: discards everything (tests, benchmarks)
//!
//! ```
//! use datumshift::log::{Logger, NoOpLogger};
//! use datumshift::{log_debug, log_info};
//! use std::sync::Arc;
//!
//! struct GridLoader {
//!     logger: Arc<dyn Logger>,
//! }
//!
//! impl GridLoader {
//!     fn load(&self, path: &str) {
//!         log_info!(self.logger, "Loading grid {}", path);
//!         log_debug!(self.logger, "Grid {} ready", path);
//!     }
//! }
//!
//! GridLoader { logger: Arc::new(NoOpLogger) }.load("ntv2_0.gsb");
//! ```

mod noop;
mod tracing_adapter;
mod r#trait;

pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use tracing_adapter::TracingLogger;
