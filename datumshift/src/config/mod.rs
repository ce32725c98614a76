//! Engine configuration.
//!
//! Loaded from `~/.datumshift/config.ini` (or an explicit path). Missing files
//! and missing keys fall back to the defaults in [`defaults`].
//!
//! # Example
//!
//! ```
//! use datumshift::config::EngineConfig;
//!
//! let config = EngineConfig::from_ini_str("[engine]\nmax_iterations = 20\n").unwrap();
//! assert_eq!(config.engine.max_iterations, 20);
//! assert_eq!(config.engine.cache_capacity, 32);
//! ```

pub mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{DEFAULT_CACHE_CAPACITY, DEFAULT_CONVERGENCE_EPSILON, DEFAULT_MAX_ITERATIONS};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{EngineConfig, EngineSettings};
