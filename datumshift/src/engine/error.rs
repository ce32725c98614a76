//! Engine error type.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigFileError;
use crate::fallback::FallbackError;
use crate::grid::GridError;

/// Failure to build an engine, or a fatal failure during a shift.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The catalog could not be read or parsed
    #[error("Failed to load catalog {path}: {source}")]
    Catalog {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },

    /// A grid could not be opened, or failed while shifting a point it covers
    #[error("Grid {path} failed: {source}")]
    Grid {
        path: PathBuf,
        #[source]
        source: GridError,
    },

    /// The fallback could not be built, or failed while shifting a point
    #[error("Fallback '{name}' failed: {source}")]
    Fallback {
        name: String,
        #[source]
        source: FallbackError,
    },

    /// Engine settings are unusable
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigFileError),

    /// Internal invariant broken
    #[error("Internal error: {0}")]
    Software(String),
}
