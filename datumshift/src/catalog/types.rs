//! Catalog types.

use std::path::PathBuf;

use thiserror::Error;

/// One grid file listed in a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRecord {
    /// Grid file path, already resolved against the catalog directory
    pub path: PathBuf,
    /// Read buffer size in bytes (0 = provider default)
    pub buffer_size: usize,
    /// Format flags; see [`GridKind`](crate::grid::GridKind) for the kind bits
    pub flags: u32,
    /// Precedence density (lower wins); 0 means use the grid's own cell size
    pub density: f64,
    /// Line number in the catalog file, for diagnostics
    pub line: usize,
}

/// Parsed contents of a grid data catalog.
///
/// Records keep the order in which the catalog lists them; that order is the
/// tie-break between grids of equal density.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogDescriptor {
    /// Directory relative record paths were resolved against
    pub directory: PathBuf,
    /// Grid records in catalog order
    pub records: Vec<CatalogRecord>,
    /// Name of the analytic fallback, if one is configured
    pub fallback: Option<String>,
}

impl CatalogDescriptor {
    /// Returns true if the catalog lists neither grids nor a fallback.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.fallback.is_none()
    }
}

/// Catalog reading and parsing errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be understood
    #[error("Catalog syntax error on line {line}: {reason}")]
    Syntax { line: usize, reason: String },

    /// A field held a value of the wrong type or range
    #[error("Invalid catalog value on line {line}: {field} = '{value}'")]
    InvalidValue {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// Nothing usable was listed
    #[error("Catalog lists no grid files and no fallback")]
    Empty,
}
