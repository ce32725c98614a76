//! Grid provider types and traits

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::cell::GridCell;
use crate::coord::{CoordError, GeoExtent, GeoPoint};

/// Errors raised while opening or interpolating a grid shift file.
///
/// Every variant is fatal for the lookup that raised it: a grid that claims
/// coverage but cannot be read is a data-integrity problem, not a gap in
/// coverage.
#[derive(Debug, Error)]
pub enum GridError {
    /// The file could not be opened or read
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but its contents are not a valid grid
    #[error("Malformed grid file {path}: {reason}")]
    Format { path: PathBuf, reason: String },

    /// No provider understands this file
    #[error("Unsupported grid format for {path}: {reason}")]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// A cell was requested for a point the grid does not cover
    #[error("Point {point} is outside the coverage of grid {name}")]
    OutsideCoverage { name: String, point: GeoPoint },

    /// Header bounds do not form a valid extent
    #[error("Invalid grid extent: {0}")]
    InvalidExtent(#[from] CoordError),
}

impl GridError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn format(path: &Path, reason: impl Into<String>) -> Self {
        Self::Format {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Supported grid file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridKind {
    /// NTv2 `.gsb` binary grid with nested subgrids
    Ntv2,
    /// NADCON `.las`/`.los` binary grid pair
    Nadcon,
    /// Provider supplied by the embedding application
    Custom,
}

impl GridKind {
    /// Catalog flag value selecting the kind from the file extension.
    pub const FLAG_AUTO: u32 = 0x00;
    /// Catalog flag value forcing NTv2.
    pub const FLAG_NTV2: u32 = 0x01;
    /// Catalog flag value forcing NADCON.
    pub const FLAG_NADCON: u32 = 0x02;
    /// Bits of the catalog flags word that carry the kind.
    pub const FLAG_MASK: u32 = 0xFF;

    /// Determines the grid kind from catalog flags, falling back to the
    /// file extension when the flags leave it open.
    pub fn detect(path: &Path, flags: u32) -> Result<Self, GridError> {
        match flags & Self::FLAG_MASK {
            Self::FLAG_NTV2 => return Ok(Self::Ntv2),
            Self::FLAG_NADCON => return Ok(Self::Nadcon),
            Self::FLAG_AUTO => {}
            other => {
                return Err(GridError::UnsupportedFormat {
                    path: path.to_path_buf(),
                    reason: format!("unknown format flag 0x{:02x}", other),
                })
            }
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("gsb") => Ok(Self::Ntv2),
            Some("las") | Some("los") => Ok(Self::Nadcon),
            _ => Err(GridError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: "expected a .gsb, .las or .los file".to_string(),
            }),
        }
    }
}

impl fmt::Display for GridKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ntv2 => write!(f, "NTv2"),
            Self::Nadcon => write!(f, "NADCON"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

/// A source of datum shift corrections over a rectangular area.
///
/// Implementors wrap one grid file (or an in-memory equivalent). Coverage
/// testing must only consult header metadata; the shift data itself is loaded
/// lazily by [`fetch_cell`](Self::fetch_cell) and may be dropped again with
/// [`release`](Self::release).
pub trait GridProvider: Send + Sync {
    /// Returns the provider's name for logging and identification.
    fn name(&self) -> &str;

    /// Returns the file format this provider reads.
    fn kind(&self) -> GridKind;

    /// Returns the bounding rectangle of everything this grid covers.
    fn extent(&self) -> GeoExtent;

    /// Returns the native density (cell size in degrees) of the finest
    /// part of the grid covering `point`, or `0.0` when not covered.
    ///
    /// Real grids never report a density of exactly zero.
    fn test(&self, point: &GeoPoint) -> f64;

    /// Returns the interpolation cell enclosing `point`.
    ///
    /// The returned cell's key has `entry` set to zero; the owning entry
    /// stamps its own index.
    fn fetch_cell(&self, point: &GeoPoint) -> Result<GridCell, GridError>;

    /// Drops decoded shift data and open handles. Header metadata is kept
    /// and data is reloaded on next use.
    fn release(&self);

    /// Returns the provider to its freshly opened state.
    fn reset(&self) {
        self.release();
    }
}
