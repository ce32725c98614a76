//! Grid provider factory for catalog-driven construction.
//!
//! The engine loader never names a concrete grid type. It hands each catalog
//! record to a [`GridProviderFactory`], so applications can add formats (or
//! tests can add instrumented providers) without touching the loader.

use super::nadcon::NadconGrid;
use super::ntv2::Ntv2Grid;
use super::types::{GridError, GridKind, GridProvider};
use crate::catalog::CatalogRecord;

/// Creates grid providers from catalog records.
pub trait GridProviderFactory: Send + Sync {
    /// Opens the grid a record refers to.
    fn open(&self, record: &CatalogRecord) -> Result<Box<dyn GridProvider>, GridError>;
}

/// Factory for the grid file formats supported out of the box.
///
/// The format is chosen by [`GridKind::detect`] from the record's flags and
/// file extension; the record's buffer size becomes the read buffer size.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileGridFactory;

impl FileGridFactory {
    pub fn new() -> Self {
        Self
    }
}

impl GridProviderFactory for FileGridFactory {
    fn open(&self, record: &CatalogRecord) -> Result<Box<dyn GridProvider>, GridError> {
        match GridKind::detect(&record.path, record.flags)? {
            GridKind::Ntv2 => Ok(Box::new(Ntv2Grid::open(&record.path, record.buffer_size)?)),
            GridKind::Nadcon => Ok(Box::new(NadconGrid::open(
                &record.path,
                record.buffer_size,
            )?)),
            GridKind::Custom => Err(GridError::UnsupportedFormat {
                path: record.path.clone(),
                reason: "custom grids need an application factory".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::binary::ByteOrder;
    use crate::grid::fixtures::{write_nadcon, write_ntv2, FixtureSubgrid};
    use std::path::PathBuf;

    fn zero(_lon: f64, _lat: f64) -> (f64, f64) {
        (0.0, 0.0)
    }

    fn record(path: PathBuf, flags: u32) -> CatalogRecord {
        CatalogRecord {
            path,
            buffer_size: 0,
            flags,
            density: 0.0,
            line: 1,
        }
    }

    #[test]
    fn test_opens_each_kind() {
        let dir = tempfile::TempDir::new().unwrap();
        let gsb = dir.path().join("a.gsb");
        write_ntv2(
            &gsb,
            &[FixtureSubgrid::new("A", "NONE", (0.0, 0.0), (1.0, 1.0), 0.5, zero)],
            ByteOrder::Little,
        );
        let base = dir.path().join("b");
        write_nadcon(&base, (0.0, 0.0), 0.5, 24, 3, zero);

        let factory = FileGridFactory::new();
        assert_eq!(factory.open(&record(gsb, 0)).unwrap().kind(), GridKind::Ntv2);
        assert_eq!(
            factory
                .open(&record(base.with_extension("los"), 0))
                .unwrap()
                .kind(),
            GridKind::Nadcon
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let factory = FileGridFactory::new();
        let result = factory.open(&record(PathBuf::from("/nonexistent/grid.gsb"), 0));
        assert!(matches!(result, Err(GridError::Io { .. })));
    }

    #[test]
    fn test_unknown_format() {
        let factory = FileGridFactory::new();
        let result = factory.open(&record(PathBuf::from("grid.xyz"), 0));
        assert!(matches!(result, Err(GridError::UnsupportedFormat { .. })));
    }
}
