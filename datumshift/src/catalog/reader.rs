//! Catalog readers.

use std::path::Path;

use super::parser::parse_catalog;
use super::types::{CatalogDescriptor, CatalogError};

/// Source of catalog descriptors.
///
/// The engine loader reads its catalog through this trait so embedding
/// applications can keep catalogs somewhere other than plain files.
pub trait CatalogReader: Send + Sync {
    /// Reads and parses the catalog at `path`.
    fn read(&self, path: &Path) -> Result<CatalogDescriptor, CatalogError>;
}

/// Reads line-oriented catalog files from disk.
///
/// Relative record paths resolve against the catalog file's directory. A
/// catalog listing neither grids nor a fallback is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct GdcCatalogReader;

impl GdcCatalogReader {
    pub fn new() -> Self {
        Self
    }
}

impl CatalogReader for GdcCatalogReader {
    fn read(&self, path: &Path) -> Result<CatalogDescriptor, CatalogError> {
        let text = std::fs::read_to_string(path)?;
        let directory = path.parent().unwrap_or_else(|| Path::new("."));
        let descriptor = parse_catalog(&text, directory)?;
        if descriptor.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(descriptor)
    }
}
