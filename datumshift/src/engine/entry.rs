//! One catalog entry: a grid provider plus its precedence.

use std::path::{Path, PathBuf};

use crate::cache::GridCellCache;
use crate::coord::{GeoExtent, GeoPoint};
use crate::grid::{GridKind, GridProvider};

use super::error::ResourceError;

/// A grid provider together with the catalog data that ranks it.
///
/// Entries are immutable after construction apart from
/// [`release`](Self::release) and [`reset`](Self::reset), which only touch
/// the provider's lazily loaded data.
pub struct ShiftEntry {
    index: usize,
    path: PathBuf,
    provider: Box<dyn GridProvider>,
    /// Catalog density; 0 defers to the provider
    density: f64,
    /// Extents of other entries overlapping this one
    contested: Vec<GeoExtent>,
}

impl ShiftEntry {
    /// # Arguments
    ///
    /// * `index` - Position of the entry in catalog order
    /// * `path` - Grid file path, for diagnostics
    /// * `provider` - Opened grid
    /// * `density` - Catalog density, or 0 to use the grid's native density
    pub fn new(index: usize, path: PathBuf, provider: Box<dyn GridProvider>, density: f64) -> Self {
        Self {
            index,
            path,
            provider,
            density,
            contested: Vec::new(),
        }
    }

    /// Records the extents of every other entry that overlaps this one.
    pub(crate) fn set_contested(&mut self, contested: Vec<GeoExtent>) {
        self.contested = contested;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        self.provider.name()
    }

    pub fn kind(&self) -> GridKind {
        self.provider.kind()
    }

    pub fn extent(&self) -> GeoExtent {
        self.provider.extent()
    }

    /// Coverage test: 0 when the entry does not cover `point`, otherwise its
    /// precedence density (smaller wins).
    ///
    /// Only header metadata is consulted.
    pub fn test(&self, point: &GeoPoint) -> f64 {
        let native = self.provider.test(point);
        if native == 0.0 || self.density == 0.0 {
            native
        } else {
            self.density
        }
    }

    /// Shift `point` with this entry's grid.
    ///
    /// The interpolation cell is offered to `cache` when every point inside
    /// it would select this entry and this cell; this is the only place the
    /// cache is populated.
    ///
    /// A provider that hands back a cell not containing `point` has broken
    /// its contract; that is reported as [`ResourceError::Software`].
    pub fn forward(&self, point: &GeoPoint, cache: &GridCellCache) -> Result<GeoPoint, ResourceError> {
        let mut cell = self
            .provider
            .fetch_cell(point)
            .map_err(|source| ResourceError::Grid {
                path: self.path.clone(),
                source,
            })?;
        cell.set_entry(self.index);

        let shifted = cell.shift(point).ok_or_else(|| {
            ResourceError::Software(format!(
                "grid {} returned cell {:?} which does not contain {}",
                self.provider.name(),
                cell.key(),
                point
            ))
        })?;

        if self.is_cacheable(&cell.extent(), cell.is_exclusive()) {
            cache.insert(cell);
        }
        Ok(shifted)
    }

    fn is_cacheable(&self, cell_extent: &GeoExtent, exclusive: bool) -> bool {
        exclusive && !self.contested.iter().any(|e| e.intersects(cell_extent))
    }

    /// Drops the provider's decoded data and handles.
    pub fn release(&self) {
        self.provider.release();
    }

    /// Returns the provider to its freshly opened state.
    pub fn reset(&self) {
        self.provider.reset();
    }
}

impl std::fmt::Debug for ShiftEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShiftEntry")
            .field("index", &self.index)
            .field("path", &self.path)
            .field("kind", &self.provider.kind())
            .field("density", &self.density)
            .field("contested", &self.contested.len())
            .finish()
    }
}

/// Fills in every entry's contested extents.
pub(crate) fn mark_contested(entries: &mut [ShiftEntry]) {
    let extents: Vec<GeoExtent> = entries.iter().map(ShiftEntry::extent).collect();
    for (i, entry) in entries.iter_mut().enumerate() {
        let own = extents[i];
        let contested = extents
            .iter()
            .enumerate()
            .filter(|(j, other)| *j != i && other.intersects(&own))
            .map(|(_, other)| *other)
            .collect();
        entry.set_contested(contested);
    }
}
