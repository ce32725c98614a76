//! In-memory grids and loaders for engine unit tests.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::catalog::{CatalogDescriptor, CatalogError, CatalogReader, CatalogRecord};
use crate::coord::{GeoExtent, GeoPoint};
use crate::grid::{CellKey, CellLattice, GridCell, GridError, GridKind, GridProvider, GridProviderFactory};

/// Shift function in degrees, east and north positive.
pub type DegreeShift = fn(f64, f64) -> (f64, f64);

/// A gently varying shift of a few metres.
pub fn linear(lon: f64, lat: f64) -> (f64, f64) {
    (1e-4 + 2e-5 * lon, -5e-5 + 1e-5 * lat)
}

/// A shift whose fixed-point inverse diverges: the forward map has slope -0.5
/// in longitude, so each correction overshoots by half again.
pub fn divergent(lon: f64, _lat: f64) -> (f64, f64) {
    (-1.5 * lon, 0.0)
}

/// Square in-memory grid with shifts sampled from a function at its nodes.
pub struct MockGrid {
    name: String,
    lattice: CellLattice,
    shift: DegreeShift,
    exclusive: bool,
    failing: bool,
    misplaced: bool,
    fetches: Arc<AtomicUsize>,
    drops: Option<Arc<AtomicUsize>>,
}

impl MockGrid {
    pub fn new(name: &str, origin: (f64, f64), spacing: f64, nodes: u32, shift: DegreeShift) -> Self {
        Self {
            name: name.to_string(),
            lattice: CellLattice::new(origin.0, origin.1, spacing, spacing, nodes, nodes)
                .expect("valid mock lattice"),
            shift,
            exclusive: true,
            failing: false,
            misplaced: false,
            fetches: Arc::new(AtomicUsize::new(0)),
            drops: None,
        }
    }

    pub fn non_exclusive(mut self) -> Self {
        self.exclusive = false;
        self
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Always hands back the south-west cell, whatever the point.
    pub fn misplaced_cells(mut self) -> Self {
        self.misplaced = true;
        self
    }

    pub fn with_fetch_counter(mut self, counter: Arc<AtomicUsize>) -> Self {
        self.fetches = counter;
        self
    }

    pub fn with_drop_counter(mut self, counter: Arc<AtomicUsize>) -> Self {
        self.drops = Some(counter);
        self
    }

    pub fn name_str(&self) -> &str {
        &self.name
    }
}

impl Drop for MockGrid {
    fn drop(&mut self) {
        if let Some(drops) = &self.drops {
            drops.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl GridProvider for MockGrid {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> GridKind {
        GridKind::Custom
    }

    fn extent(&self) -> GeoExtent {
        self.lattice.extent()
    }

    fn test(&self, point: &GeoPoint) -> f64 {
        match self.lattice.locate(point) {
            Some(_) => self.lattice.inc_lon,
            None => 0.0,
        }
    }

    fn fetch_cell(&self, point: &GeoPoint) -> Result<GridCell, GridError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(GridError::Format {
                path: self.name.clone().into(),
                reason: "corrupt node data".to_string(),
            });
        }
        let loc = self.lattice.locate(point).ok_or_else(|| GridError::OutsideCoverage {
            name: self.name.clone(),
            point: *point,
        })?;
        let (row, col) = if self.misplaced { (0, 0) } else { (loc.row, loc.col) };
        let l = &self.lattice;
        let node = |row: u32, col: u32| {
            (self.shift)(
                l.origin_lon + l.inc_lon * f64::from(col),
                l.origin_lat + l.inc_lat * f64::from(row),
            )
        };
        let corners = [
            node(row, col),
            node(row, col + 1),
            node(row + 1, col),
            node(row + 1, col + 1),
        ];
        Ok(GridCell::new(
            CellKey::new(0, row, col),
            self.lattice,
            corners.map(|c| c.0),
            corners.map(|c| c.1),
        )
        .with_exclusive(self.exclusive))
    }

    fn release(&self) {}
}

/// Catalog reader returning a fixed descriptor.
pub struct StaticCatalog(pub CatalogDescriptor);

impl CatalogReader for StaticCatalog {
    fn read(&self, _path: &Path) -> Result<CatalogDescriptor, CatalogError> {
        Ok(self.0.clone())
    }
}

/// Builds a descriptor with one record per name.
pub fn descriptor(names: &[&str], fallback: Option<&str>) -> CatalogDescriptor {
    CatalogDescriptor {
        directory: "/grids".into(),
        records: names
            .iter()
            .enumerate()
            .map(|(i, name)| CatalogRecord {
                path: format!("/grids/{}", name).into(),
                buffer_size: 0,
                flags: 0,
                density: 0.0,
                line: i + 1,
            })
            .collect(),
        fallback: fallback.map(str::to_string),
    }
}

/// Factory handing out drop-counted mock grids, failing on one record.
pub struct CountingFactory {
    pub opened: Arc<AtomicUsize>,
    pub dropped: Arc<AtomicUsize>,
    /// Catalog line that fails to open
    pub fail_line: Option<usize>,
}

impl CountingFactory {
    pub fn new(fail_line: Option<usize>) -> Self {
        Self {
            opened: Arc::new(AtomicUsize::new(0)),
            dropped: Arc::new(AtomicUsize::new(0)),
            fail_line,
        }
    }

    pub fn live(&self) -> usize {
        self.opened.load(Ordering::SeqCst) - self.dropped.load(Ordering::SeqCst)
    }
}

impl GridProviderFactory for CountingFactory {
    fn open(&self, record: &CatalogRecord) -> Result<Box<dyn GridProvider>, GridError> {
        if self.fail_line == Some(record.line) {
            return Err(GridError::Io {
                path: record.path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing grid"),
            });
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        let offset = record.line as f64;
        let grid = MockGrid::new(
            &record.path.to_string_lossy(),
            (offset * 10.0, 0.0),
            0.5,
            5,
            linear,
        )
        .with_drop_counter(self.dropped.clone());
        Ok(Box::new(grid))
    }
}
