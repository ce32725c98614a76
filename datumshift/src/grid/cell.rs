//! Interpolation cells and the lattice arithmetic shared by grids and cache.
//!
//! A grid file is a regular lattice of nodes, each carrying a longitude and a
//! latitude shift. A point is shifted by bilinear interpolation of the four
//! nodes around it. [`CellLattice::locate`] is the single place that decides
//! which cell a point falls in and where inside it; providers use it when they
//! build a cell and the cache uses it when it answers from a stored one, so a
//! cached answer is computed by exactly the same floating-point operations as
//! a fresh one.

use crate::coord::{GeoExtent, GeoPoint};

/// Identifies one cell of one (sub)grid of one engine entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    /// Index of the owning entry in catalog order
    pub entry: usize,
    /// Index of the subgrid within the file (0 for single-grid formats)
    pub subgrid: usize,
    /// Cell row, counted from the south edge
    pub row: u32,
    /// Cell column, counted from the west edge
    pub col: u32,
}

impl CellKey {
    /// Creates a key for a cell of entry 0; the owning entry stamps its index.
    pub fn new(subgrid: usize, row: u32, col: u32) -> Self {
        Self {
            entry: 0,
            subgrid,
            row,
            col,
        }
    }
}

/// Position of a point within a lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellLocation {
    pub row: u32,
    pub col: u32,
    /// Fraction of the cell width east of the cell's west edge (0..=1)
    pub x: f64,
    /// Fraction of the cell height north of the cell's south edge (0..=1)
    pub y: f64,
}

/// Geometry of a regular node lattice, in east-positive degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellLattice {
    /// Longitude of the westernmost node column
    pub origin_lon: f64,
    /// Latitude of the southernmost node row
    pub origin_lat: f64,
    /// Node spacing in longitude
    pub inc_lon: f64,
    /// Node spacing in latitude
    pub inc_lat: f64,
    /// Number of node columns (at least 2)
    pub cols: u32,
    /// Number of node rows (at least 2)
    pub rows: u32,
}

impl CellLattice {
    /// Creates a lattice, returning `None` when it would not contain a single
    /// cell or its spacing is not a positive finite number.
    pub fn new(
        origin_lon: f64,
        origin_lat: f64,
        inc_lon: f64,
        inc_lat: f64,
        cols: u32,
        rows: u32,
    ) -> Option<Self> {
        let spacing_ok = inc_lon.is_finite() && inc_lat.is_finite() && inc_lon > 0.0 && inc_lat > 0.0;
        let origin_ok = origin_lon.is_finite() && origin_lat.is_finite();
        if !spacing_ok || !origin_ok || cols < 2 || rows < 2 {
            return None;
        }
        Some(Self {
            origin_lon,
            origin_lat,
            inc_lon,
            inc_lat,
            cols,
            rows,
        })
    }

    /// Returns the rectangle spanned by the node lattice.
    pub fn extent(&self) -> GeoExtent {
        GeoExtent {
            west: self.origin_lon,
            south: self.origin_lat,
            east: self.origin_lon + self.inc_lon * f64::from(self.cols - 1),
            north: self.origin_lat + self.inc_lat * f64::from(self.rows - 1),
        }
    }

    /// Returns the rectangle of one cell.
    pub fn cell_extent(&self, row: u32, col: u32) -> GeoExtent {
        GeoExtent {
            west: self.origin_lon + self.inc_lon * f64::from(col),
            south: self.origin_lat + self.inc_lat * f64::from(row),
            east: self.origin_lon + self.inc_lon * f64::from(col + 1),
            north: self.origin_lat + self.inc_lat * f64::from(row + 1),
        }
    }

    /// Locates `point` in the lattice.
    ///
    /// Cells are half-open towards the north-east except along the lattice's
    /// own north and east edges, which belong to the last row and column.
    /// Returns `None` outside the lattice (or for NaN input).
    #[inline]
    pub fn locate(&self, point: &GeoPoint) -> Option<CellLocation> {
        let fx = (point.lon - self.origin_lon) / self.inc_lon;
        let fy = (point.lat - self.origin_lat) / self.inc_lat;
        let max_x = f64::from(self.cols - 1);
        let max_y = f64::from(self.rows - 1);

        if !(0.0..=max_x).contains(&fx) || !(0.0..=max_y).contains(&fy) {
            return None;
        }

        let col = (fx.floor() as u32).min(self.cols - 2);
        let row = (fy.floor() as u32).min(self.rows - 2);

        Some(CellLocation {
            row,
            col,
            x: fx - f64::from(col),
            y: fy - f64::from(row),
        })
    }
}

/// Memoised interpolation data for one grid cell.
///
/// Corner shifts are folded into bilinear coefficients so evaluating a point
/// is four multiply-adds per axis.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    key: CellKey,
    lattice: CellLattice,
    lon_coef: [f64; 4],
    lat_coef: [f64; 4],
    exclusive: bool,
}

impl GridCell {
    /// Builds a cell from its four corner shifts in degrees (longitude east
    /// positive), ordered south-west, south-east, north-west, north-east.
    pub fn new(
        key: CellKey,
        lattice: CellLattice,
        lon_corners: [f64; 4],
        lat_corners: [f64; 4],
    ) -> Self {
        Self {
            key,
            lattice,
            lon_coef: coefficients(lon_corners),
            lat_coef: coefficients(lat_corners),
            exclusive: true,
        }
    }

    /// Marks whether no other part of the same grid overlaps this cell.
    pub fn with_exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    pub fn key(&self) -> CellKey {
        self.key
    }

    pub(crate) fn set_entry(&mut self, entry: usize) {
        self.key.entry = entry;
    }

    pub fn lattice(&self) -> &CellLattice {
        &self.lattice
    }

    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    /// Returns the rectangle this cell covers.
    pub fn extent(&self) -> GeoExtent {
        self.lattice.cell_extent(self.key.row, self.key.col)
    }

    /// Shifts `point` if the lattice places it in this cell.
    #[inline]
    pub fn shift(&self, point: &GeoPoint) -> Option<GeoPoint> {
        let loc = self.lattice.locate(point)?;
        if loc.row != self.key.row || loc.col != self.key.col {
            return None;
        }
        let dlon = evaluate(&self.lon_coef, loc.x, loc.y);
        let dlat = evaluate(&self.lat_coef, loc.x, loc.y);
        Some(point.offset(dlon, dlat))
    }
}

#[inline]
fn coefficients([sw, se, nw, ne]: [f64; 4]) -> [f64; 4] {
    [sw, se - sw, nw - sw, sw - se - nw + ne]
}

#[inline]
fn evaluate(c: &[f64; 4], x: f64, y: f64) -> f64 {
    c[0] + c[1] * x + c[2] * y + c[3] * x * y
}
