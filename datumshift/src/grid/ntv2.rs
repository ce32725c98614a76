//! NTv2 (`.gsb`) grid provider.
//!
//! An NTv2 file is a sequence of 16-byte records: an 8-byte ASCII label and an
//! 8-byte value. The file starts with an 11-record overview header, followed
//! by one block per subgrid (an 11-record header and `GS_COUNT` node records)
//! and a closing `END` record. Subgrid bounds are stored in the header's
//! angular unit with longitudes positive **west**; nodes run from the
//! south-east corner westwards along each row, rows from south to north.
//! Either byte order is accepted and detected from the `NUM_OREC` value.
//!
//! Subgrids may nest: a child refines part of its parent. Coverage for a point
//! is answered by the finest subgrid containing it (earliest in the file on a
//! tie).

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use super::binary::{label_at, ByteOrder};
use super::cell::{CellKey, CellLattice, GridCell};
use super::types::{GridError, GridKind, GridProvider};
use super::DEFAULT_READ_BUFFER;
use crate::coord::{seconds_to_degrees, GeoExtent, GeoPoint};

/// Length of a header block (11 records of 16 bytes).
const HEADER_LEN: usize = 11 * RECORD_LEN;
const RECORD_LEN: usize = 16;
/// Node record: lat shift, lon shift, lat accuracy, lon accuracy (f32 each).
const NODE_LEN: usize = 16;
const OVERVIEW_RECORDS: i32 = 11;

/// Header metadata for one subgrid.
#[derive(Debug, Clone)]
struct Ntv2Subgrid {
    name: String,
    parent: String,
    lattice: CellLattice,
    extent: GeoExtent,
    density: f64,
    data_offset: u64,
    node_count: usize,
}

/// Decoded node shifts, one `[lat, lon]` pair per node in file order.
#[derive(Debug)]
struct Ntv2Data {
    nodes: Vec<Vec<[f32; 2]>>,
}

/// NTv2 grid shift file.
pub struct Ntv2Grid {
    name: String,
    path: PathBuf,
    buffer_size: usize,
    order: ByteOrder,
    /// Seconds per header/node unit
    unit: f64,
    extent: GeoExtent,
    subgrids: Vec<Ntv2Subgrid>,
    data: RwLock<Option<Arc<Ntv2Data>>>,
}

impl Ntv2Grid {
    /// Opens an NTv2 file and reads its headers.
    ///
    /// Node data is not read until the first cell is requested.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the `.gsb` file
    /// * `buffer_size` - Read buffer size in bytes (0 selects the default)
    pub fn open(path: impl AsRef<Path>, buffer_size: usize) -> Result<Self, GridError> {
        let path = path.as_ref().to_path_buf();
        let buffer_size = if buffer_size == 0 {
            DEFAULT_READ_BUFFER
        } else {
            buffer_size
        };

        let file = File::open(&path).map_err(|e| GridError::io(&path, e))?;
        let mut reader = BufReader::with_capacity(buffer_size, file);

        let mut overview = [0u8; HEADER_LEN];
        reader
            .read_exact(&mut overview)
            .map_err(|e| GridError::io(&path, e))?;

        if label_at(&overview, 0, 8).as_deref() != Some("NUM_OREC") {
            return Err(GridError::format(&path, "missing NUM_OREC overview record"));
        }
        let order = if ByteOrder::Little.i32_at(&overview, 8) == Some(OVERVIEW_RECORDS) {
            ByteOrder::Little
        } else if ByteOrder::Big.i32_at(&overview, 8) == Some(OVERVIEW_RECORDS) {
            ByteOrder::Big
        } else {
            return Err(GridError::format(
                &path,
                "NUM_OREC is not 11 in either byte order",
            ));
        };

        let subgrid_count = order
            .i32_at(&overview, 2 * RECORD_LEN + 8)
            .filter(|n| *n > 0)
            .ok_or_else(|| GridError::format(&path, "NUM_FILE must be positive"))?;

        let gs_type = label_at(&overview, 3 * RECORD_LEN + 8, 8).unwrap_or_default();
        let unit = match gs_type.to_ascii_uppercase().as_str() {
            "SECONDS" => 1.0,
            "MINUTES" => 60.0,
            "DEGREES" => 3600.0,
            other => {
                return Err(GridError::format(
                    &path,
                    format!("unsupported GS_TYPE '{}'", other),
                ))
            }
        };

        let mut subgrids = Vec::with_capacity(subgrid_count as usize);
        let mut offset = HEADER_LEN as u64;
        for _ in 0..subgrid_count {
            let mut header = [0u8; HEADER_LEN];
            reader
                .read_exact(&mut header)
                .map_err(|e| GridError::io(&path, e))?;

            let subgrid = parse_subgrid(&path, order, unit, &header, offset + HEADER_LEN as u64)?;
            let data_len = (subgrid.node_count * NODE_LEN) as u64;
            reader
                .seek(SeekFrom::Current(data_len as i64))
                .map_err(|e| GridError::io(&path, e))?;

            offset += HEADER_LEN as u64 + data_len;
            subgrids.push(subgrid);
        }

        let extent = subgrids
            .iter()
            .map(|s| s.extent)
            .reduce(|a, b| GeoExtent {
                west: a.west.min(b.west),
                south: a.south.min(b.south),
                east: a.east.max(b.east),
                north: a.north.max(b.north),
            })
            .ok_or_else(|| GridError::format(&path, "no subgrids"))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            path,
            buffer_size,
            order,
            unit,
            extent,
            subgrids,
            data: RwLock::new(None),
        })
    }

    /// Number of subgrids in the file.
    pub fn subgrid_count(&self) -> usize {
        self.subgrids.len()
    }

    /// Names of the subgrids paired with their parent names, in file order.
    pub fn subgrid_names(&self) -> Vec<(&str, &str)> {
        self.subgrids
            .iter()
            .map(|s| (s.name.as_str(), s.parent.as_str()))
            .collect()
    }

    /// Returns true if node data is currently held in memory.
    pub fn is_loaded(&self) -> bool {
        self.data.read().is_some()
    }

    /// Finest subgrid whose lattice contains the point.
    fn select_subgrid(&self, point: &GeoPoint) -> Option<usize> {
        let mut best = None;
        let mut best_density = f64::INFINITY;
        for (index, subgrid) in self.subgrids.iter().enumerate() {
            if subgrid.density < best_density && subgrid.lattice.locate(point).is_some() {
                best = Some(index);
                best_density = subgrid.density;
            }
        }
        best
    }

    fn load(&self) -> Result<Arc<Ntv2Data>, GridError> {
        if let Some(data) = self.data.read().as_ref() {
            return Ok(Arc::clone(data));
        }

        let mut slot = self.data.write();
        if let Some(data) = slot.as_ref() {
            return Ok(Arc::clone(data));
        }

        let data = Arc::new(self.read_nodes()?);
        *slot = Some(Arc::clone(&data));
        Ok(data)
    }

    fn read_nodes(&self) -> Result<Ntv2Data, GridError> {
        let file = File::open(&self.path).map_err(|e| GridError::io(&self.path, e))?;
        let mut reader = BufReader::with_capacity(self.buffer_size, file);

        let mut nodes = Vec::with_capacity(self.subgrids.len());
        for subgrid in &self.subgrids {
            reader
                .seek(SeekFrom::Start(subgrid.data_offset))
                .map_err(|e| GridError::io(&self.path, e))?;

            let mut raw = vec![0u8; subgrid.node_count * NODE_LEN];
            reader
                .read_exact(&mut raw)
                .map_err(|e| GridError::io(&self.path, e))?;

            let decoded = raw
                .chunks_exact(NODE_LEN)
                .map(|record| {
                    let lat = self.order.f32_at(record, 0).unwrap_or(f32::NAN);
                    let lon = self.order.f32_at(record, 4).unwrap_or(f32::NAN);
                    [lat, lon]
                })
                .collect::<Vec<_>>();

            if decoded.iter().any(|n| !n[0].is_finite() || !n[1].is_finite()) {
                return Err(GridError::format(
                    &self.path,
                    format!("non-finite shift in subgrid {}", subgrid.name),
                ));
            }
            nodes.push(decoded);
        }

        Ok(Ntv2Data { nodes })
    }
}

fn parse_subgrid(
    path: &Path,
    order: ByteOrder,
    unit: f64,
    header: &[u8],
    data_offset: u64,
) -> Result<Ntv2Subgrid, GridError> {
    if label_at(header, 0, 8).as_deref() != Some("SUB_NAME") {
        return Err(GridError::format(path, "missing SUB_NAME subgrid record"));
    }
    let name = label_at(header, 8, 8).unwrap_or_default();
    let parent = label_at(header, RECORD_LEN + 8, 8).unwrap_or_default();

    let value = |record: usize| -> Result<f64, GridError> {
        order
            .f64_at(header, record * RECORD_LEN + 8)
            .map(|v| v * unit)
            .filter(|v| v.is_finite())
            .ok_or_else(|| GridError::format(path, format!("bad value in subgrid {}", name)))
    };
    let s_lat = value(4)?;
    let n_lat = value(5)?;
    let e_long = value(6)?;
    let w_long = value(7)?;
    let lat_inc = value(8)?;
    let long_inc = value(9)?;
    let gs_count = order
        .i32_at(header, 10 * RECORD_LEN + 8)
        .filter(|n| *n > 0)
        .ok_or_else(|| GridError::format(path, format!("bad GS_COUNT in subgrid {}", name)))?;

    if lat_inc <= 0.0 || long_inc <= 0.0 || n_lat < s_lat || w_long < e_long {
        return Err(GridError::format(
            path,
            format!("inconsistent bounds in subgrid {}", name),
        ));
    }

    let cols = ((w_long - e_long) / long_inc).round() as u32 + 1;
    let rows = ((n_lat - s_lat) / lat_inc).round() as u32 + 1;
    if u64::from(cols) * u64::from(rows) != gs_count as u64 {
        return Err(GridError::format(
            path,
            format!(
                "subgrid {} declares {} nodes but its bounds give {}x{}",
                name, gs_count, cols, rows
            ),
        ));
    }

    // Positive-west seconds to east-positive degrees
    let lattice = CellLattice::new(
        seconds_to_degrees(-w_long),
        seconds_to_degrees(s_lat),
        seconds_to_degrees(long_inc),
        seconds_to_degrees(lat_inc),
        cols,
        rows,
    )
    .ok_or_else(|| GridError::format(path, format!("degenerate subgrid {}", name)))?;

    Ok(Ntv2Subgrid {
        extent: lattice.extent(),
        density: lattice.inc_lon.max(lattice.inc_lat),
        name,
        parent,
        lattice,
        data_offset,
        node_count: gs_count as usize,
    })
}

impl GridProvider for Ntv2Grid {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> GridKind {
        GridKind::Ntv2
    }

    fn extent(&self) -> GeoExtent {
        self.extent
    }

    fn test(&self, point: &GeoPoint) -> f64 {
        self.select_subgrid(point)
            .map(|index| self.subgrids[index].density)
            .unwrap_or(0.0)
    }

    fn fetch_cell(&self, point: &GeoPoint) -> Result<GridCell, GridError> {
        let outside = || GridError::OutsideCoverage {
            name: self.name.clone(),
            point: *point,
        };
        let index = self.select_subgrid(point).ok_or_else(outside)?;
        let subgrid = &self.subgrids[index];
        let loc = subgrid.lattice.locate(point).ok_or_else(outside)?;

        let data = self.load()?;
        let nodes = &data.nodes[index];
        let cols = subgrid.lattice.cols as usize;
        let scale = self.unit / 3600.0;

        // File columns run east to west
        let node = |row: u32, col: u32| -> (f64, f64) {
            let [lat, lon] = nodes[row as usize * cols + (cols - 1 - col as usize)];
            (-f64::from(lon) * scale, f64::from(lat) * scale)
        };
        let (sw_lon, sw_lat) = node(loc.row, loc.col);
        let (se_lon, se_lat) = node(loc.row, loc.col + 1);
        let (nw_lon, nw_lat) = node(loc.row + 1, loc.col);
        let (ne_lon, ne_lat) = node(loc.row + 1, loc.col + 1);

        let cell_extent = subgrid.lattice.cell_extent(loc.row, loc.col);
        let exclusive = !self.subgrids.iter().enumerate().any(|(other, s)| {
            other != index && s.density <= subgrid.density && s.extent.intersects(&cell_extent)
        });

        Ok(GridCell::new(
            CellKey::new(index, loc.row, loc.col),
            subgrid.lattice,
            [sw_lon, se_lon, nw_lon, ne_lon],
            [sw_lat, se_lat, nw_lat, ne_lat],
        )
        .with_exclusive(exclusive))
    }

    fn release(&self) {
        *self.data.write() = None;
    }
}
