//! NADCON (`.las`/`.los`) grid provider.
//!
//! A NADCON grid is a pair of little-endian files with identical geometry:
//! `.las` holds latitude shifts and `.los` longitude shifts, both in
//! arc-seconds, longitude positive **west**. Each file is a sequence of
//! fixed-length records of `4 * (nc + 1)` bytes. Record 0 is the header
//! (56-byte ident, 8-byte program name, then `nc`, `nr`, `nz` as i32 and
//! `xmn`, `dx`, `ymn`, `dy`, `angle` as f32, all in degrees); record `r + 1`
//! holds one leading pad word then the `nc` values of row `r`, west to east,
//! rows south to north.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use super::binary::ByteOrder;
use super::cell::{CellKey, CellLattice, GridCell};
use super::types::{GridError, GridKind, GridProvider};
use super::DEFAULT_READ_BUFFER;
use crate::coord::{seconds_to_degrees, GeoExtent, GeoPoint};

/// Bytes of the header fields at the start of record 0.
const HEADER_FIELDS_LEN: usize = 96;
const ORDER: ByteOrder = ByteOrder::Little;

/// Geometry read from a NADCON header record.
#[derive(Debug, Clone, Copy, PartialEq)]
struct NadconHeader {
    nc: u32,
    nr: u32,
    xmn: f32,
    dx: f32,
    ymn: f32,
    dy: f32,
}

impl NadconHeader {
    fn record_len(&self) -> usize {
        4 * (self.nc as usize + 1)
    }
}

#[derive(Debug)]
struct NadconData {
    lat: Vec<f32>,
    lon: Vec<f32>,
}

/// NADCON grid file pair.
pub struct NadconGrid {
    name: String,
    las_path: PathBuf,
    los_path: PathBuf,
    buffer_size: usize,
    header: NadconHeader,
    lattice: CellLattice,
    density: f64,
    data: RwLock<Option<Arc<NadconData>>>,
}

impl NadconGrid {
    /// Opens a NADCON pair given either of its two files.
    ///
    /// The sibling file is found by swapping the extension, keeping its case.
    pub fn open(path: impl AsRef<Path>, buffer_size: usize) -> Result<Self, GridError> {
        let path = path.as_ref();
        let (las_path, los_path) = pair_paths(path)?;
        let buffer_size = if buffer_size == 0 {
            DEFAULT_READ_BUFFER
        } else {
            buffer_size
        };

        let header = read_header(&las_path)?;
        let los_header = read_header(&los_path)?;
        if header != los_header {
            return Err(GridError::format(
                &los_path,
                "geometry differs from the matching .las file",
            ));
        }

        let lattice = CellLattice::new(
            f64::from(header.xmn),
            f64::from(header.ymn),
            f64::from(header.dx),
            f64::from(header.dy),
            header.nc,
            header.nr,
        )
        .ok_or_else(|| GridError::format(&las_path, "degenerate grid geometry"))?;

        let name = las_path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| las_path.display().to_string());

        Ok(Self {
            name,
            las_path,
            los_path,
            buffer_size,
            header,
            density: lattice.inc_lon.max(lattice.inc_lat),
            lattice,
            data: RwLock::new(None),
        })
    }

    /// Returns true if shift data is currently held in memory.
    pub fn is_loaded(&self) -> bool {
        self.data.read().is_some()
    }

    fn load(&self) -> Result<Arc<NadconData>, GridError> {
        if let Some(data) = self.data.read().as_ref() {
            return Ok(Arc::clone(data));
        }

        let mut slot = self.data.write();
        if let Some(data) = slot.as_ref() {
            return Ok(Arc::clone(data));
        }

        let data = Arc::new(NadconData {
            lat: self.read_values(&self.las_path)?,
            lon: self.read_values(&self.los_path)?,
        });
        *slot = Some(Arc::clone(&data));
        Ok(data)
    }

    fn read_values(&self, path: &Path) -> Result<Vec<f32>, GridError> {
        let file = File::open(path).map_err(|e| GridError::io(path, e))?;
        let mut reader = BufReader::with_capacity(self.buffer_size, file);
        let record_len = self.header.record_len();

        reader
            .seek(SeekFrom::Start(record_len as u64))
            .map_err(|e| GridError::io(path, e))?;

        let nc = self.header.nc as usize;
        let mut values = Vec::with_capacity(nc * self.header.nr as usize);
        let mut record = vec![0u8; record_len];
        for _ in 0..self.header.nr {
            reader
                .read_exact(&mut record)
                .map_err(|e| GridError::io(path, e))?;
            for col in 0..nc {
                let v = ORDER.f32_at(&record, 4 + col * 4).unwrap_or(f32::NAN);
                if !v.is_finite() {
                    return Err(GridError::format(path, "non-finite shift value"));
                }
                values.push(v);
            }
        }
        Ok(values)
    }
}

/// Derives the `.las` and `.los` paths from either one.
fn pair_paths(path: &Path) -> Result<(PathBuf, PathBuf), GridError> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let upper = extension.chars().all(|c| c.is_ascii_uppercase());
    let (las, los) = if upper { ("LAS", "LOS") } else { ("las", "los") };

    match extension.to_ascii_lowercase().as_str() {
        "las" | "los" => Ok((path.with_extension(las), path.with_extension(los))),
        _ => Err(GridError::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: "NADCON grids need a .las or .los path".to_string(),
        }),
    }
}

fn read_header(path: &Path) -> Result<NadconHeader, GridError> {
    let file = File::open(path).map_err(|e| GridError::io(path, e))?;
    let mut raw = [0u8; HEADER_FIELDS_LEN];
    BufReader::new(file)
        .read_exact(&mut raw)
        .map_err(|e| GridError::io(path, e))?;

    let bad = || GridError::format(path, "truncated header");
    let nc = ORDER.i32_at(&raw, 64).ok_or_else(bad)?;
    let nr = ORDER.i32_at(&raw, 68).ok_or_else(bad)?;
    let nz = ORDER.i32_at(&raw, 72).ok_or_else(bad)?;
    let header = NadconHeader {
        nc: u32::try_from(nc).map_err(|_| GridError::format(path, "negative column count"))?,
        nr: u32::try_from(nr).map_err(|_| GridError::format(path, "negative row count"))?,
        xmn: ORDER.f32_at(&raw, 76).ok_or_else(bad)?,
        dx: ORDER.f32_at(&raw, 80).ok_or_else(bad)?,
        ymn: ORDER.f32_at(&raw, 84).ok_or_else(bad)?,
        dy: ORDER.f32_at(&raw, 88).ok_or_else(bad)?,
    };

    if nz != 1 {
        return Err(GridError::format(path, format!("expected nz = 1, found {}", nz)));
    }
    if header.record_len() < HEADER_FIELDS_LEN {
        return Err(GridError::format(
            path,
            format!("{} columns is too narrow for a NADCON record", header.nc),
        ));
    }
    Ok(header)
}

impl GridProvider for NadconGrid {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> GridKind {
        GridKind::Nadcon
    }

    fn extent(&self) -> GeoExtent {
        self.lattice.extent()
    }

    fn test(&self, point: &GeoPoint) -> f64 {
        if self.lattice.locate(point).is_some() {
            self.density
        } else {
            0.0
        }
    }

    fn fetch_cell(&self, point: &GeoPoint) -> Result<GridCell, GridError> {
        let loc = self
            .lattice
            .locate(point)
            .ok_or_else(|| GridError::OutsideCoverage {
                name: self.name.clone(),
                point: *point,
            })?;

        let data = self.load()?;
        let nc = self.header.nc as usize;
        let node = |row: u32, col: u32| -> (f64, f64) {
            let i = row as usize * nc + col as usize;
            (
                seconds_to_degrees(-f64::from(data.lon[i])),
                seconds_to_degrees(f64::from(data.lat[i])),
            )
        };
        let (sw_lon, sw_lat) = node(loc.row, loc.col);
        let (se_lon, se_lat) = node(loc.row, loc.col + 1);
        let (nw_lon, nw_lat) = node(loc.row + 1, loc.col);
        let (ne_lon, ne_lat) = node(loc.row + 1, loc.col + 1);

        Ok(GridCell::new(
            CellKey::new(0, loc.row, loc.col),
            self.lattice,
            [sw_lon, se_lon, nw_lon, ne_lon],
            [sw_lat, se_lat, nw_lat, ne_lat],
        ))
    }

    fn release(&self) {
        *self.data.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::fixtures::write_nadcon;

    fn shift(lon: f64, lat: f64) -> (f64, f64) {
        // seconds west, seconds north
        (-2.0 + 0.1 * (lon + 100.0), 0.5 + 0.05 * (lat - 30.0))
    }

    #[test]
    fn test_open_by_either_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let base = dir.path().join("conus");
        // 24 columns so a record is wider than the header fields
        write_nadcon(&base, (-100.0, 30.0), 0.25, 24, 5, shift);

        let from_las = NadconGrid::open(base.with_extension("las"), 0).unwrap();
        let from_los = NadconGrid::open(base.with_extension("los"), 0).unwrap();
        assert_eq!(from_las.name(), "conus");
        assert_eq!(from_las.extent(), from_los.extent());
        assert_eq!(from_las.kind(), GridKind::Nadcon);

        let extent = from_las.extent();
        assert_eq!(extent.west, -100.0);
        assert_eq!(extent.east, -100.0 + 0.25 * 23.0);
        assert_eq!(extent.north, 31.0);
    }

    #[test]
    fn test_interpolates_linear_field() {
        let dir = tempfile::TempDir::new().unwrap();
        let base = dir.path().join("conus");
        write_nadcon(&base, (-100.0, 30.0), 0.25, 24, 5, shift);
        let grid = NadconGrid::open(base.with_extension("las"), 0).unwrap();

        let point = GeoPoint::new(-98.61, 30.33);
        assert_eq!(grid.test(&point), 0.25);
        assert!(!grid.is_loaded());

        let shifted = grid.fetch_cell(&point).unwrap().shift(&point).unwrap();
        let (west, north) = shift(point.lon, point.lat);
        assert!((shifted.lon - (point.lon - west / 3600.0)).abs() < 1e-9);
        assert!((shifted.lat - (point.lat + north / 3600.0)).abs() < 1e-9);
        assert!(grid.is_loaded());

        grid.release();
        assert!(!grid.is_loaded());
    }

    #[test]
    fn test_outside_point() {
        let dir = tempfile::TempDir::new().unwrap();
        let base = dir.path().join("conus");
        write_nadcon(&base, (-100.0, 30.0), 0.25, 24, 5, shift);
        let grid = NadconGrid::open(base.with_extension("las"), 0).unwrap();

        let point = GeoPoint::new(-101.0, 30.5);
        assert_eq!(grid.test(&point), 0.0);
        assert!(matches!(
            grid.fetch_cell(&point),
            Err(GridError::OutsideCoverage { .. })
        ));
    }

    #[test]
    fn test_missing_sibling_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let base = dir.path().join("conus");
        write_nadcon(&base, (-100.0, 30.0), 0.25, 24, 5, shift);
        std::fs::remove_file(base.with_extension("los")).unwrap();

        assert!(matches!(
            NadconGrid::open(base.with_extension("las"), 0),
            Err(GridError::Io { .. })
        ));
    }

    #[test]
    fn test_narrow_grid_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let base = dir.path().join("narrow");
        write_nadcon(&base, (-100.0, 30.0), 0.25, 4, 5, shift);

        assert!(matches!(
            NadconGrid::open(base.with_extension("las"), 0),
            Err(GridError::Format { .. })
        ));
    }

    #[test]
    fn test_pair_paths_keep_case() {
        let (las, los) = pair_paths(Path::new("/g/CONUS.LOS")).unwrap();
        assert_eq!(las, PathBuf::from("/g/CONUS.LAS"));
        assert_eq!(los, PathBuf::from("/g/CONUS.LOS"));
        assert!(pair_paths(Path::new("/g/conus.gsb")).is_err());
    }
}
