//! Shared helpers for integration tests: grid file writers and a scratch
//! directory holding a catalog.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Shift field in seconds: `(west, north)` at an east-positive lon/lat.
pub type ShiftFn = fn(f64, f64) -> (f64, f64);

/// NTv2 record header is eleven 16-byte records.
pub const NTV2_HEADER_LEN: usize = 176;

/// One NTv2 subgrid, bounds in east-positive degrees.
pub struct Subgrid {
    pub name: &'static str,
    pub parent: &'static str,
    pub south_west: (f64, f64),
    pub north_east: (f64, f64),
    pub spacing: f64,
    pub shift: ShiftFn,
}

fn label(out: &mut Vec<u8>, text: &str) {
    let mut field = [b' '; 8];
    field[..text.len()].copy_from_slice(text.as_bytes());
    out.extend_from_slice(&field);
}

fn int_record(out: &mut Vec<u8>, key: &str, value: i32) {
    label(out, key);
    out.extend_from_slice(&value.to_le_bytes());
    out.extend_from_slice(&[0u8; 4]);
}

fn text_record(out: &mut Vec<u8>, key: &str, value: &str) {
    label(out, key);
    label(out, value);
}

fn real_record(out: &mut Vec<u8>, key: &str, value: f64) {
    label(out, key);
    out.extend_from_slice(&value.to_le_bytes());
}

/// Writes a little-endian NTv2 file in seconds.
pub fn write_ntv2(path: &Path, subgrids: &[Subgrid]) {
    let mut out = Vec::new();
    int_record(&mut out, "NUM_OREC", 11);
    int_record(&mut out, "NUM_SREC", 11);
    int_record(&mut out, "NUM_FILE", subgrids.len() as i32);
    text_record(&mut out, "GS_TYPE", "SECONDS");
    text_record(&mut out, "VERSION", "NTv2.0");
    text_record(&mut out, "SYSTEM_F", "NAD27");
    text_record(&mut out, "SYSTEM_T", "NAD83");
    real_record(&mut out, "MAJOR_F", 6378206.4);
    real_record(&mut out, "MINOR_F", 6356583.8);
    real_record(&mut out, "MAJOR_T", 6378137.0);
    real_record(&mut out, "MINOR_T", 6356752.314);

    for sub in subgrids {
        let (west, south) = sub.south_west;
        let (east, north) = sub.north_east;
        let cols = ((east - west) / sub.spacing).round() as usize + 1;
        let rows = ((north - south) / sub.spacing).round() as usize + 1;

        text_record(&mut out, "SUB_NAME", sub.name);
        text_record(&mut out, "PARENT", sub.parent);
        text_record(&mut out, "CREATED", "20240101");
        text_record(&mut out, "UPDATED", "20240101");
        real_record(&mut out, "S_LAT", south * 3600.0);
        real_record(&mut out, "N_LAT", north * 3600.0);
        real_record(&mut out, "E_LONG", -east * 3600.0);
        real_record(&mut out, "W_LONG", -west * 3600.0);
        real_record(&mut out, "LAT_INC", sub.spacing * 3600.0);
        real_record(&mut out, "LONG_INC", sub.spacing * 3600.0);
        int_record(&mut out, "GS_COUNT", (cols * rows) as i32);

        for row in 0..rows {
            let lat = south + sub.spacing * row as f64;
            // East to west
            for col in (0..cols).rev() {
                let lon = west + sub.spacing * col as f64;
                let (dw, dn) = (sub.shift)(lon, lat);
                for v in [dn as f32, dw as f32, 0.01, 0.01] {
                    out.extend_from_slice(&v.to_le_bytes());
                }
            }
        }
    }
    text_record(&mut out, "END", "");
    std::fs::write(path, out).unwrap();
}

/// Writes a NADCON `.las`/`.los` pair; `base` is the path without extension.
pub fn write_nadcon(base: &Path, origin: (f64, f64), spacing: f64, nc: usize, nr: usize, shift: ShiftFn) {
    let record_len = 4 * (nc + 1);
    for (extension, pick_lat) in [("las", true), ("los", false)] {
        let mut out = Vec::new();
        let mut header = vec![b' '; 56];
        header[..6].copy_from_slice(b"NADCON");
        out.extend_from_slice(&header);
        out.extend_from_slice(b"NADGRD  ");
        out.extend_from_slice(&(nc as i32).to_le_bytes());
        out.extend_from_slice(&(nr as i32).to_le_bytes());
        out.extend_from_slice(&1i32.to_le_bytes());
        for v in [origin.0, spacing, origin.1, spacing, 0.0] {
            out.extend_from_slice(&(v as f32).to_le_bytes());
        }
        out.resize(record_len.max(96), 0);
        out.truncate(record_len.max(96));

        for row in 0..nr {
            out.extend_from_slice(&0i32.to_le_bytes());
            let lat = origin.1 + spacing * row as f64;
            for col in 0..nc {
                let lon = origin.0 + spacing * col as f64;
                let (west, north) = shift(lon, lat);
                let v = if pick_lat { north } else { west };
                out.extend_from_slice(&(v as f32).to_le_bytes());
            }
        }
        std::fs::write(base.with_extension(extension), out).unwrap();
    }
}

/// Regional field: about 30 m west and 10 m north, varying slowly.
pub fn regional_shift(lon: f64, lat: f64) -> (f64, f64) {
    (1.0 + 0.05 * (lon + 100.0), 0.3 + 0.01 * (lat - 30.0))
}

/// Local field: the regional one plus a constant half-second offset.
pub fn local_shift(lon: f64, lat: f64) -> (f64, f64) {
    let (w, n) = regional_shift(lon, lat);
    (w + 0.5, n + 0.5)
}

/// Finer local refinement.
pub fn refined_shift(lon: f64, lat: f64) -> (f64, f64) {
    let (w, n) = regional_shift(lon, lat);
    (w + 0.75, n + 0.25)
}

/// Expected shifted point for a field in seconds.
pub fn apply(shift: ShiftFn, lon: f64, lat: f64) -> (f64, f64) {
    let (w, n) = shift(lon, lat);
    (lon - w / 3600.0, lat + n / 3600.0)
}

/// Scratch directory with the standard test grids:
///
/// * `conus.las/.los`: NADCON, [-100, -90] x [30, 40] at 0.25 degrees
/// * `local.gsb`: NTv2, parent [-96, -94] x [34, 36] at 0.1 degrees with a
///   child [-95.5, -95] x [34.5, 35] at 0.025 degrees
pub struct GridWorkspace {
    pub dir: TempDir,
}

impl GridWorkspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        write_nadcon(&dir.path().join("conus"), (-100.0, 30.0), 0.25, 41, 41, regional_shift);
        write_ntv2(
            &dir.path().join("local.gsb"),
            &[
                Subgrid {
                    name: "PARENT",
                    parent: "NONE",
                    south_west: (-96.0, 34.0),
                    north_east: (-94.0, 36.0),
                    spacing: 0.1,
                    shift: local_shift,
                },
                Subgrid {
                    name: "CHILD",
                    parent: "PARENT",
                    south_west: (-95.5, 34.5),
                    north_east: (-95.0, 35.0),
                    spacing: 0.025,
                    shift: refined_shift,
                },
            ],
        );
        Self { dir }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Writes a catalog file and returns its path.
    pub fn catalog(&self, name: &str, text: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, text).unwrap();
        path
    }
}
