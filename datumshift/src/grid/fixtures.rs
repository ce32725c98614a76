//! Grid file writers for unit tests.

use std::path::Path;

use super::binary::ByteOrder;

/// Shift field in seconds: `(west, north)` for an east-positive lon/lat.
pub type ShiftFn = fn(f64, f64) -> (f64, f64);

/// One NTv2 subgrid to write, bounds in east-positive degrees.
pub struct FixtureSubgrid {
    pub name: &'static str,
    pub parent: &'static str,
    pub south_west: (f64, f64),
    pub north_east: (f64, f64),
    pub spacing: f64,
    pub shift: ShiftFn,
}

impl FixtureSubgrid {
    pub fn new(
        name: &'static str,
        parent: &'static str,
        south_west: (f64, f64),
        north_east: (f64, f64),
        spacing: f64,
        shift: ShiftFn,
    ) -> Self {
        Self {
            name,
            parent,
            south_west,
            north_east,
            spacing,
            shift,
        }
    }
}

fn label(out: &mut Vec<u8>, text: &str) {
    let mut field = [b' '; 8];
    field[..text.len()].copy_from_slice(text.as_bytes());
    out.extend_from_slice(&field);
}

fn int_record(out: &mut Vec<u8>, order: ByteOrder, key: &str, value: i32) {
    label(out, key);
    match order {
        ByteOrder::Little => out.extend_from_slice(&value.to_le_bytes()),
        ByteOrder::Big => out.extend_from_slice(&value.to_be_bytes()),
    }
    out.extend_from_slice(&[0u8; 4]);
}

fn text_record(out: &mut Vec<u8>, key: &str, value: &str) {
    label(out, key);
    label(out, value);
}

fn real_record(out: &mut Vec<u8>, order: ByteOrder, key: &str, value: f64) {
    label(out, key);
    match order {
        ByteOrder::Little => out.extend_from_slice(&value.to_le_bytes()),
        ByteOrder::Big => out.extend_from_slice(&value.to_be_bytes()),
    }
}

fn real32(out: &mut Vec<u8>, order: ByteOrder, value: f32) {
    match order {
        ByteOrder::Little => out.extend_from_slice(&value.to_le_bytes()),
        ByteOrder::Big => out.extend_from_slice(&value.to_be_bytes()),
    }
}

/// Writes an NTv2 file in seconds with the given subgrids.
pub fn write_ntv2(path: &Path, subgrids: &[FixtureSubgrid], order: ByteOrder) {
    let mut out = Vec::new();
    int_record(&mut out, order, "NUM_OREC", 11);
    int_record(&mut out, order, "NUM_SREC", 11);
    int_record(&mut out, order, "NUM_FILE", subgrids.len() as i32);
    text_record(&mut out, "GS_TYPE", "SECONDS");
    text_record(&mut out, "VERSION", "NTv2.0");
    text_record(&mut out, "SYSTEM_F", "NAD27");
    text_record(&mut out, "SYSTEM_T", "NAD83");
    real_record(&mut out, order, "MAJOR_F", 6378206.4);
    real_record(&mut out, order, "MINOR_F", 6356583.8);
    real_record(&mut out, order, "MAJOR_T", 6378137.0);
    real_record(&mut out, order, "MINOR_T", 6356752.314);

    for sub in subgrids {
        let (west, south) = sub.south_west;
        let (east, north) = sub.north_east;
        let cols = ((east - west) / sub.spacing).round() as usize + 1;
        let rows = ((north - south) / sub.spacing).round() as usize + 1;

        text_record(&mut out, "SUB_NAME", sub.name);
        text_record(&mut out, "PARENT", sub.parent);
        text_record(&mut out, "CREATED", "20240101");
        text_record(&mut out, "UPDATED", "20240101");
        real_record(&mut out, order, "S_LAT", south * 3600.0);
        real_record(&mut out, order, "N_LAT", north * 3600.0);
        real_record(&mut out, order, "E_LONG", -east * 3600.0);
        real_record(&mut out, order, "W_LONG", -west * 3600.0);
        real_record(&mut out, order, "LAT_INC", sub.spacing * 3600.0);
        real_record(&mut out, order, "LONG_INC", sub.spacing * 3600.0);
        int_record(&mut out, order, "GS_COUNT", (cols * rows) as i32);

        for row in 0..rows {
            let lat = south + sub.spacing * row as f64;
            // East to west
            for col in (0..cols).rev() {
                let lon = west + sub.spacing * col as f64;
                let (dw, dn) = (sub.shift)(lon, lat);
                real32(&mut out, order, dn as f32);
                real32(&mut out, order, dw as f32);
                real32(&mut out, order, 0.01);
                real32(&mut out, order, 0.01);
            }
        }
    }
    text_record(&mut out, "END", "");
    std::fs::write(path, out).unwrap();
}

/// Writes a NADCON `.las`/`.los` pair next to `base`.
pub fn write_nadcon(
    base: &Path,
    origin: (f64, f64),
    spacing: f64,
    nc: usize,
    nr: usize,
    shift: ShiftFn,
) {
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
        out.resize(record_len.max(out.len()), 0);
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
