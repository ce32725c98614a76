//! Coverage-based entry selection.

use crate::coord::GeoPoint;

use super::entry::ShiftEntry;

/// Starting value for the best density; entries reporting a density at or
/// above it are never selected.
pub const DENSITY_CEILING: f64 = 9.9e100;

/// Picks the entry that should shift `point`.
///
/// Every entry is tested in catalog order and the one with the smallest
/// non-zero density wins. Comparison is strict, so among equal densities the
/// earliest entry wins. Returns `None` when nothing covers the point.
pub fn select<'a>(entries: &'a [ShiftEntry], point: &GeoPoint) -> Option<(usize, &'a ShiftEntry)> {
    let mut best = DENSITY_CEILING;
    let mut selected = None;

    for (index, entry) in entries.iter().enumerate() {
        let density = entry.test(point);
        if density != 0.0 && density < best {
            best = density;
            selected = Some((index, entry));
        }
    }

    selected
}
