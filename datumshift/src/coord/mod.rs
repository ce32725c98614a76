//! Geographic coordinate types
//!
//! Provides the point and rectangle values that flow through the datum shift
//! engine. All values are plain `Copy` data; every engine operation returns a
//! new point rather than mutating its input.

mod types;

pub use types::{CoordError, GeoExtent, GeoPoint};

/// Converts an angle in arc-seconds to degrees.
#[inline]
pub fn seconds_to_degrees(seconds: f64) -> f64 {
    seconds / 3600.0
}

#[cfg(test)]
mod tests;
