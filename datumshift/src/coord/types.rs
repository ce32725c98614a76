//! Coordinate type definitions

use std::fmt;

/// A geographic coordinate in a single datum.
///
/// Longitude and latitude are in degrees (east and north positive). The
/// optional height is ellipsoidal height in metres; two-dimensional points
/// leave it unset and the engine never invents one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Longitude in degrees, east positive
    pub lon: f64,
    /// Latitude in degrees, north positive
    pub lat: f64,
    /// Ellipsoidal height in metres, if the point is three-dimensional
    pub height: Option<f64>,
}

impl GeoPoint {
    /// Creates a two-dimensional point.
    #[inline]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon,
            lat,
            height: None,
        }
    }

    /// Creates a three-dimensional point.
    #[inline]
    pub const fn with_height(lon: f64, lat: f64, height: f64) -> Self {
        Self {
            lon,
            lat,
            height: Some(height),
        }
    }

    /// Returns a copy of this point moved by the given lon/lat deltas (degrees).
    ///
    /// Height is carried through unchanged.
    #[inline]
    pub fn offset(&self, dlon: f64, dlat: f64) -> Self {
        Self {
            lon: self.lon + dlon,
            lat: self.lat + dlat,
            height: self.height,
        }
    }

    /// Returns true if both horizontal components are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.height {
            Some(h) => write!(f, "({:.9}, {:.9}, {:.4})", self.lon, self.lat, h),
            None => write!(f, "({:.9}, {:.9})", self.lon, self.lat),
        }
    }
}

/// A closed longitude/latitude rectangle in degrees.
///
/// Longitudes are east positive and must not wrap across the antimeridian:
/// `west <= east` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoExtent {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoExtent {
    /// Creates an extent, rejecting NaN and inverted bounds.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self, CoordError> {
        let all_numbers = [west, south, east, north].iter().all(|v| !v.is_nan());
        if !all_numbers || west > east || south > north {
            return Err(CoordError::InvalidExtent {
                west,
                south,
                east,
                north,
            });
        }
        Ok(Self {
            west,
            south,
            east,
            north,
        })
    }

    /// Returns true if the point lies inside or on the boundary.
    #[inline]
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lon >= self.west
            && point.lon <= self.east
            && point.lat >= self.south
            && point.lat <= self.north
    }

    /// Returns true if the two rectangles share any point, edges included.
    #[inline]
    pub fn intersects(&self, other: &GeoExtent) -> bool {
        self.west <= other.east
            && other.west <= self.east
            && self.south <= other.north
            && other.south <= self.north
    }

    /// Width in degrees of longitude.
    #[inline]
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Height in degrees of latitude.
    #[inline]
    pub fn height(&self) -> f64 {
        self.north - self.south
    }
}

impl fmt::Display for GeoExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}] x [{}, {}]",
            self.west, self.east, self.south, self.north
        )
    }
}

/// Errors that can occur when building coordinate values.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Extent has NaN or inverted bounds
    InvalidExtent {
        west: f64,
        south: f64,
        east: f64,
        north: f64,
    },
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidExtent {
                west,
                south,
                east,
                north,
            } => {
                write!(
                    f,
                    "Invalid extent: west={} south={} east={} north={}",
                    west, south, east, north
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
