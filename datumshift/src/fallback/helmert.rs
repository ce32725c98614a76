//! Geocentric datum shifts: three-parameter translation and seven-parameter
//! Helmert similarity transform (position-vector rotation convention).
//!
//! Both convert to earth-centred coordinates on the source ellipsoid, apply
//! the transform, and convert back on the target ellipsoid. The rotation is
//! built as an exact orthonormal matrix, so the inverse is its transpose and
//! a forward/inverse round trip is exact to floating-point precision.

use crate::coord::GeoPoint;

use super::ellipsoid::Ellipsoid;
use super::types::{FallbackError, FallbackTransformer};

const ARCSEC_TO_RAD: f64 = std::f64::consts::PI / (180.0 * 3600.0);

type Matrix3 = [[f64; 3]; 3];

/// Seven-parameter Helmert transformation.
#[derive(Debug, Clone)]
pub struct Helmert7 {
    name: String,
    source: Ellipsoid,
    target: Ellipsoid,
    translation: [f64; 3],
    rotation: Matrix3,
    scale: f64,
}

impl Helmert7 {
    /// # Arguments
    ///
    /// * `name` - Definition name
    /// * `source` / `target` - Ellipsoids of the two datums
    /// * `translation` - `[dx, dy, dz]` in metres
    /// * `rotation_arcsec` - `[rx, ry, rz]` in arc-seconds, position-vector convention
    /// * `scale_ppm` - Scale difference in parts per million
    pub fn new(
        name: impl Into<String>,
        source: Ellipsoid,
        target: Ellipsoid,
        translation: [f64; 3],
        rotation_arcsec: [f64; 3],
        scale_ppm: f64,
    ) -> Self {
        let [rx, ry, rz] = rotation_arcsec.map(|r| r * ARCSEC_TO_RAD);
        Self {
            name: name.into(),
            source,
            target,
            translation,
            rotation: mul(&mul(&rot_z(rz), &rot_y(ry)), &rot_x(rx)),
            scale: 1.0 + scale_ppm * 1e-6,
        }
    }

    fn to_target(&self, xyz: [f64; 3]) -> [f64; 3] {
        let r = apply(&self.rotation, xyz);
        let t = self.translation;
        [
            t[0] + self.scale * r[0],
            t[1] + self.scale * r[1],
            t[2] + self.scale * r[2],
        ]
    }

    fn to_source(&self, xyz: [f64; 3]) -> [f64; 3] {
        let t = self.translation;
        let centred = [
            (xyz[0] - t[0]) / self.scale,
            (xyz[1] - t[1]) / self.scale,
            (xyz[2] - t[2]) / self.scale,
        ];
        apply(&transpose(&self.rotation), centred)
    }
}

/// Carries the input's dimensionality through a geocentric round trip.
fn finish(input: &GeoPoint, result: GeoPoint) -> GeoPoint {
    GeoPoint {
        height: input.height.and(result.height),
        ..result
    }
}

impl FallbackTransformer for Helmert7 {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward_shift(&self, point: &GeoPoint) -> Result<GeoPoint, FallbackError> {
        let xyz = self.to_target(self.source.to_geocentric(point));
        Ok(finish(point, self.target.from_geocentric(xyz)?))
    }

    fn inverse_shift(&self, point: &GeoPoint) -> Result<GeoPoint, FallbackError> {
        let xyz = self.to_source(self.target.to_geocentric(point));
        Ok(finish(point, self.source.from_geocentric(xyz)?))
    }
}

/// Three-parameter geocentric translation.
///
/// A Helmert transform with no rotation and unit scale; kept as its own type
/// so definitions read the way surveyors name them.
#[derive(Debug, Clone)]
pub struct GeocentricTranslation(Helmert7);

impl GeocentricTranslation {
    pub fn new(
        name: impl Into<String>,
        source: Ellipsoid,
        target: Ellipsoid,
        translation: [f64; 3],
    ) -> Self {
        Self(Helmert7::new(name, source, target, translation, [0.0; 3], 0.0))
    }
}

impl FallbackTransformer for GeocentricTranslation {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn forward_shift(&self, point: &GeoPoint) -> Result<GeoPoint, FallbackError> {
        self.0.forward_shift(point)
    }

    fn inverse_shift(&self, point: &GeoPoint) -> Result<GeoPoint, FallbackError> {
        self.0.inverse_shift(point)
    }
}

fn rot_x(t: f64) -> Matrix3 {
    let (s, c) = t.sin_cos();
    [[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]]
}

fn rot_y(t: f64) -> Matrix3 {
    let (s, c) = t.sin_cos();
    [[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]]
}

fn rot_z(t: f64) -> Matrix3 {
    let (s, c) = t.sin_cos();
    [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]]
}

fn mul(a: &Matrix3, b: &Matrix3) -> Matrix3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

fn transpose(m: &Matrix3) -> Matrix3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in m.iter().enumerate() {
        for (j, v) in row.iter().enumerate() {
            out[j][i] = *v;
        }
    }
    out
}

fn apply(m: &Matrix3, v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn osgb36() -> Helmert7 {
        Helmert7::new(
            "OSGB36",
            Ellipsoid::AIRY1830,
            Ellipsoid::WGS84,
            [446.448, -125.157, 542.060],
            [0.1502, 0.2470, 0.8421],
            -20.4894,
        )
    }

    #[test]
    fn test_small_angle_matches_first_order() {
        let t = 1e-6;
        let m = mul(&mul(&rot_z(3.0 * t), &rot_y(2.0 * t)), &rot_x(t));
        assert!((m[0][1] + 3.0 * t).abs() < 1e-11);
        assert!((m[0][2] - 2.0 * t).abs() < 1e-11);
        assert!((m[1][2] + t).abs() < 1e-11);
    }

    #[test]
    fn test_osgb36_shift_is_plausible() {
        // Greenwich area: OSGB36 to WGS84 moves points roughly 100 m
        let p = GeoPoint::new(-0.1, 51.5);
        let q = osgb36().forward_shift(&p).unwrap();
        assert!((q.lon - p.lon).abs() < 0.01);
        assert!((q.lat - p.lat).abs() < 0.01);
        assert!((q.lon - p.lon).abs() + (q.lat - p.lat).abs() > 1e-4);
        assert!(q.height.is_none());
    }

    #[test]
    fn test_round_trip_is_exact() {
        let t = osgb36();
        let p = GeoPoint::with_height(-3.2, 55.9, 80.0);
        let back = t.inverse_shift(&t.forward_shift(&p).unwrap()).unwrap();
        assert!((back.lon - p.lon).abs() < 1e-10);
        assert!((back.lat - p.lat).abs() < 1e-10);
        assert!((back.height.unwrap() - 80.0).abs() < 1e-5);
    }

    #[test]
    fn test_geocentric_translation_identity() {
        let t = GeocentricTranslation::new("ID", Ellipsoid::GRS80, Ellipsoid::GRS80, [0.0; 3]);
        let p = GeoPoint::new(10.0, 20.0);
        let q = t.forward_shift(&p).unwrap();
        assert!((q.lon - 10.0).abs() < 1e-11);
        assert!((q.lat - 20.0).abs() < 1e-11);
        assert_eq!(t.name(), "ID");
    }
}
