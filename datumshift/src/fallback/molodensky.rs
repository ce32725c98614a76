//! Standard Molodensky three-parameter datum shift.
//!
//! Works directly on geodetic coordinates, so it needs no geocentric round
//! trip. Accuracy is a few metres for the classic continental datums. The
//! inverse applies the same formula with negated translations from the target
//! ellipsoid to the source one.

use crate::coord::GeoPoint;

use super::ellipsoid::Ellipsoid;
use super::types::{FallbackError, FallbackTransformer};

#[derive(Debug, Clone, Copy, PartialEq)]
struct MolodenskyStep {
    source: Ellipsoid,
    target: Ellipsoid,
    translation: [f64; 3],
}

impl MolodenskyStep {
    fn apply(&self, point: &GeoPoint) -> Result<GeoPoint, FallbackError> {
        let phi = point.lat.to_radians();
        let lam = point.lon.to_radians();
        let h = point.height.unwrap_or(0.0);
        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_lam, cos_lam) = lam.sin_cos();

        if cos_phi.abs() < 1e-12 {
            return Err(FallbackError::OutOfDomain(*point));
        }

        let src = &self.source;
        let a = src.a;
        let b = src.b();
        let e2 = src.e2();
        let da = self.target.a - src.a;
        let df = self.target.f - src.f;
        let [dx, dy, dz] = self.translation;

        let rn = src.prime_vertical_radius(phi);
        let rm = src.meridian_radius(phi);

        let dphi = (-dx * sin_phi * cos_lam - dy * sin_phi * sin_lam
            + dz * cos_phi
            + da * (rn * e2 * sin_phi * cos_phi) / a
            + df * (rm * a / b + rn * b / a) * sin_phi * cos_phi)
            / (rm + h);
        let dlam = (-dx * sin_lam + dy * cos_lam) / ((rn + h) * cos_phi);
        let dh = dx * cos_phi * cos_lam + dy * cos_phi * sin_lam + dz * sin_phi - da * a / rn
            + df * (b / a) * rn * sin_phi * sin_phi;

        let shifted = GeoPoint {
            lon: point.lon + dlam.to_degrees(),
            lat: point.lat + dphi.to_degrees(),
            height: point.height.map(|h| h + dh),
        };
        if !shifted.is_finite() {
            return Err(FallbackError::OutOfDomain(*point));
        }
        Ok(shifted)
    }
}

/// Molodensky transformation between two ellipsoids.
#[derive(Debug, Clone)]
pub struct Molodensky {
    name: String,
    forward: MolodenskyStep,
    inverse: MolodenskyStep,
}

impl Molodensky {
    /// # Arguments
    ///
    /// * `name` - Definition name
    /// * `source` - Ellipsoid of the source datum
    /// * `target` - Ellipsoid of the target datum
    /// * `translation` - Source to target origin shift `[dx, dy, dz]` in metres
    pub fn new(
        name: impl Into<String>,
        source: Ellipsoid,
        target: Ellipsoid,
        translation: [f64; 3],
    ) -> Self {
        let [dx, dy, dz] = translation;
        Self {
            name: name.into(),
            forward: MolodenskyStep {
                source,
                target,
                translation,
            },
            inverse: MolodenskyStep {
                source: target,
                target: source,
                translation: [-dx, -dy, -dz],
            },
        }
    }
}

impl FallbackTransformer for Molodensky {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward_shift(&self, point: &GeoPoint) -> Result<GeoPoint, FallbackError> {
        self.forward.apply(point)
    }

    fn inverse_shift(&self, point: &GeoPoint) -> Result<GeoPoint, FallbackError> {
        self.inverse.apply(point)
    }
}
