//! Reference ellipsoids and geodetic/geocentric conversion.

use crate::coord::GeoPoint;

use super::types::FallbackError;

/// Geocentric conversion stops once latitude moves less than this (radians).
const GEODETIC_TOLERANCE: f64 = 1e-14;
const GEODETIC_MAX_ITERATIONS: usize = 20;

/// An oblate ellipsoid of revolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub name: &'static str,
    /// Semi-major axis in metres
    pub a: f64,
    /// Flattening
    pub f: f64,
}

impl Ellipsoid {
    pub const CLARKE1866: Ellipsoid = Ellipsoid {
        name: "CLARKE1866",
        a: 6_378_206.4,
        f: (6_378_206.4 - 6_356_583.8) / 6_378_206.4,
    };
    pub const GRS80: Ellipsoid = Ellipsoid {
        name: "GRS80",
        a: 6_378_137.0,
        f: 1.0 / 298.257_222_101,
    };
    pub const WGS84: Ellipsoid = Ellipsoid {
        name: "WGS84",
        a: 6_378_137.0,
        f: 1.0 / 298.257_223_563,
    };
    pub const INTL1924: Ellipsoid = Ellipsoid {
        name: "INTL1924",
        a: 6_378_388.0,
        f: 1.0 / 297.0,
    };
    pub const BESSEL1841: Ellipsoid = Ellipsoid {
        name: "BESSEL1841",
        a: 6_377_397.155,
        f: 1.0 / 299.152_812_8,
    };
    pub const AIRY1830: Ellipsoid = Ellipsoid {
        name: "AIRY1830",
        a: 6_377_563.396,
        f: 1.0 / 299.324_964_6,
    };
    pub const AUSTRALIAN: Ellipsoid = Ellipsoid {
        name: "AUSTRALIAN",
        a: 6_378_160.0,
        f: 1.0 / 298.25,
    };

    const KNOWN: [(&'static str, Ellipsoid); 13] = [
        ("CLARKE1866", Self::CLARKE1866),
        ("CLARKE66", Self::CLARKE1866),
        ("GRS80", Self::GRS80),
        ("GRS1980", Self::GRS80),
        ("WGS84", Self::WGS84),
        ("INTL1924", Self::INTL1924),
        ("INTERNATIONAL", Self::INTL1924),
        ("HAYFORD", Self::INTL1924),
        ("BESSEL1841", Self::BESSEL1841),
        ("BESSEL", Self::BESSEL1841),
        ("AIRY1830", Self::AIRY1830),
        ("AIRY", Self::AIRY1830),
        ("AUSTRALIAN", Self::AUSTRALIAN),
    ];

    /// Look up a well-known ellipsoid by name (case-insensitive).
    pub fn from_name(name: &str) -> Result<Ellipsoid, FallbackError> {
        let wanted = name.trim();
        Self::KNOWN
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(wanted))
            .map(|(_, e)| *e)
            .ok_or_else(|| FallbackError::UnknownEllipsoid(name.to_string()))
    }

    /// Semi-minor axis in metres.
    #[inline]
    pub fn b(&self) -> f64 {
        self.a * (1.0 - self.f)
    }

    /// First eccentricity squared.
    #[inline]
    pub fn e2(&self) -> f64 {
        self.f * (2.0 - self.f)
    }

    /// Prime vertical radius of curvature at latitude `phi` (radians).
    #[inline]
    pub fn prime_vertical_radius(&self, phi: f64) -> f64 {
        let s = phi.sin();
        self.a / (1.0 - self.e2() * s * s).sqrt()
    }

    /// Meridian radius of curvature at latitude `phi` (radians).
    #[inline]
    pub fn meridian_radius(&self, phi: f64) -> f64 {
        let s = phi.sin();
        let w2 = 1.0 - self.e2() * s * s;
        self.a * (1.0 - self.e2()) / (w2 * w2.sqrt())
    }

    /// Convert a geodetic point to earth-centred earth-fixed metres.
    ///
    /// A missing height is taken as zero.
    pub fn to_geocentric(&self, point: &GeoPoint) -> [f64; 3] {
        let phi = point.lat.to_radians();
        let lam = point.lon.to_radians();
        let h = point.height.unwrap_or(0.0);
        let n = self.prime_vertical_radius(phi);
        let (sin_phi, cos_phi) = phi.sin_cos();
        [
            (n + h) * cos_phi * lam.cos(),
            (n + h) * cos_phi * lam.sin(),
            (n * (1.0 - self.e2()) + h) * sin_phi,
        ]
    }

    /// Convert earth-centred earth-fixed metres to a geodetic point.
    pub fn from_geocentric(&self, xyz: [f64; 3]) -> Result<GeoPoint, FallbackError> {
        let [x, y, z] = xyz;
        let e2 = self.e2();
        let p = x.hypot(y);
        let lon = y.atan2(x);

        let mut phi = z.atan2(p * (1.0 - e2));
        let mut converged = false;

        for _ in 0..GEODETIC_MAX_ITERATIONS {
            let n = self.prime_vertical_radius(phi);
            let h = self.height_above(p, z, phi);
            let next = z.atan2(p * (1.0 - e2 * n / (n + h)));
            let delta = (next - phi).abs();
            phi = next;
            if delta < GEODETIC_TOLERANCE {
                converged = true;
                break;
            }
        }

        let h = self.height_above(p, z, phi);
        let point = GeoPoint::with_height(lon.to_degrees(), phi.to_degrees(), h);
        if !converged || !point.is_finite() {
            return Err(FallbackError::NonConvergent(point));
        }
        Ok(point)
    }

    /// Ellipsoidal height of a geocentric point with distance `p` from the
    /// polar axis, height `z` above the equator plane and latitude `phi`.
    ///
    /// Divides by whichever of sin and cos is larger so residual latitude
    /// error is not amplified near the poles or the equator.
    fn height_above(&self, p: f64, z: f64, phi: f64) -> f64 {
        let n = self.prime_vertical_radius(phi);
        let (sin_phi, cos_phi) = phi.sin_cos();
        if sin_phi.abs() > cos_phi.abs() {
            z / sin_phi - n * (1.0 - self.e2())
        } else {
            p / cos_phi - n
        }
    }
}
