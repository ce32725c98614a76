//! Fallback transformer trait and errors.

use thiserror::Error;

use crate::coord::GeoPoint;

/// Errors from building or running an analytic fallback.
#[derive(Debug, Error)]
pub enum FallbackError {
    /// No definition is registered under this name
    #[error("Unknown fallback '{0}'")]
    UnknownName(String),

    /// Ellipsoid name not recognised
    #[error("Unknown ellipsoid '{0}'")]
    UnknownEllipsoid(String),

    /// A definition parameter is missing or out of range
    #[error("Invalid fallback parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The point cannot be transformed by this method (e.g. at a pole)
    #[error("Point {0} is outside the domain of the fallback")]
    OutOfDomain(GeoPoint),

    /// The geocentric to geodetic conversion did not settle
    #[error("Geodetic conversion did not converge for {0}")]
    NonConvergent(GeoPoint),
}

/// An analytic datum shift used where no grid covers a point.
///
/// Implementations are complete datum transformations in their own right,
/// with lower precision than a grid. The engine holds at most one.
pub trait FallbackTransformer: Send + Sync {
    /// Definition name, for diagnostics.
    fn name(&self) -> &str;

    /// Shift a point from the source datum to the target datum.
    fn forward_shift(&self, point: &GeoPoint) -> Result<GeoPoint, FallbackError>;

    /// Shift a point from the target datum back to the source datum.
    fn inverse_shift(&self, point: &GeoPoint) -> Result<GeoPoint, FallbackError>;

    /// Whether [`inverse_shift`](Self::inverse_shift) is a native inverse the
    /// engine may delegate to instead of iterating.
    fn has_inverse(&self) -> bool {
        true
    }
}
