//! Analytic fallback transformations
//!
//! Used by the engine for points that no grid covers. Each transformer is a
//! complete datum shift with its own inverse, at metre-level rather than
//! grid-level accuracy.

mod ellipsoid;
mod helmert;
mod molodensky;
mod registry;
mod types;

pub use ellipsoid::Ellipsoid;
pub use helmert::{GeocentricTranslation, Helmert7};
pub use molodensky::Molodensky;
pub use registry::{FallbackDefinition, FallbackMethod, FallbackRegistry};
pub use types::{FallbackError, FallbackTransformer};
