//! Default values for all configuration settings.

use super::settings::*;

/// Cell cache capacity.
pub const DEFAULT_CACHE_CAPACITY: usize = crate::cache::DEFAULT_CACHE_CAPACITY;

/// Inverse solver iteration bound.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Inverse solver per-axis threshold, in degrees.
pub const DEFAULT_CONVERGENCE_EPSILON: f64 = 1e-9;

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            convergence_epsilon: DEFAULT_CONVERGENCE_EPSILON,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine: EngineSettings::default(),
            fallbacks: Vec::new(),
        }
    }
}
