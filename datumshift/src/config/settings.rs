//! Configuration settings structs.

use crate::fallback::{FallbackDefinition, FallbackRegistry};

/// Complete engine configuration as loaded from `config.ini`.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub engine: EngineSettings,
    /// User fallback definitions from `[fallback.NAME]` sections, in file order
    pub fallbacks: Vec<FallbackDefinition>,
}

/// `[engine]` section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    /// Grid cells kept in the cell cache (0 disables the cache)
    pub cache_capacity: usize,
    /// Upper bound on forward evaluations per inverse call
    pub max_iterations: usize,
    /// Per-axis inverse convergence threshold in degrees
    pub convergence_epsilon: f64,
}

impl EngineConfig {
    /// Built-in fallback definitions overlaid with the configured ones.
    pub fn fallback_registry(&self) -> FallbackRegistry {
        let mut registry = FallbackRegistry::builtin();
        for def in &self.fallbacks {
            registry.register(def.clone());
        }
        registry
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.engine.cache_capacity = capacity;
        self
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.engine.max_iterations = iterations;
        self
    }

    pub fn with_convergence_epsilon(mut self, epsilon: f64) -> Self {
        self.engine.convergence_epsilon = epsilon;
        self
    }
}
