//! Datum shift engine
//!
//! An [`Engine`] holds the grids of one datum pair in catalog order, an
//! optional analytic fallback and a cell cache. It is built once by
//! [`EngineBuilder`] and then shared read-only between threads.
//!
//! A forward shift is answered by the first of:
//!
//! 1. a cached interpolation cell containing the point
//! 2. the covering grid with the smallest density
//! 3. the fallback
//!
//! and otherwise the point comes back unshifted with
//! [`ShiftStatus::NoCoverage`]. A grid that covers the point but fails is a
//! fatal error and never falls through to the fallback.
//!
//! The inverse iterates the forward shift; see [`Engine::inverse`].

mod builder;
mod entry;
mod error;
mod inverse;
mod selector;
mod status;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::EngineBuilder;
pub use entry::ShiftEntry;
pub use error::ResourceError;
pub use selector::{select, DENSITY_CEILING};
pub use status::ShiftStatus;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use crate::cache::{CacheStats, GridCellCache};
use crate::config::EngineSettings;
use crate::coord::GeoPoint;
use crate::fallback::FallbackTransformer;
use crate::grid::GridProvider;
use crate::log::Logger;
use crate::{log_error, log_info, log_trace};

/// Grid-based datum shift engine for one datum pair.
pub struct Engine {
    // Field order is drop order: entries, then fallback, then cache
    entries: Vec<ShiftEntry>,
    fallback: Option<Box<dyn FallbackTransformer>>,
    cache: GridCellCache,
    settings: EngineSettings,
    logger: Arc<dyn Logger>,
}

impl Engine {
    /// Builds an engine from the catalog at `catalog_path` with default
    /// settings.
    pub fn create(catalog_path: &Path) -> Result<Self, ResourceError> {
        EngineBuilder::new().build(catalog_path)
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Assembles an engine from already opened providers, for applications
    /// that manage their own grids.
    ///
    /// Each provider comes with its catalog density (0 to use the provider's
    /// own). Entry order is the order of `providers`.
    pub fn from_parts(
        providers: Vec<(Box<dyn GridProvider>, f64)>,
        fallback: Option<Box<dyn FallbackTransformer>>,
        settings: EngineSettings,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let mut entries: Vec<ShiftEntry> = providers
            .into_iter()
            .enumerate()
            .map(|(index, (provider, density))| {
                let path = PathBuf::from(provider.name());
                ShiftEntry::new(index, path, provider, density)
            })
            .collect();
        entry::mark_contested(&mut entries);
        let cache = GridCellCache::new(settings.cache_capacity);
        Self::assemble(entries, fallback, cache, settings, logger)
    }

    pub(crate) fn assemble(
        entries: Vec<ShiftEntry>,
        fallback: Option<Box<dyn FallbackTransformer>>,
        cache: GridCellCache,
        settings: EngineSettings,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            entries,
            fallback,
            cache,
            settings,
            logger,
        }
    }

    /// Shifts `point` from the source datum to the target datum.
    ///
    /// Returns the shifted point with [`ShiftStatus::Success`] or
    /// [`ShiftStatus::FallbackUsed`]. With no coverage and no fallback the
    /// input comes back unchanged with [`ShiftStatus::NoCoverage`]; on a
    /// fatal error the input comes back with [`ShiftStatus::Fatal`].
    pub fn forward(&self, point: &GeoPoint) -> (GeoPoint, ShiftStatus) {
        if let Some(shifted) = self.cache.try_get(point) {
            return (shifted, ShiftStatus::Success);
        }

        if let Some((index, entry)) = select(&self.entries, point) {
            return match entry.forward(point, &self.cache) {
                Ok(shifted) => (shifted, ShiftStatus::Success),
                Err(error) => {
                    log_error!(self.logger, "Entry {} failed at {}: {}", index, point, error);
                    (*point, ShiftStatus::Fatal(error))
                }
            };
        }

        match &self.fallback {
            Some(fallback) => match fallback.forward_shift(point) {
                Ok(shifted) => {
                    log_trace!(self.logger, "Fallback {} used at {}", fallback.name(), point);
                    (shifted, ShiftStatus::FallbackUsed)
                }
                Err(source) => {
                    let error = ResourceError::Fallback {
                        name: fallback.name().to_string(),
                        source,
                    };
                    (*point, ShiftStatus::Fatal(error))
                }
            },
            None => (*point, ShiftStatus::NoCoverage),
        }
    }

    /// Forward-shifts a batch in parallel. Results keep input order.
    pub fn forward_batch(&self, points: &[GeoPoint]) -> Vec<(GeoPoint, ShiftStatus)> {
        points.par_iter().map(|p| self.forward(p)).collect()
    }

    /// Inverse-shifts a batch in parallel. Results keep input order.
    pub fn inverse_batch(&self, points: &[GeoPoint]) -> Vec<(GeoPoint, ShiftStatus)> {
        points.par_iter().map(|p| self.inverse(p)).collect()
    }

    /// Drops decoded grid data and the cache contents. Everything is rebuilt
    /// lazily on the next shift.
    pub fn release(&self) {
        for entry in &self.entries {
            entry.release();
        }
        self.cache.release();
    }

    /// Returns every provider to its freshly opened state and empties the
    /// cache.
    pub fn reset(&self) {
        for entry in &self.entries {
            entry.reset();
        }
        self.cache.release();
    }

    /// Tears the engine down: entries first, then the fallback, then the cache.
    pub fn destroy(self) {
        log_info!(
            self.logger,
            "Destroying datum shift engine ({} grid(s))",
            self.entries.len()
        );
        drop(self);
    }

    pub fn entries(&self) -> &[ShiftEntry] {
        &self.entries
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    pub fn fallback_name(&self) -> Option<&str> {
        self.fallback.as_ref().map(|f| f.name())
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("entries", &self.entries)
            .field("fallback", &self.fallback_name())
            .field("cache", &self.cache)
            .field("settings", &self.settings)
            .finish()
    }
}
