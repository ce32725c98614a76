//! Catalog-driven engine construction.
//!
//! Construction is all or nothing. Partial state lives only in locals of
//! [`EngineBuilder::build_from_descriptor`], so an early return drops every
//! grid opened so far (in catalog order) and then the fallback before the
//! error reaches the caller.

use std::path::Path;
use std::sync::Arc;

use crate::cache::GridCellCache;
use crate::catalog::{CatalogDescriptor, CatalogReader, GdcCatalogReader};
use crate::config::{ConfigFileError, EngineConfig, EngineSettings};
use crate::fallback::{FallbackRegistry, FallbackTransformer};
use crate::grid::{FileGridFactory, GridProviderFactory};
use crate::log::{Logger, TracingLogger};
use crate::{log_debug, log_error, log_info};

use super::entry::{mark_contested, ShiftEntry};
use super::error::ResourceError;
use super::Engine;

/// Builder for [`Engine`] with injectable collaborators.
///
/// # Example
///
/// ```no_run
/// use datumshift::config::EngineConfig;
/// use datumshift::engine::EngineBuilder;
/// use std::path::Path;
///
/// let config = EngineConfig::load().unwrap_or_default();
/// let engine = EngineBuilder::new()
///     .with_config(config)
///     .build(Path::new("/usr/share/datumshift/Nad27ToNad83.gdc"))
///     .unwrap();
/// ```
pub struct EngineBuilder {
    config: EngineConfig,
    logger: Arc<dyn Logger>,
    reader: Box<dyn CatalogReader>,
    factory: Box<dyn GridProviderFactory>,
    registry: Option<FallbackRegistry>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    /// A builder using default settings, on-disk catalogs and grids, the
    /// built-in fallbacks and `tracing` output.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            logger: Arc::new(TracingLogger),
            reader: Box::new(GdcCatalogReader::new()),
            factory: Box::new(FileGridFactory::new()),
            registry: None,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_catalog_reader(mut self, reader: Box<dyn CatalogReader>) -> Self {
        self.reader = reader;
        self
    }

    pub fn with_grid_factory(mut self, factory: Box<dyn GridProviderFactory>) -> Self {
        self.factory = factory;
        self
    }

    /// Replaces the fallback registry. By default the built-in definitions
    /// overlaid with those from the configuration are used.
    pub fn with_fallback_registry(mut self, registry: FallbackRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Reads the catalog at `catalog_path` and builds the engine it describes.
    pub fn build(self, catalog_path: &Path) -> Result<Engine, ResourceError> {
        let descriptor = match self.reader.read(catalog_path) {
            Ok(d) => d,
            Err(source) => {
                log_error!(
                    self.logger,
                    "Failed to read catalog {}: {}",
                    catalog_path.display(),
                    source
                );
                return Err(ResourceError::Catalog {
                    path: catalog_path.to_path_buf(),
                    source,
                });
            }
        };
        self.build_from_descriptor(&descriptor)
    }

    /// Builds an engine from an already parsed catalog.
    pub fn build_from_descriptor(
        self,
        descriptor: &CatalogDescriptor,
    ) -> Result<Engine, ResourceError> {
        let logger = self.logger.clone();
        self.assemble(descriptor).map_err(|e| {
            log_error!(logger, "Engine construction failed: {}", e);
            e
        })
    }

    fn assemble(self, descriptor: &CatalogDescriptor) -> Result<Engine, ResourceError> {
        let settings = self.config.engine;
        validate_settings(&settings)?;

        let registry = match self.registry {
            Some(registry) => registry,
            None => self.config.fallback_registry(),
        };

        // Declared before the entries so an early return drops entries first
        let fallback: Option<Box<dyn FallbackTransformer>> = match descriptor.fallback.as_deref() {
            Some(name) if !name.trim().is_empty() => {
                let name = name.trim();
                let transformer =
                    registry
                        .create(name)
                        .map_err(|source| ResourceError::Fallback {
                            name: name.to_string(),
                            source,
                        })?;
                log_debug!(self.logger, "Fallback {} ready", transformer.name());
                Some(transformer)
            }
            _ => None,
        };

        let mut entries = Vec::with_capacity(descriptor.records.len());
        for (index, record) in descriptor.records.iter().enumerate() {
            let provider = self
                .factory
                .open(record)
                .map_err(|source| ResourceError::Grid {
                    path: record.path.clone(),
                    source,
                })?;
            log_debug!(
                self.logger,
                "Entry {}: {} grid {} (catalog line {}, density {})",
                index,
                provider.kind(),
                record.path.display(),
                record.line,
                record.density
            );
            entries.push(ShiftEntry::new(
                index,
                record.path.clone(),
                provider,
                record.density,
            ));
        }
        mark_contested(&mut entries);

        let cache = GridCellCache::new(settings.cache_capacity);

        log_info!(
            self.logger,
            "Datum shift engine ready: {} grid(s), fallback {}, cache capacity {}",
            entries.len(),
            fallback.as_ref().map(|f| f.name()).unwrap_or("none"),
            settings.cache_capacity
        );

        Ok(Engine::assemble(entries, fallback, cache, settings, self.logger))
    }
}

fn validate_settings(settings: &EngineSettings) -> Result<(), ConfigFileError> {
    let invalid = |key: &str, value: String, reason: &str| ConfigFileError::InvalidValue {
        section: "engine".to_string(),
        key: key.to_string(),
        value,
        reason: reason.to_string(),
    };
    if settings.max_iterations == 0 {
        return Err(invalid(
            "max_iterations",
            settings.max_iterations.to_string(),
            "must be a positive integer",
        ));
    }
    if !(settings.convergence_epsilon.is_finite() && settings.convergence_epsilon > 0.0) {
        return Err(invalid(
            "convergence_epsilon",
            settings.convergence_epsilon.to_string(),
            "must be a positive number of degrees",
        ));
    }
    Ok(())
}
