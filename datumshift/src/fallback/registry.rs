//! Named fallback definitions.
//!
//! Catalogs refer to their fallback by name. The registry maps those names to
//! parameter sets and builds the matching transformer. A handful of classic
//! legacy datums are built in; configuration files may add more or override
//! them.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::ellipsoid::Ellipsoid;
use super::helmert::{GeocentricTranslation, Helmert7};
use super::molodensky::Molodensky;
use super::types::{FallbackError, FallbackTransformer};

/// Which analytic model a definition uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackMethod {
    Molodensky,
    Geocentric,
    Helmert,
}

impl FromStr for FallbackMethod {
    type Err = FallbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "molodensky" => Ok(Self::Molodensky),
            "geocentric" | "3parameter" => Ok(Self::Geocentric),
            "helmert" | "7parameter" => Ok(Self::Helmert),
            other => Err(FallbackError::InvalidParameter {
                name: "method".to_string(),
                reason: format!("unknown method '{}'", other),
            }),
        }
    }
}

impl fmt::Display for FallbackMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Molodensky => write!(f, "molodensky"),
            Self::Geocentric => write!(f, "geocentric"),
            Self::Helmert => write!(f, "helmert"),
        }
    }
}

/// Parameters of one named fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackDefinition {
    pub name: String,
    pub method: FallbackMethod,
    pub source: Ellipsoid,
    pub target: Ellipsoid,
    /// `[dx, dy, dz]` in metres
    pub translation: [f64; 3],
    /// `[rx, ry, rz]` in arc-seconds (Helmert only)
    pub rotation_arcsec: [f64; 3],
    /// Scale difference in ppm (Helmert only)
    pub scale_ppm: f64,
}

impl FallbackDefinition {
    /// Three-parameter definition for Molodensky or geocentric translation.
    pub fn translation(
        name: impl Into<String>,
        method: FallbackMethod,
        source: Ellipsoid,
        target: Ellipsoid,
        translation: [f64; 3],
    ) -> Self {
        Self {
            name: name.into(),
            method,
            source,
            target,
            translation,
            rotation_arcsec: [0.0; 3],
            scale_ppm: 0.0,
        }
    }

    fn validate(&self) -> Result<(), FallbackError> {
        let mut params = self
            .translation
            .iter()
            .chain(self.rotation_arcsec.iter())
            .chain(std::iter::once(&self.scale_ppm));
        if params.any(|v| !v.is_finite()) {
            return Err(FallbackError::InvalidParameter {
                name: self.name.clone(),
                reason: "parameters must be finite".to_string(),
            });
        }
        if self.scale_ppm <= -1e6 {
            return Err(FallbackError::InvalidParameter {
                name: self.name.clone(),
                reason: format!("scale {} ppm collapses the transform", self.scale_ppm),
            });
        }
        Ok(())
    }

    /// Build the transformer this definition describes.
    pub fn build(&self) -> Result<Box<dyn FallbackTransformer>, FallbackError> {
        self.validate()?;
        let name = self.name.clone();
        Ok(match self.method {
            FallbackMethod::Molodensky => Box::new(Molodensky::new(
                name,
                self.source,
                self.target,
                self.translation,
            )),
            FallbackMethod::Geocentric => Box::new(GeocentricTranslation::new(
                name,
                self.source,
                self.target,
                self.translation,
            )),
            FallbackMethod::Helmert => Box::new(Helmert7::new(
                name,
                self.source,
                self.target,
                self.translation,
                self.rotation_arcsec,
                self.scale_ppm,
            )),
        })
    }
}

/// Name to definition lookup. Names are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct FallbackRegistry {
    definitions: HashMap<String, FallbackDefinition>,
}

impl FallbackRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in legacy datum definitions.
    pub fn builtin() -> Self {
        let m = FallbackMethod::Molodensky;

        let mut registry = Self::new();
        for def in [
            FallbackDefinition::translation(
                "NAD27",
                m,
                Ellipsoid::CLARKE1866,
                Ellipsoid::WGS84,
                [-8.0, 160.0, 176.0],
            ),
            FallbackDefinition::translation(
                "ED50",
                m,
                Ellipsoid::INTL1924,
                Ellipsoid::WGS84,
                [-87.0, -98.0, -121.0],
            ),
            FallbackDefinition::translation(
                "TOKYO",
                m,
                Ellipsoid::BESSEL1841,
                Ellipsoid::WGS84,
                [-148.0, 507.0, 685.0],
            ),
            FallbackDefinition::translation(
                "AGD66",
                m,
                Ellipsoid::AUSTRALIAN,
                Ellipsoid::WGS84,
                [-133.0, -48.0, 148.0],
            ),
            FallbackDefinition::translation(
                "NZGD49",
                m,
                Ellipsoid::INTL1924,
                Ellipsoid::WGS84,
                [84.0, -22.0, 209.0],
            ),
            FallbackDefinition {
                name: "OSGB36".to_string(),
                method: FallbackMethod::Helmert,
                source: Ellipsoid::AIRY1830,
                target: Ellipsoid::WGS84,
                translation: [446.448, -125.157, 542.060],
                rotation_arcsec: [0.1502, 0.2470, 0.8421],
                scale_ppm: -20.4894,
            },
        ] {
            registry.register(def);
        }
        registry
    }

    /// Add a definition, replacing any existing one with the same name.
    pub fn register(&mut self, definition: FallbackDefinition) {
        self.definitions
            .insert(definition.name.to_ascii_uppercase(), definition);
    }

    pub fn get(&self, name: &str) -> Option<&FallbackDefinition> {
        self.definitions.get(&name.trim().to_ascii_uppercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.definitions.values().map(|d| d.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Build the transformer registered under `name`.
    pub fn create(&self, name: &str) -> Result<Box<dyn FallbackTransformer>, FallbackError> {
        self.get(name)
            .ok_or_else(|| FallbackError::UnknownName(name.to_string()))?
            .build()
    }
}
