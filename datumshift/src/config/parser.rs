//! INI parsing logic for converting `Ini` → `EngineConfig`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::EngineConfig;
use crate::fallback::{Ellipsoid, FallbackDefinition, FallbackMethod};

const FALLBACK_SECTION_PREFIX: &str = "fallback.";

/// Parse an `Ini` object into an `EngineConfig`.
///
/// Starts from `EngineConfig::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<EngineConfig, ConfigFileError> {
    let mut config = EngineConfig::default();

    // [engine] section
    if let Some(section) = ini.section(Some("engine")) {
        if let Some(v) = section.get("cache_capacity") {
            config.engine.cache_capacity =
                v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
                    section: "engine".to_string(),
                    key: "cache_capacity".to_string(),
                    value: v.to_string(),
                    reason: "must be a non-negative integer (0 disables the cache)".to_string(),
                })?;
        }
        if let Some(v) = section.get("max_iterations") {
            config.engine.max_iterations = v
                .trim()
                .parse()
                .ok()
                .filter(|n: &usize| *n >= 1)
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "engine".to_string(),
                    key: "max_iterations".to_string(),
                    value: v.to_string(),
                    reason: "must be a positive integer".to_string(),
                })?;
        }
        if let Some(v) = section.get("convergence_epsilon") {
            config.engine.convergence_epsilon = v
                .trim()
                .parse()
                .ok()
                .filter(|e: &f64| e.is_finite() && *e > 0.0)
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "engine".to_string(),
                    key: "convergence_epsilon".to_string(),
                    value: v.to_string(),
                    reason: "must be a positive number of degrees".to_string(),
                })?;
        }
    }

    // [fallback.NAME] sections
    for (name, section) in ini.iter() {
        let Some(name) = name else { continue };
        let Some(fallback) = name.strip_prefix(FALLBACK_SECTION_PREFIX) else {
            continue;
        };
        config
            .fallbacks
            .push(parse_fallback(name, fallback.trim(), section)?);
    }

    Ok(config)
}

fn parse_fallback(
    section_name: &str,
    name: &str,
    section: &Properties,
) -> Result<FallbackDefinition, ConfigFileError> {
    let invalid = |key: &str, value: &str, reason: String| ConfigFileError::InvalidValue {
        section: section_name.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("", "", "fallback section needs a name".to_string()));
    }

    let required = |key: &str| {
        section
            .get(key)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| invalid(key, "", "required".to_string()))
    };

    let method_text = required("method")?;
    let method: FallbackMethod = method_text
        .parse()
        .map_err(|e: crate::fallback::FallbackError| invalid("method", method_text, e.to_string()))?;

    let ellipsoid = |key: &str| -> Result<Ellipsoid, ConfigFileError> {
        let v = required(key)?;
        Ellipsoid::from_name(v).map_err(|e| invalid(key, v, e.to_string()))
    };
    let source = ellipsoid("source_ellipsoid")?;
    let target = ellipsoid("target_ellipsoid")?;

    let number = |key: &str| -> Result<f64, ConfigFileError> {
        match section.get(key).map(str::trim) {
            None | Some("") => Ok(0.0),
            Some(v) => v
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| invalid(key, v, "must be a finite number".to_string())),
        }
    };

    let translation = [number("dx")?, number("dy")?, number("dz")?];
    let rotation_arcsec = [number("rx")?, number("ry")?, number("rz")?];
    let scale_ppm = number("scale_ppm")?;

    if method != FallbackMethod::Helmert
        && (rotation_arcsec.iter().any(|r| *r != 0.0) || scale_ppm != 0.0)
    {
        return Err(invalid(
            "method",
            method_text,
            "rotation and scale are only valid with method = helmert".to_string(),
        ));
    }

    Ok(FallbackDefinition {
        name: name.to_string(),
        method,
        source,
        target,
        translation,
        rotation_arcsec,
        scale_ppm,
    })
}
