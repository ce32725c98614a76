//! Line parser for grid data catalogs.
//!
//! ```text
//! # NAD27 to NAD83
//! .\Canada\NTV2_0.gsb,0,0x0,0
//! ./usa/conus.las,8192,2,0.25
//! Fallback: NAD27
//! ```
//!
//! Each record line is `path,bufferSize,flags,density`; trailing fields may be
//! omitted and default to zero. Relative paths (including the legacy `.\`
//! form) are resolved against the catalog's directory. Lines starting with
//! `#` or `;` are comments.

use std::path::{Path, PathBuf};

use super::types::{CatalogDescriptor, CatalogError, CatalogRecord};

const FALLBACK_KEY: &str = "fallback";

/// Parses catalog text.
///
/// # Arguments
///
/// * `text` - Catalog contents
/// * `directory` - Directory relative record paths are resolved against
pub fn parse_catalog(text: &str, directory: &Path) -> Result<CatalogDescriptor, CatalogError> {
    let mut descriptor = CatalogDescriptor {
        directory: directory.to_path_buf(),
        ..Default::default()
    };

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if let Some(name) = directive_value(trimmed, FALLBACK_KEY) {
            if descriptor.fallback.is_some() {
                return Err(CatalogError::Syntax {
                    line,
                    reason: "fallback specified more than once".to_string(),
                });
            }
            if !name.is_empty() {
                descriptor.fallback = Some(name.to_string());
            }
            continue;
        }

        descriptor
            .records
            .push(parse_record(trimmed, line, directory)?);
    }

    Ok(descriptor)
}

/// Returns the value of a `Key: value` directive when the key matches.
fn directive_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let (head, value) = line.split_once(':')?;
    if head.trim().eq_ignore_ascii_case(key) {
        Some(value.trim())
    } else {
        None
    }
}

fn parse_record(line_text: &str, line: usize, directory: &Path) -> Result<CatalogRecord, CatalogError> {
    let mut fields = line_text.split(',').map(str::trim);

    let raw_path = fields.next().unwrap_or_default();
    if raw_path.is_empty() {
        return Err(CatalogError::Syntax {
            line,
            reason: "record has no grid path".to_string(),
        });
    }

    let buffer_size = match fields.next() {
        None | Some("") => 0,
        Some(v) => v.parse::<usize>().map_err(|_| CatalogError::InvalidValue {
            line,
            field: "bufferSize",
            value: v.to_string(),
        })?,
    };

    let flags = match fields.next() {
        None | Some("") => 0,
        Some(v) => parse_flags(v).ok_or_else(|| CatalogError::InvalidValue {
            line,
            field: "flags",
            value: v.to_string(),
        })?,
    };

    let density = match fields.next() {
        None | Some("") => 0.0,
        Some(v) => v
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite() && *d >= 0.0)
            .ok_or_else(|| CatalogError::InvalidValue {
                line,
                field: "density",
                value: v.to_string(),
            })?,
    };

    if let Some(extra) = fields.next() {
        return Err(CatalogError::Syntax {
            line,
            reason: format!("unexpected field '{}'", extra),
        });
    }

    Ok(CatalogRecord {
        path: resolve_path(raw_path, directory),
        buffer_size,
        flags,
        density,
        line,
    })
}

fn parse_flags(value: &str) -> Option<u32> {
    match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

/// Normalises separators and resolves relative paths against `directory`.
fn resolve_path(raw: &str, directory: &Path) -> PathBuf {
    let normalised = raw.replace('\\', "/");
    let relative = normalised.strip_prefix("./").unwrap_or(&normalised);
    let path = Path::new(relative);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        directory.join(path)
    }
}
