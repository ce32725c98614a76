//! INI serialization logic for converting `EngineConfig` → INI string.

use super::settings::EngineConfig;

/// Convert an `EngineConfig` to a commented INI string for saving.
pub(super) fn to_config_string(config: &EngineConfig) -> String {
    let mut out = format!(
        r#"[engine]
; Grid cells kept in memory for repeated lookups (0 disables the cache)
cache_capacity = {}
; Maximum forward evaluations per inverse transformation
max_iterations = {}
; Per-axis inverse convergence threshold, in degrees
convergence_epsilon = {:e}
"#,
        config.engine.cache_capacity,
        config.engine.max_iterations,
        config.engine.convergence_epsilon,
    );

    for def in &config.fallbacks {
        let [dx, dy, dz] = def.translation;
        out.push_str(&format!(
            "\n[fallback.{}]\nmethod = {}\nsource_ellipsoid = {}\ntarget_ellipsoid = {}\ndx = {}\ndy = {}\ndz = {}\n",
            def.name, def.method, def.source.name, def.target.name, dx, dy, dz
        ));
        if def.method == crate::fallback::FallbackMethod::Helmert {
            let [rx, ry, rz] = def.rotation_arcsec;
            out.push_str(&format!(
                "; Rotations in arc-seconds, position-vector convention\nrx = {}\nry = {}\nrz = {}\nscale_ppm = {}\n",
                rx, ry, rz, def.scale_ppm
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::{Ellipsoid, FallbackDefinition, FallbackMethod};

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.ini");

        let mut config = EngineConfig::default()
            .with_cache_capacity(64)
            .with_max_iterations(12)
            .with_convergence_epsilon(5e-10);
        config.fallbacks.push(FallbackDefinition {
            name: "CUSTOM".to_string(),
            method: FallbackMethod::Helmert,
            source: Ellipsoid::BESSEL1841,
            target: Ellipsoid::WGS84,
            translation: [1.5, -2.0, 3.25],
            rotation_arcsec: [0.1, 0.2, 0.3],
            scale_ppm: 1.5,
        });
        config.save_to(&config_path).unwrap();

        let loaded = EngineConfig::load_from(&config_path).unwrap();
        assert_eq!(loaded, config);
    }
}
