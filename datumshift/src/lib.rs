//! datumshift - Grid-based geodetic datum transformation
//!
//! Shifts coordinates between two geodetic datums using correction grids
//! (NTv2, NADCON) listed in a catalog, with an analytic fallback outside grid
//! coverage and an iterative inverse.
//!
//! # High-Level API
//!
//! ```no_run
//! use datumshift::coord::GeoPoint;
//! use datumshift::engine::{Engine, ShiftStatus};
//! use std::path::Path;
//!
//! let engine = Engine::create(Path::new("/usr/share/datumshift/Nad27ToNad83.gdc"))?;
//!
//! let (nad83, status) = engine.forward(&GeoPoint::new(-98.0, 39.0));
//! match status {
//!     ShiftStatus::Success => println!("grid shift: {}", nad83),
//!     ShiftStatus::FallbackUsed => println!("approximate: {}", nad83),
//!     other => eprintln!("not shifted: {}", other),
//! }
//!
//! let (nad27, _) = engine.inverse(&nad83);
//! # let _ = nad27;
//! # Ok::<(), datumshift::engine::ResourceError>(())
//! ```

pub mod cache;
pub mod catalog;
pub mod config;
pub mod coord;
pub mod engine;
pub mod fallback;
pub mod grid;
pub mod log;

/// Version of the datumshift library.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
