//! Grid shift file providers
//!
//! A grid provider answers two questions about a point: does this grid cover
//! it (and how finely), and what is the interpolation cell around it. The
//! engine combines providers from a catalog; this module supplies the trait,
//! the cell arithmetic shared with the cache, and readers for the NTv2 and
//! NADCON formats.
//!
//! ```ignore
//! use datumshift::grid::{GridProvider, Ntv2Grid};
//! use datumshift::coord::GeoPoint;
//!
//! let grid = Ntv2Grid::open("ntv2_0.gsb", 0)?;
//! let point = GeoPoint::new(-75.7, 45.4);
//! if grid.test(&point) > 0.0 {
//!     let shifted = grid.fetch_cell(&point)?.shift(&point);
//! }
//! ```

mod binary;
mod cell;
mod factory;
mod nadcon;
mod ntv2;
mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use binary::ByteOrder;
pub use cell::{CellKey, CellLattice, CellLocation, GridCell};
pub use factory::{FileGridFactory, GridProviderFactory};
pub use nadcon::NadconGrid;
pub use ntv2::Ntv2Grid;
pub use types::{GridError, GridKind, GridProvider};

/// Read buffer size used when a catalog record leaves it at zero.
pub const DEFAULT_READ_BUFFER: usize = 64 * 1024;
