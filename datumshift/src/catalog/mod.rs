//! Grid data catalogs
//!
//! A catalog lists the grid files for one datum pair, in precedence order,
//! and optionally names an analytic fallback used where no grid covers a
//! point. The engine loader consumes catalogs through [`CatalogReader`].

mod parser;
mod reader;
mod types;

pub use parser::parse_catalog;
pub use reader::{CatalogReader, GdcCatalogReader};
pub use types::{CatalogDescriptor, CatalogError, CatalogRecord};
