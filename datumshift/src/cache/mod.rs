//! Grid cell cache.
//!
//! Keeps the most recently used interpolation cells so repeated shifts in the
//! same neighbourhood skip the grid providers entirely.

mod memory;
mod stats;

pub use memory::{GridCellCache, DEFAULT_CACHE_CAPACITY};
pub use stats::CacheStats;
