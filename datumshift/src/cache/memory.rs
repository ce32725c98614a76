//! In-memory grid cell cache with LRU eviction.

use parking_lot::Mutex;

use crate::cache::CacheStats;
use crate::coord::GeoPoint;
use crate::grid::{CellKey, GridCell};

/// Number of cells held when no capacity is configured.
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

#[derive(Debug)]
struct CacheSlot {
    cell: GridCell,
    /// Tick of the last insert or hit, for LRU eviction
    last_used: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    slots: Vec<CacheSlot>,
    tick: u64,
    stats: CacheStats,
}

impl CacheState {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

/// Bounded cache of recently used interpolation cells.
///
/// The cache is consulted before any grid entry. Callers must only insert
/// cells that are the sole source of truth for every point inside them (see
/// [`ShiftEntry`](crate::engine::ShiftEntry)); under that rule a hit returns
/// exactly what the engine would have computed without the cache.
///
/// The cell set is small, so lookups are a linear scan under one lock. A
/// capacity of zero disables caching entirely.
#[derive(Debug)]
pub struct GridCellCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

impl Default for GridCellCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl GridCellCache {
    /// Create a cache holding at most `capacity` cells.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(CacheState {
                slots: Vec::with_capacity(capacity),
                ..Default::default()
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    /// Shift `point` using a cached cell, if one contains it.
    pub fn try_get(&self, point: &GeoPoint) -> Option<GeoPoint> {
        if !self.is_enabled() {
            return None;
        }

        let mut state = self.state.lock();
        let tick = state.next_tick();

        let hit = state.slots.iter_mut().find_map(|slot| {
            let shifted = slot.cell.shift(point)?;
            slot.last_used = tick;
            Some(shifted)
        });

        match hit {
            Some(_) => state.stats.record_hit(),
            None => state.stats.record_miss(),
        }
        hit
    }

    /// Add a cell, evicting the least recently used one when full.
    ///
    /// Re-inserting a cell that is already held only refreshes it.
    pub fn insert(&self, cell: GridCell) {
        if !self.is_enabled() {
            return;
        }

        let mut state = self.state.lock();
        let tick = state.next_tick();
        let key = cell.key();

        if let Some(slot) = state.slots.iter_mut().find(|s| s.cell.key() == key) {
            slot.last_used = tick;
            return;
        }

        if state.slots.len() >= self.capacity {
            if let Some(oldest) = state
                .slots
                .iter()
                .enumerate()
                .min_by_key(|(_, s)| s.last_used)
                .map(|(i, _)| i)
            {
                state.slots.swap_remove(oldest);
                state.stats.record_eviction();
            }
        }

        state.slots.push(CacheSlot {
            cell,
            last_used: tick,
        });
        state.stats.record_insertion();
    }

    pub fn contains(&self, key: &CellKey) -> bool {
        self.state.lock().slots.iter().any(|s| s.cell.key() == *key)
    }

    pub fn len(&self) -> usize {
        self.state.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached cell. Statistics are kept.
    pub fn release(&self) {
        let mut state = self.state.lock();
        state.slots.clear();
        state.slots.shrink_to_fit();
    }

    /// Snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            entry_count: state.slots.len(),
            ..state.stats
        }
    }
}
