//! # Heightfield Module
//!
//! This module provides the deterministic terrain height function and its
//! memoization cache.
//!
//! ## Architecture
//!
//! - [`FbmStack`] synthesizes fractal noise from three seeded Perlin
//!   channels.
//! - [`HeightfieldCache`] is a bounded, offset-indexed grid of 16-bit
//!   heights. Its storage is atomically shared, so worker threads that
//!   compute heights make them visible to every other holder of the cache
//!   without any message passing.
//! - [`Heightfield`] ties the two together: a memoized, pure
//!   `height(x, z)` over the infinite integer plane (zero outside the
//!   cache bounds).
//!
//! ## Sharing and races
//!
//! Cache cells are `AtomicI16` accessed with relaxed ordering. Two threads
//! may race to fill the same cell, but both compute the identical value
//! (the height function is pure), so last-write-wins is harmless. The
//! cache never stores different values for the same cell within one seed
//! and parameter set.

use std::sync::atomic::{AtomicI16, Ordering};
use std::sync::Arc;

use crate::biome::{BiomeError, BiomeParams};
use crate::persistence::PersistenceError;

mod fbm;

pub use fbm::FbmStack;

/// Extent of the default heightfield cache per axis, in voxels.
///
/// World coordinates in `[-MAP_BOUNDS/2, MAP_BOUNDS/2)` are cacheable;
/// anything outside is flat (height 0) by contract.
pub const MAP_BOUNDS: i32 = 1024;

/// Sentinel marking a cache cell that has not been computed yet.
///
/// Using `i16::MIN` keeps height 0 (sea level) a legitimate cached value,
/// so presence never has to be inferred from the height itself.
pub const UNSET_HEIGHT: i16 = i16::MIN;

/// A bounded, shareable grid of terrain heights.
///
/// The grid covers `bounds × bounds` cells indexed by
/// `(x + bounds/2, z + bounds/2)`. Cloning shares the underlying storage,
/// which is what makes the cache usable as the single shared-memory block
/// between the main thread and generation workers.
#[derive(Clone)]
pub struct HeightfieldCache {
    bounds: i32,
    cells: Arc<[AtomicI16]>,
}

impl HeightfieldCache {
    /// Creates an empty cache covering `bounds × bounds` cells.
    ///
    /// # Arguments
    /// * `bounds` - Cache extent per axis; must be positive and even
    pub fn new(bounds: i32) -> Self {
        debug_assert!(bounds > 0 && bounds % 2 == 0);
        let cells: Arc<[AtomicI16]> = (0..(bounds as usize * bounds as usize))
            .map(|_| AtomicI16::new(UNSET_HEIGHT))
            .collect();
        HeightfieldCache { bounds, cells }
    }

    /// The cache extent per axis.
    pub fn bounds(&self) -> i32 {
        self.bounds
    }

    /// Whether `(x, z)` falls inside the cacheable coordinate range.
    pub fn in_bounds(&self, x: i32, z: i32) -> bool {
        let offset = self.bounds / 2;
        x >= -offset && x < offset && z >= -offset && z < offset
    }

    fn index(&self, x: i32, z: i32) -> usize {
        let offset = self.bounds / 2;
        (x + offset) as usize + self.bounds as usize * (z + offset) as usize
    }

    /// Reads the cached height at `(x, z)`.
    ///
    /// # Returns
    /// `Some(height)` if the cell has been computed, `None` if it is unset
    /// or the coordinates are out of bounds.
    pub fn get(&self, x: i32, z: i32) -> Option<i32> {
        if !self.in_bounds(x, z) {
            return None;
        }
        match self.cells[self.index(x, z)].load(Ordering::Relaxed) {
            UNSET_HEIGHT => None,
            height => Some(height as i32),
        }
    }

    /// Stores a computed height at `(x, z)`; out-of-bounds writes are
    /// silently dropped.
    pub fn set(&self, x: i32, z: i32, height: i32) {
        if !self.in_bounds(x, z) {
            return;
        }
        self.cells[self.index(x, z)].store(height as i16, Ordering::Relaxed);
    }

    /// The read-only height lookup used by contexts that cannot compute
    /// noise themselves: a miss (unset cell or out-of-bounds coordinate)
    /// reads as height 0.
    pub fn read_height(&self, x: i32, z: i32) -> i32 {
        self.get(x, z).unwrap_or(0)
    }

    /// Clears every cell back to [`UNSET_HEIGHT`].
    ///
    /// Required after a seed or biome change; cached heights from the old
    /// parameter set would otherwise leak into the new terrain.
    pub fn reset(&self) {
        for cell in self.cells.iter() {
            cell.store(UNSET_HEIGHT, Ordering::Relaxed);
        }
    }

    /// Serializes the raw cell grid, sentinels included, as row-major
    /// little-endian 16-bit integers.
    pub fn export_bytes(&self) -> Vec<u8> {
        let snapshot: Vec<i16> = self
            .cells
            .iter()
            .map(|cell| cell.load(Ordering::Relaxed))
            .collect();
        bytemuck::cast_slice(&snapshot).to_vec()
    }

    /// Restores a cell grid previously produced by
    /// [`HeightfieldCache::export_bytes`].
    ///
    /// # Errors
    /// [`PersistenceError::HeightfieldSizeMismatch`] if the buffer does
    /// not match this cache's `bounds × bounds × 2` byte size.
    pub fn load_bytes(&self, bytes: &[u8]) -> Result<(), PersistenceError> {
        let expected = self.cells.len() * std::mem::size_of::<i16>();
        if bytes.len() != expected {
            return Err(PersistenceError::HeightfieldSizeMismatch {
                expected,
                found: bytes.len(),
            });
        }
        let heights: &[i16] = bytemuck::cast_slice(bytes);
        for (cell, height) in self.cells.iter().zip(heights) {
            cell.store(*height, Ordering::Relaxed);
        }
        Ok(())
    }
}

/// The deterministic, memoized terrain height function.
///
/// For a fixed seed and parameter set, `height(x, z)` always returns the
/// same value; the cache is a transparent memoization layer, not an
/// observable side channel.
pub struct Heightfield {
    fbm: FbmStack,
    params: BiomeParams,
    cache: HeightfieldCache,
}

impl Heightfield {
    /// Creates a heightfield with a fresh cache of [`MAP_BOUNDS`] extent.
    ///
    /// # Errors
    /// [`BiomeError`] if the parameter set fails validation.
    pub fn new(seed: &str, params: BiomeParams) -> Result<Self, BiomeError> {
        Self::with_cache(seed, params, HeightfieldCache::new(MAP_BOUNDS))
    }

    /// Creates a heightfield over an existing cache handle.
    ///
    /// This is the constructor used by generation workers: every worker
    /// gets its own `Heightfield` value, but all of them share one cache.
    ///
    /// # Errors
    /// [`BiomeError`] if the parameter set fails validation.
    pub fn with_cache(
        seed: &str,
        params: BiomeParams,
        cache: HeightfieldCache,
    ) -> Result<Self, BiomeError> {
        params.validate()?;
        Ok(Heightfield {
            fbm: FbmStack::new(seed),
            params,
            cache,
        })
    }

    /// The biome parameters this heightfield was built with.
    pub fn params(&self) -> &BiomeParams {
        &self.params
    }

    /// The backing cache handle.
    pub fn cache(&self) -> &HeightfieldCache {
        &self.cache
    }

    /// The terrain surface height at world coordinates `(x, z)`.
    ///
    /// Out-of-bounds coordinates always return 0 and never touch the
    /// cache; in-bounds coordinates are computed at most once per cache
    /// lifetime.
    pub fn height(&self, x: i32, z: i32) -> i32 {
        if !self.cache.in_bounds(x, z) {
            return 0;
        }
        if let Some(height) = self.cache.get(x, z) {
            return height;
        }
        let height = self.fbm.height(&self.params, x, z);
        self.cache.set(x, z, height);
        height
    }
}
