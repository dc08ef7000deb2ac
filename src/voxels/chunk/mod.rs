//! # Chunk Module
//!
//! This module provides the [`ChunkKey`] addressing type and the
//! [`ChunkColumn`] dense voxel grid, the unit of terrain generation.
//!
//! ## Storage
//!
//! A column is a `CHUNK_DIMENSION × WORLD_HEIGHT × CHUNK_DIMENSION` grid
//! of material ids with AIR (0) meaning empty. The grid is dense so the
//! greedy mesher can test any cell in O(1); the column builder keeps it
//! sparse in practice by only ever writing solid, exposed voxels.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::block::{block_type::BlockType, BlockTypeSize};

mod column_builder;

pub use column_builder::build_column;

/// The horizontal dimension (width and depth) of a chunk in voxels.
pub const CHUNK_DIMENSION: i32 = 16;
/// The number of voxels in a single horizontal plane of a chunk.
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The vertical extent of a chunk column in voxels.
pub const WORLD_HEIGHT: i32 = 128;
/// The number of `CHUNK_DIMENSION`-tall rows a column is partitioned into.
pub const NUM_ROWS: i32 = WORLD_HEIGHT / CHUNK_DIMENSION;
/// The total number of voxels in a chunk column.
pub const COLUMN_VOLUME: usize =
    (CHUNK_DIMENSION * WORLD_HEIGHT * CHUNK_DIMENSION) as usize;

/// Canonical address of a chunk column.
///
/// The key is a pure structural value: two equal coordinate pairs always
/// produce equal keys, and distinct pairs never collide. It is usable
/// directly as a cache key and serializes as a plain `{x, z}` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkKey {
    /// Chunk coordinate along the world X axis.
    pub x: i32,
    /// Chunk coordinate along the world Z axis.
    pub z: i32,
}

impl ChunkKey {
    /// Creates a key from chunk coordinates.
    pub fn new(x: i32, z: i32) -> Self {
        ChunkKey { x, z }
    }

    /// The world coordinates of this chunk's `(0, 0)` voxel corner.
    pub fn origin(&self) -> (i32, i32) {
        (self.x * CHUNK_DIMENSION, self.z * CHUNK_DIMENSION)
    }
}

impl fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.x, self.z)
    }
}

/// A dense voxel grid for one chunk column.
pub struct ChunkColumn {
    /// The chunk this column covers.
    pub key: ChunkKey,
    blocks: Vec<BlockTypeSize>,
}

impl ChunkColumn {
    /// Creates a column with every voxel empty.
    pub fn empty(key: ChunkKey) -> Self {
        ChunkColumn {
            key,
            blocks: vec![BlockType::AIR as BlockTypeSize; COLUMN_VOLUME],
        }
    }

    /// Creates a column completely filled with one material (for testing).
    #[allow(dead_code)]
    pub fn solid(key: ChunkKey, block: BlockType) -> Self {
        ChunkColumn {
            key,
            blocks: vec![block as BlockTypeSize; COLUMN_VOLUME],
        }
    }

    /// Creates a column with random sparse materials (for testing).
    ///
    /// # Arguments
    /// * `key` - The chunk coordinates of the column
    /// * `sparseness` - Fraction of voxels left empty, in `[0, 1]`
    #[allow(dead_code)]
    pub fn random(key: ChunkKey, sparseness: f64) -> Self {
        let mut column = ChunkColumn::empty(key);
        for block in column.blocks.iter_mut() {
            if fastrand::f64() >= sparseness {
                *block = BlockType::get_random_type() as BlockTypeSize;
            }
        }
        column
    }

    /// Linear index of a cell in the dense grid (and in any parallel
    /// mask over it, such as the mesher's visited bits).
    pub(crate) fn index_of(x: i32, y: i32, z: i32) -> usize {
        debug_assert!((0..CHUNK_DIMENSION).contains(&x));
        debug_assert!((0..WORLD_HEIGHT).contains(&y));
        debug_assert!((0..CHUNK_DIMENSION).contains(&z));
        (x + CHUNK_DIMENSION * y + CHUNK_DIMENSION * WORLD_HEIGHT * z) as usize
    }

    /// The material id at chunk-local coordinates.
    pub fn get(&self, x: i32, y: i32, z: i32) -> BlockTypeSize {
        self.blocks[Self::index_of(x, y, z)]
    }

    /// Writes a material id at chunk-local coordinates.
    pub fn set(&mut self, x: i32, y: i32, z: i32, block: BlockTypeSize) {
        self.blocks[Self::index_of(x, y, z)] = block;
    }

    /// Whether the voxel at chunk-local coordinates is solid.
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.get(x, y, z) != BlockType::AIR as BlockTypeSize
    }

    /// The number of solid voxels in the column.
    pub fn solid_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|block| **block != BlockType::AIR as BlockTypeSize)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_column_has_no_solid_voxels() {
        let column = ChunkColumn::empty(ChunkKey::new(0, 0));
        assert_eq!(column.solid_count(), 0);
    }

    #[test]
    fn set_and_get_round_trip() {
        let mut column = ChunkColumn::empty(ChunkKey::new(-3, 7));
        column.set(5, 100, 12, BlockType::STONE as BlockTypeSize);
        assert!(column.is_solid(5, 100, 12));
        assert_eq!(
            column.get(5, 100, 12),
            BlockType::STONE as BlockTypeSize
        );
        assert!(!column.is_solid(5, 99, 12));
    }

    #[test]
    fn key_display_and_origin() {
        let key = ChunkKey::new(-2, 5);
        assert_eq!(key.to_string(), "-2:5");
        assert_eq!(key.origin(), (-32, 80));
    }
}
