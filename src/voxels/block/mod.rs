//! # Block Module
//!
//! This module provides the material definitions for the voxel terrain:
//! the [`BlockType`](block_type::BlockType) enum, its compact storage
//! type, and the RGB palette used when materials are baked into vertex
//! colors for the low-detail plane meshes.

use block_type::BlockType;

pub mod block_type;

/// The underlying integer type used to represent block types in memory.
/// This is used for efficient storage and serialization of block data.
pub type BlockTypeSize = u8;

/// Maps each block type to its linear RGB color.
///
/// The array is indexed by `BlockType` as a `usize`; AIR keeps a black
/// placeholder entry so the indices line up with the enum discriminants.
pub static BLOCK_TYPE_TO_COLOR: [[f32; 3]; 10] = [
    [0.000, 0.000, 0.000], // AIR (placeholder)
    [0.357, 0.612, 0.204], // GRASS
    [0.459, 0.702, 0.278], // GRASS_LIGHT
    [0.639, 0.576, 0.263], // DRY_GRASS
    [0.733, 0.678, 0.349], // DRY_GRASS_LIGHT
    [0.839, 0.761, 0.510], // SAND
    [0.910, 0.843, 0.620], // SAND_LIGHT
    [0.447, 0.443, 0.431], // STONE
    [0.569, 0.565, 0.549], // STONE_LIGHT
    [0.925, 0.941, 0.953], // SNOW
];

/// Looks up the palette color for a material.
pub fn color_for(block: BlockType) -> [f32; 3] {
    BLOCK_TYPE_TO_COLOR[block as usize]
}
