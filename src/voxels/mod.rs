//! # Voxels Module
//!
//! Voxel-level terrain data: material definitions, the per-voxel
//! classifier, and the chunk column grid the mesher consumes.

pub mod block;
pub mod chunk;
pub mod classifier;

pub use block::{block_type::BlockType, BlockTypeSize};
pub use chunk::{build_column, ChunkColumn, ChunkKey};
pub use classifier::classify;
