#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Terrain
//!
//! The procedural terrain core of a voxel game client: deterministic
//! fractal heightfield synthesis, per-voxel material classification,
//! greedy volume meshing, low-detail plane meshes, chunk caching and
//! persistence, and a worker pool that ties the pipeline together.
//!
//! ## Key Modules
//!
//! * `biome` - Validated terrain/painting parameter sets
//! * `heightfield` - The memoized fractal height function and its
//!   shareable cache
//! * `voxels` - Materials, the per-voxel classifier, and the chunk
//!   column builder
//! * `meshing` - Greedy merging of voxels into box volumes
//! * `chunk_cache` - Bounded LRU storage of generated chunks
//! * `plane` - Low-detail heightmap meshes and their merger
//! * `persistence` - Binary heightfield and chunk-volume formats
//! * `generation` - The worker pool and batched generation requests
//!
//! ## Data Flow
//!
//! ```text
//! heightfield -> classifier -> column builder -> greedy mesher
//!      |                                              |
//!      +--> plane builder -> plane merger             +--> chunk cache
//! ```
//!
//! Rendering, physics, input and networking are external collaborators:
//! this crate produces geometry and owns its lifecycle, nothing more.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use voxel_terrain::biome::BiomeParams;
//! use voxel_terrain::generation::{DetailLevel, GenerationJob, GenerationPool};
//! use voxel_terrain::heightfield::Heightfield;
//! use voxel_terrain::voxels::ChunkKey;
//!
//! let heightfield = Heightfield::new("my_seed", BiomeParams::default()).unwrap();
//! let mut pool = GenerationPool::new(2, Arc::new(heightfield));
//! let outcomes = pool.generate_batch(vec![GenerationJob {
//!     key: ChunkKey::new(0, 0),
//!     detail: DetailLevel::Full,
//! }]);
//! assert!(outcomes[0].result.is_ok());
//! ```

pub mod biome;
pub mod chunk_cache;
pub mod generation;
pub mod heightfield;
pub mod meshing;
pub mod persistence;
pub mod plane;
pub mod voxels;

pub use biome::BiomeParams;
pub use chunk_cache::{CachedChunk, ChunkCache};
pub use heightfield::{Heightfield, HeightfieldCache};
pub use meshing::{greedy_mesh, Volume};
pub use voxels::{build_column, BlockType, ChunkColumn, ChunkKey};
