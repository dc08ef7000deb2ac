//! # Meshing Module
//!
//! Converts dense voxel grids into the minimal set of axis-aligned box
//! volumes consumed by the instanced-rendering and collision layers.

mod greedy;
mod volume;

pub use greedy::greedy_mesh;
pub use volume::Volume;
