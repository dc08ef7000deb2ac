//! Greedy volume meshing for voxel columns.
//!
//! This module implements the greedy merge that collapses contiguous
//! same-material voxels into the largest possible axis-aligned boxes,
//! so the number of instanced draw primitives scales with surface
//! complexity instead of raw voxel count.

use bitvec::vec::BitVec;
use cgmath::Point3;

use crate::voxels::chunk::{ChunkColumn, CHUNK_DIMENSION, COLUMN_VOLUME, WORLD_HEIGHT};
use crate::voxels::BlockTypeSize;

use super::volume::Volume;

/// Whether a cell can still be claimed for a volume of material `block`:
/// solid, unvisited, and the same material.
fn can_claim(
    column: &ChunkColumn,
    visited: &BitVec,
    x: i32,
    y: i32,
    z: i32,
    block: BlockTypeSize,
) -> bool {
    !visited[ChunkColumn::index_of(x, y, z)] && column.get(x, y, z) == block
}

/// Whether the whole X-span `[x0, x1]` at `(y, z)` can be claimed.
fn can_claim_row(
    column: &ChunkColumn,
    visited: &BitVec,
    x0: i32,
    x1: i32,
    y: i32,
    z: i32,
    block: BlockTypeSize,
) -> bool {
    (x0..=x1).all(|x| can_claim(column, visited, x, y, z, block))
}

/// Whether the whole X×Y rectangle at slice `z` can be claimed.
fn can_claim_slice(
    column: &ChunkColumn,
    visited: &BitVec,
    x0: i32,
    x1: i32,
    y0: i32,
    y1: i32,
    z: i32,
    block: BlockTypeSize,
) -> bool {
    (y0..=y1).all(|y| can_claim_row(column, visited, x0, x1, y, z, block))
}

/// Collapses a dense voxel grid into a minimal-ish list of box volumes.
///
/// Cells are visited in a fixed z-outer, y-middle, x-inner order; each
/// unvisited solid cell seeds a box that is extended greedily along X,
/// then Y (every cell of the X-span must match), then Z (every cell of
/// the X×Y rectangle must match). The iteration order affects the shape
/// of the boxes but not the partition property.
///
/// # Returns
/// Volumes whose cell sets partition the solid cells of the input: every
/// solid cell is covered by exactly one volume, and every volume contains
/// only solid cells of its stated material.
pub fn greedy_mesh(column: &ChunkColumn) -> Vec<Volume> {
    let mut visited = BitVec::repeat(false, COLUMN_VOLUME);
    let mut volumes = Vec::new();

    for z in 0..CHUNK_DIMENSION {
        for y in 0..WORLD_HEIGHT {
            for x in 0..CHUNK_DIMENSION {
                if visited[ChunkColumn::index_of(x, y, z)] || !column.is_solid(x, y, z) {
                    continue;
                }
                let block = column.get(x, y, z);

                let mut max_x = x;
                while max_x + 1 < CHUNK_DIMENSION
                    && can_claim(column, &visited, max_x + 1, y, z, block)
                {
                    max_x += 1;
                }

                let mut max_y = y;
                while max_y + 1 < WORLD_HEIGHT
                    && can_claim_row(column, &visited, x, max_x, max_y + 1, z, block)
                {
                    max_y += 1;
                }

                let mut max_z = z;
                while max_z + 1 < CHUNK_DIMENSION
                    && can_claim_slice(column, &visited, x, max_x, y, max_y, max_z + 1, block)
                {
                    max_z += 1;
                }

                for vz in z..=max_z {
                    for vy in y..=max_y {
                        for vx in x..=max_x {
                            visited.set(ChunkColumn::index_of(vx, vy, vz), true);
                        }
                    }
                }

                volumes.push(Volume {
                    min: Point3::new(x, y, z),
                    max: Point3::new(max_x, max_y, max_z),
                    block,
                });
            }
        }
    }

    volumes
}
