//! # Chunk Column Builder
//!
//! Turns the heightfield into a dense voxel grid for one chunk. The
//! builder only writes voxels that are both solid and exposed, so the
//! grid handed to the mesher contains exactly the voxels that can produce
//! visible or collidable geometry.
//!
//! ## Row early-out
//!
//! The vertical extent is partitioned into `CHUNK_DIMENSION`-tall rows.
//! A row is only populated when some column's surface height falls inside
//! it; rows of pure air or pure buried interior are skipped without a
//! single voxel test, which is where most of the build time is saved.

use crate::heightfield::Heightfield;
use crate::voxels::block::BlockTypeSize;
use crate::voxels::classifier::classify;

use super::{ChunkColumn, ChunkKey, CHUNK_DIMENSION, NUM_ROWS};

/// Side length of the prefetched height window: the chunk plus a one
/// voxel border for neighbor exposure tests.
const WINDOW: usize = (CHUNK_DIMENSION + 2) as usize;

/// Builds the dense voxel grid for one chunk column.
///
/// # Arguments
/// * `heightfield` - The memoized terrain height function
/// * `key` - The chunk to build
///
/// # Returns
/// A [`ChunkColumn`] in which every written voxel is solid
/// (`y <= surface`) and exposed (it is the surface voxel, or at least one
/// lateral neighbor column's surface lies strictly below it). Interior
/// voxels are never written.
pub fn build_column(heightfield: &Heightfield, key: ChunkKey) -> ChunkColumn {
    let (origin_x, origin_z) = key.origin();

    // One height query per column of the bordered window; everything
    // after this works off the local copy.
    let mut heights = [[0i32; WINDOW]; WINDOW];
    for (gz, row) in heights.iter_mut().enumerate() {
        for (gx, height) in row.iter_mut().enumerate() {
            *height = heightfield.height(
                origin_x + gx as i32 - 1,
                origin_z + gz as i32 - 1,
            );
        }
    }

    let mut column = ChunkColumn::empty(key);

    for row in 0..NUM_ROWS {
        let row_floor = row * CHUNK_DIMENSION;
        let row_ceiling = row_floor + CHUNK_DIMENSION;

        if !row_has_surface(&heights, row_floor, row_ceiling) {
            continue;
        }

        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                let gx = (x + 1) as usize;
                let gz = (z + 1) as usize;
                let surface = heights[gz][gx];

                for y in row_floor..row_ceiling {
                    if y > surface {
                        break;
                    }
                    let exposed = y == surface
                        || heights[gz][gx - 1] < y
                        || heights[gz][gx + 1] < y
                        || heights[gz - 1][gx] < y
                        || heights[gz + 1][gx] < y;
                    if !exposed {
                        continue;
                    }
                    let block = classify(
                        heightfield,
                        origin_x + x,
                        y,
                        origin_z + z,
                        surface,
                    );
                    column.set(x, y, z, block as BlockTypeSize);
                }
            }
        }
    }

    column
}

/// Whether any in-chunk column's surface height falls inside
/// `[row_floor, row_ceiling)`.
fn row_has_surface(heights: &[[i32; WINDOW]; WINDOW], row_floor: i32, row_ceiling: i32) -> bool {
    heights[1..WINDOW - 1].iter().any(|row| {
        row[1..WINDOW - 1]
            .iter()
            .any(|height| (row_floor..row_ceiling).contains(height))
    })
}
