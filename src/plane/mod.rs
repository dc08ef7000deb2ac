//! # Plane Module
//!
//! Low-detail terrain for far distances: instead of voxel volumes, a far
//! chunk is represented by a coarse heightmap mesh — a grid of
//! `(segments + 1)²` vertices with per-vertex colors baked from the
//! classifier, triangulated into `2 * segments²` triangles. Multiple such
//! chunk meshes are merged into a single buffer set before being handed
//! to the renderer, so a whole ring of far terrain costs one draw.

use crate::heightfield::Heightfield;
use crate::voxels::block::color_for;
use crate::voxels::chunk::CHUNK_DIMENSION;
use crate::voxels::{classify, ChunkKey};

mod merge;

pub use merge::merge_plane_columns;

/// Geometry buffers for one low-detail chunk heightmap.
///
/// Indices are chunk-local (they address this column's own vertex list);
/// [`merge_plane_columns`] rebases them when columns are concatenated.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneChunkColumn {
    /// Vertex positions in world space: `[x, height, z]`.
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex linear RGB colors.
    pub colors: Vec<[f32; 3]>,
    /// Triangle list indices into this column's vertex buffers.
    pub indices: Vec<u32>,
}

/// Builds the low-detail heightmap mesh for one chunk.
///
/// # Arguments
/// * `heightfield` - The terrain height function
/// * `key` - The chunk to cover
/// * `segments` - Grid cells per axis; the mesh has `(segments + 1)²`
///   vertices
///
/// # Returns
/// A [`PlaneChunkColumn`] spanning the chunk's world footprint, with
/// heights and colors sampled at the nearest voxel column to each grid
/// vertex.
pub fn build_plane_column(
    heightfield: &Heightfield,
    key: ChunkKey,
    segments: u32,
) -> PlaneChunkColumn {
    debug_assert!(segments > 0);
    let (origin_x, origin_z) = key.origin();
    let step = CHUNK_DIMENSION as f32 / segments as f32;
    let vertices_per_axis = segments + 1;
    let vertex_count = (vertices_per_axis * vertices_per_axis) as usize;

    let mut positions = Vec::with_capacity(vertex_count);
    let mut colors = Vec::with_capacity(vertex_count);

    for j in 0..vertices_per_axis {
        for i in 0..vertices_per_axis {
            let world_x = origin_x as f32 + i as f32 * step;
            let world_z = origin_z as f32 + j as f32 * step;
            let sample_x = world_x.floor() as i32;
            let sample_z = world_z.floor() as i32;
            let height = heightfield.height(sample_x, sample_z);

            positions.push([world_x, height as f32, world_z]);
            colors.push(color_for(classify(
                heightfield,
                sample_x,
                height,
                sample_z,
                height,
            )));
        }
    }

    let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
    for j in 0..segments {
        for i in 0..segments {
            let near_left = j * vertices_per_axis + i;
            let near_right = near_left + 1;
            let far_left = near_left + vertices_per_axis;
            let far_right = far_left + 1;

            indices.extend_from_slice(&[near_left, far_left, near_right]);
            indices.extend_from_slice(&[near_right, far_left, far_right]);
        }
    }

    PlaneChunkColumn {
        positions,
        colors,
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::BiomeParams;
    use crate::heightfield::HeightfieldCache;

    fn heightfield() -> Heightfield {
        Heightfield::with_cache(
            "plane",
            BiomeParams::default(),
            HeightfieldCache::new(256),
        )
        .unwrap()
    }

    #[test]
    fn buffer_sizes_match_the_segment_count() {
        let heightfield = heightfield();
        let column = build_plane_column(&heightfield, ChunkKey::new(0, 0), 4);

        assert_eq!(column.positions.len(), 25);
        assert_eq!(column.colors.len(), 25);
        assert_eq!(column.indices.len(), 4 * 4 * 6);
    }

    #[test]
    fn indices_stay_inside_the_vertex_buffer() {
        let heightfield = heightfield();
        let column = build_plane_column(&heightfield, ChunkKey::new(-1, 2), 8);
        let vertex_count = column.positions.len() as u32;
        assert!(column.indices.iter().all(|index| *index < vertex_count));
    }

    #[test]
    fn vertices_track_the_heightfield_surface() {
        let heightfield = heightfield();
        let segments = CHUNK_DIMENSION as u32;
        let column = build_plane_column(&heightfield, ChunkKey::new(0, 0), segments);

        // With one segment per voxel the grid samples land exactly on
        // voxel columns.
        for j in 0..=segments {
            for i in 0..=segments {
                let vertex = column.positions[(j * (segments + 1) + i) as usize];
                let height = heightfield.height(vertex[0] as i32, vertex[2] as i32);
                assert_eq!(vertex[1], height as f32);
            }
        }
    }
}
