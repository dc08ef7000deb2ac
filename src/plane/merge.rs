//! Merging of low-detail chunk heightmaps into one buffer set.

use super::PlaneChunkColumn;

/// Concatenates chunk heightmap buffers into a single merged buffer set.
///
/// Vertex and color buffers are appended in input order. Index buffers
/// are appended with every chunk's indices rebased by the running vertex
/// total of the chunks before it, because indices are chunk-local but the
/// merged buffer is global. Output buffers are allocated at exactly the
/// summed input sizes up front; the copy never grows them.
pub fn merge_plane_columns(columns: &[PlaneChunkColumn]) -> PlaneChunkColumn {
    let vertex_total: usize = columns.iter().map(|column| column.positions.len()).sum();
    let index_total: usize = columns.iter().map(|column| column.indices.len()).sum();

    let mut positions = Vec::with_capacity(vertex_total);
    let mut colors = Vec::with_capacity(vertex_total);
    let mut indices = Vec::with_capacity(index_total);

    let mut base_vertex: u32 = 0;
    for column in columns {
        positions.extend_from_slice(&column.positions);
        colors.extend_from_slice(&column.colors);
        indices.extend(column.indices.iter().map(|index| index + base_vertex));
        base_vertex += column.positions.len() as u32;
    }

    PlaneChunkColumn {
        positions,
        colors,
        indices,
    }
}
