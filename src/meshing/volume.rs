//! Axis-aligned box volumes, the mesher's output primitive.

use cgmath::{Matrix4, Point3, Vector3};

use crate::voxels::BlockTypeSize;

/// An axis-aligned box of same-material voxels within one chunk column.
///
/// Both corners are inclusive: a single voxel has `min == max`, and each
/// axis spans `max - min + 1` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Volume {
    /// Minimum corner, in chunk-local voxel coordinates.
    pub min: Point3<i32>,
    /// Maximum corner (inclusive), in chunk-local voxel coordinates.
    pub max: Point3<i32>,
    /// The material constant over the whole box.
    pub block: BlockTypeSize,
}

impl Volume {
    /// The box dimensions in cells per axis.
    pub fn extents(&self) -> Vector3<i32> {
        Vector3::new(
            self.max.x - self.min.x + 1,
            self.max.y - self.min.y + 1,
            self.max.z - self.min.z + 1,
        )
    }

    /// The number of voxel cells the box covers.
    pub fn cell_count(&self) -> usize {
        let extents = self.extents();
        (extents.x * extents.y * extents.z) as usize
    }

    /// Whether a chunk-local cell lies inside the box.
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        (self.min.x..=self.max.x).contains(&x)
            && (self.min.y..=self.max.y).contains(&y)
            && (self.min.z..=self.max.z).contains(&z)
    }

    /// The model matrix that maps an origin-centered unit cube onto this
    /// box, for the instanced-rendering and collision collaborators.
    pub fn instance_transform(&self) -> Matrix4<f32> {
        let extents = self.extents();
        let center = Vector3::new(
            self.min.x as f32 + extents.x as f32 * 0.5,
            self.min.y as f32 + extents.y as f32 * 0.5,
            self.min.z as f32 + extents.z as f32 * 0.5,
        );
        Matrix4::from_translation(center)
            * Matrix4::from_nonuniform_scale(
                extents.x as f32,
                extents.y as f32,
                extents.z as f32,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::BlockType;

    #[test]
    fn single_voxel_volume_has_unit_extents() {
        let volume = Volume {
            min: Point3::new(3, 4, 5),
            max: Point3::new(3, 4, 5),
            block: BlockType::STONE as BlockTypeSize,
        };
        assert_eq!(volume.extents(), Vector3::new(1, 1, 1));
        assert_eq!(volume.cell_count(), 1);
        assert!(volume.contains(3, 4, 5));
        assert!(!volume.contains(3, 5, 5));
    }

    #[test]
    fn instance_transform_maps_unit_cube_center() {
        let volume = Volume {
            min: Point3::new(0, 0, 0),
            max: Point3::new(3, 1, 0),
            block: BlockType::SAND as BlockTypeSize,
        };
        let transform = volume.instance_transform();
        let center = transform * cgmath::Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(center.x, 2.0);
        assert_eq!(center.y, 1.0);
        assert_eq!(center.z, 0.5);
    }
}
