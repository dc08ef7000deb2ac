//! # Block Type Module
//!
//! This module defines the terrain materials a voxel can be classified
//! as. It provides material identification, integer conversion, and
//! random generation for test grids.

use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates every terrain material.
///
/// The discriminant order is part of the persisted chunk format, so new
/// materials must only ever be appended. The `FromPrimitive` derive
/// allows conversion from integers, which is used when decoding persisted
/// volumes.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// An air voxel; never written into a column grid.
    AIR,

    /// Regular grass on the moist side of the moisture split.
    GRASS,

    /// The lighter grass color variant.
    GRASS_LIGHT,

    /// Dry grass on the arid side of the moisture split.
    DRY_GRASS,

    /// The lighter dry-grass color variant.
    DRY_GRASS_LIGHT,

    /// Beach sand below the shore altitude.
    SAND,

    /// The lighter sand color variant.
    SAND_LIGHT,

    /// Exposed stone.
    STONE,

    /// The lighter stone color variant.
    STONE_LIGHT,

    /// Snow, either from altitude or from patchy snow cover.
    SNOW,
}

/// Number of material variants, including air.
pub const NUM_BLOCK_TYPES: BlockTypeSize = 10;

impl BlockType {
    /// Converts a `BlockTypeSize` to a `BlockType`.
    ///
    /// # Panics
    /// Panics if the input value doesn't correspond to a valid
    /// `BlockType`. Use [`BlockType::try_from_int`] for untrusted input.
    pub fn get_block_type_from_int(btype: BlockTypeSize) -> Self {
        let btype_option = num::FromPrimitive::from_u8(btype);
        btype_option.unwrap()
    }

    /// Fallible conversion from a raw material id.
    ///
    /// Persisted data is the one place material ids arrive from outside
    /// the crate, so decoding goes through this instead of the panicking
    /// variant.
    pub fn try_from_int(btype: BlockTypeSize) -> Option<Self> {
        num::FromPrimitive::from_u8(btype)
    }

    /// Generates a random solid material (excluding AIR).
    ///
    /// This is primarily used for randomized mesher test grids.
    #[allow(dead_code)]
    pub fn get_random_type() -> Self {
        num::FromPrimitive::from_u8(fastrand::u8(1..NUM_BLOCK_TYPES)).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_conversion_round_trips_every_material() {
        for raw in 0..NUM_BLOCK_TYPES {
            let block = BlockType::try_from_int(raw).unwrap();
            assert_eq!(block as BlockTypeSize, raw);
        }
        assert_eq!(BlockType::try_from_int(NUM_BLOCK_TYPES), None);
    }

    #[test]
    fn random_type_is_never_air() {
        for _ in 0..64 {
            assert_ne!(BlockType::get_random_type(), BlockType::AIR);
        }
    }
}
