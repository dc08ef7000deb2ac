//! # Voxel Classifier
//!
//! Assigns a terrain material to a voxel from its position, the local
//! surface height, and a handful of auxiliary noise channels. The
//! auxiliary channels reuse the terrain height function itself, sampled
//! at coordinates multiplied by per-feature scale factors, so the whole
//! classification stays deterministic per seed with no extra noise state.

use super::block::block_type::BlockType;
use crate::heightfield::Heightfield;

/// Altitude below which the sand rule applies.
pub const SAND_ALTITUDE: i32 = 15;

/// Samples the height function as a generic noise channel.
///
/// The scale factor stretches or shrinks the coordinate lattice before
/// flooring back to integers; samples are therefore in height units and
/// constant over small coordinate plateaus for scales below 1.
fn scaled_noise(heightfield: &Heightfield, x: i32, z: i32, scale: f64) -> i32 {
    heightfield.height(
        (x as f64 * scale).floor() as i32,
        (z as f64 * scale).floor() as i32,
    )
}

/// Classifies the voxel at world coordinates `(x, y, z)`.
///
/// # Arguments
/// * `heightfield` - The terrain height function, reused for the noise
///   channels
/// * `x`, `y`, `z` - World coordinates of the voxel
/// * `surface_height` - The terrain surface height at `(x, z)`
///
/// # Returns
/// The first matching material in the decision ladder: altitude snow,
/// buried stone, patchy snow cover, shore sand, then the moisture-driven
/// grass split.
pub fn classify(
    heightfield: &Heightfield,
    x: i32,
    y: i32,
    z: i32,
    surface_height: i32,
) -> BlockType {
    let painting = &heightfield.params().painting;

    if y >= painting.full_snow_altitude {
        return BlockType::SNOW;
    }

    let stone_noise = scaled_noise(heightfield, x, z, painting.stone_noise_scale);
    if surface_height > y && stone_noise > painting.stone_threshold {
        return if stone_noise > painting.stone_color_noise_threshold {
            BlockType::STONE_LIGHT
        } else {
            BlockType::STONE
        };
    }

    if y >= painting.min_snow_altitude {
        let snow_noise = scaled_noise(heightfield, x, z, painting.snow_cover_scale);
        if snow_noise > painting.snow_cover_threshold {
            if snow_noise > painting.full_snow_cover_threshold {
                return BlockType::SNOW;
            }
            return if stone_noise > painting.snow_stone_mix_threshold {
                BlockType::STONE
            } else {
                BlockType::SNOW
            };
        }
    }

    if y < SAND_ALTITUDE {
        let sand_noise = scaled_noise(heightfield, x, z, painting.sand_noise_scale);
        return if sand_noise > painting.sand_noise_threshold {
            BlockType::SAND_LIGHT
        } else {
            BlockType::SAND
        };
    }

    let moisture_noise = scaled_noise(heightfield, x, z, painting.moisture_scale);
    let grass_noise = scaled_noise(heightfield, x, z, painting.grass_noise_scale);
    if moisture_noise > painting.moisture_threshold {
        if grass_noise > painting.grass_noise_threshold {
            BlockType::GRASS_LIGHT
        } else {
            BlockType::GRASS
        }
    } else if grass_noise > painting.dry_grass_noise_threshold {
        BlockType::DRY_GRASS_LIGHT
    } else {
        BlockType::DRY_GRASS
    }
}
