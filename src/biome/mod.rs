//! # Biome Configuration Module
//!
//! This module defines the biome parameter set that drives terrain
//! generation. A biome is described by the shape of its heightfield
//! (fractal noise parameters) and by its painting rules (the thresholds
//! and noise scales used to pick a material for each voxel).
//!
//! Parameters typically arrive from the embedding application as JSON and
//! are validated once at construction; generation code treats them as
//! immutable afterwards.

use serde::{Deserialize, Serialize};

/// Errors produced while constructing or validating biome parameters.
#[derive(Debug, thiserror::Error)]
pub enum BiomeError {
    /// The JSON form of the parameters could not be parsed.
    #[error("failed to parse biome parameters: {0}")]
    Parse(#[from] serde_json::Error),

    /// A numeric field is outside its allowed range.
    #[error("biome parameter `{field}` is out of range: {reason}")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable description of the violated constraint.
        reason: &'static str,
    },
}

/// Painting rules: per-material noise scales and thresholds.
///
/// The classifier reuses the terrain height function as a generic noise
/// source, sampling it at coordinates multiplied by the `*_scale` factors
/// below. The resulting samples are therefore in height units, and every
/// `*_threshold` here is compared against them directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaintingParams {
    /// Coordinate multiplier for the snow-cover noise channel.
    pub snow_cover_scale: f64,
    /// Snow-cover sample above which patchy snow appears.
    pub snow_cover_threshold: i32,
    /// Altitude at and above which every voxel is snow.
    pub full_snow_altitude: i32,
    /// Lowest altitude at which patchy snow may appear.
    pub min_snow_altitude: i32,
    /// Snow-cover sample above which a patch is fully snowed over.
    pub full_snow_cover_threshold: i32,
    /// Stone sample above which a partially snowed patch shows stone.
    pub snow_stone_mix_threshold: i32,
    /// Coordinate multiplier for the stone noise channel.
    pub stone_noise_scale: f64,
    /// Stone sample above which buried voxels read as stone.
    pub stone_threshold: i32,
    /// Stone sample above which the lighter stone variant is used.
    pub stone_color_noise_threshold: i32,
    /// Coordinate multiplier for the moisture noise channel.
    pub moisture_scale: f64,
    /// Moisture sample separating grass from dry grass.
    pub moisture_threshold: i32,
    /// Coordinate multiplier for the sand noise channel.
    pub sand_noise_scale: f64,
    /// Sand sample above which the lighter sand variant is used.
    pub sand_noise_threshold: i32,
    /// Coordinate multiplier for the grass color noise channel.
    pub grass_noise_scale: f64,
    /// Grass sample above which the lighter grass variant is used.
    pub grass_noise_threshold: i32,
    /// Grass sample above which the lighter dry-grass variant is used.
    pub dry_grass_noise_threshold: i32,
}

impl Default for PaintingParams {
    fn default() -> Self {
        PaintingParams {
            snow_cover_scale: 2.0,
            snow_cover_threshold: 25,
            full_snow_altitude: 55,
            min_snow_altitude: 40,
            full_snow_cover_threshold: 45,
            snow_stone_mix_threshold: 35,
            stone_noise_scale: 3.0,
            stone_threshold: 30,
            stone_color_noise_threshold: 40,
            moisture_scale: 0.5,
            moisture_threshold: 30,
            sand_noise_scale: 5.0,
            sand_noise_threshold: 35,
            grass_noise_scale: 7.0,
            grass_noise_threshold: 30,
            dry_grass_noise_threshold: 30,
        }
    }
}

/// Complete parameter set for one biome.
///
/// The fractal fields shape the heightfield; `painting` drives material
/// selection. Values are validated by [`BiomeParams::validate`], which is
/// called by every constructor in this crate that accepts a parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiomeParams {
    /// Horizontal noise scale: world units per noise unit.
    pub scale: f64,
    /// Maximum terrain height in voxels.
    pub height: f64,
    /// Number of fractal octaves accumulated per sample.
    pub octaves: u32,
    /// Amplitude decay applied per octave.
    pub persistence: f64,
    /// Frequency growth applied per octave.
    pub lacunarity: f64,
    /// Exponent applied to the normalized sample before height scaling.
    pub exponentiation: f64,
    /// Material painting rules.
    pub painting: PaintingParams,
}

impl Default for BiomeParams {
    fn default() -> Self {
        BiomeParams {
            scale: 645.0,
            height: 60.0,
            octaves: 7,
            persistence: 0.21,
            lacunarity: 3.79,
            exponentiation: 3.35,
            painting: PaintingParams::default(),
        }
    }
}

impl BiomeParams {
    /// Parses and validates a parameter set from its JSON form.
    ///
    /// # Arguments
    /// * `json` - The JSON document supplied by the embedding application
    ///
    /// # Returns
    /// The validated parameter set, or a [`BiomeError`] describing the
    /// first parse or range failure.
    pub fn from_json_str(json: &str) -> Result<Self, BiomeError> {
        let params: BiomeParams = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Checks every numeric field against its allowed range.
    ///
    /// Degenerate-but-parseable combinations (for example a snow altitude
    /// above the maximum terrain height) are deliberately allowed; they
    /// produce uninteresting terrain rather than an error.
    pub fn validate(&self) -> Result<(), BiomeError> {
        if !(self.scale > 0.0) {
            return Err(BiomeError::OutOfRange {
                field: "scale",
                reason: "must be positive",
            });
        }
        if !(self.height > 0.0) || self.height > i16::MAX as f64 {
            return Err(BiomeError::OutOfRange {
                field: "height",
                reason: "must be positive and fit a 16-bit height",
            });
        }
        if self.octaves == 0 || self.octaves > 16 {
            return Err(BiomeError::OutOfRange {
                field: "octaves",
                reason: "must be between 1 and 16",
            });
        }
        if !(self.persistence > 0.0) || self.persistence > 1.0 {
            return Err(BiomeError::OutOfRange {
                field: "persistence",
                reason: "must be in (0, 1]",
            });
        }
        if !(self.lacunarity >= 1.0) {
            return Err(BiomeError::OutOfRange {
                field: "lacunarity",
                reason: "must be at least 1",
            });
        }
        if !(self.exponentiation > 0.0) {
            return Err(BiomeError::OutOfRange {
                field: "exponentiation",
                reason: "must be positive",
            });
        }
        if self.painting.min_snow_altitude > self.painting.full_snow_altitude {
            return Err(BiomeError::OutOfRange {
                field: "painting.min_snow_altitude",
                reason: "must not exceed full_snow_altitude",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert!(BiomeParams::default().validate().is_ok());
    }

    #[test]
    fn zero_octaves_is_rejected() {
        let params = BiomeParams {
            octaves: 0,
            ..BiomeParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(BiomeError::OutOfRange { field: "octaves", .. })
        ));
    }

    #[test]
    fn json_round_trip_preserves_fields() {
        let params = BiomeParams::default();
        let json = serde_json::to_string(&params).unwrap();
        let parsed = BiomeParams::from_json_str(&json).unwrap();
        assert_eq!(parsed, params);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            BiomeParams::from_json_str("{\"scale\": }"),
            Err(BiomeError::Parse(_))
        ));
    }
}
