//! Fractal noise synthesis for the terrain heightfield.
//!
//! Three independent Perlin generators are derived from one seed string
//! and combined per octave as `base + relief * mask`, which keeps broad
//! rolling terrain from the base channel while letting the relief channel
//! punch through only where the mask channel allows it.

use std::hash::{Hash, Hasher};

use noise::{NoiseFn, Perlin};
use rustc_hash::FxHasher;

use crate::biome::BiomeParams;

/// Derives a deterministic 32-bit noise seed from a seed string.
///
/// The channel index is appended as `"{seed}_{channel}"` before hashing so
/// the three generators of a stack never share a seed. `FxHasher` is used
/// because its output is stable across runs and platforms.
fn derive_seed(seed: &str, channel: u32) -> u32 {
    let mut hasher = FxHasher::default();
    format!("{seed}_{channel}").hash(&mut hasher);
    hasher.finish() as u32
}

/// A three-channel fractal Brownian motion sampler.
///
/// The stack is immutable after construction and cheap to share; sampling
/// is a pure function of the coordinates and the biome parameters.
pub struct FbmStack {
    base: Perlin,
    relief: Perlin,
    mask: Perlin,
}

impl FbmStack {
    /// Builds the three noise channels from a seed string.
    pub fn new(seed: &str) -> Self {
        FbmStack {
            base: Perlin::new(derive_seed(seed, 1)),
            relief: Perlin::new(derive_seed(seed, 2)),
            mask: Perlin::new(derive_seed(seed, 3)),
        }
    }

    /// Samples normalized fractal noise at integer world coordinates.
    ///
    /// # Arguments
    /// * `params` - Fractal parameters (scale, octaves, persistence,
    ///   lacunarity)
    /// * `x`, `z` - World coordinates
    ///
    /// # Returns
    /// A value in `[0, 1]`: the octave accumulation divided by the total
    /// possible amplitude. Each octave's combined sample has a maximum of
    /// 2 (`base` in `[0, 1]` plus `relief * mask` in `[0, 1]`), hence the
    /// `2.0 * amplitude` normalization term.
    pub fn sample(&self, params: &BiomeParams, x: i32, z: i32) -> f64 {
        let xs = x as f64 / params.scale;
        let zs = z as f64 / params.scale;

        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut total = 0.0;
        let mut normalization = 0.0;

        for _ in 0..params.octaves {
            let at = [xs * frequency, zs * frequency];
            let base = self.base.get(at) * 0.5 + 0.5;
            let relief = self.relief.get(at) * 0.5 + 0.5;
            let mask = self.mask.get(at) * 0.5 + 0.5;

            total += (base + relief * mask) * amplitude;
            normalization += 2.0 * amplitude;
            amplitude *= params.persistence;
            frequency *= params.lacunarity;
        }

        (total / normalization).clamp(0.0, 1.0)
    }

    /// Converts a normalized sample into an integer terrain height.
    pub fn height(&self, params: &BiomeParams, x: i32, z: i32) -> i32 {
        let sample = self.sample(params, x, z);
        (sample.powf(params.exponentiation) * params.height).floor() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_seeds_differ_per_channel() {
        let a = derive_seed("seed", 1);
        let b = derive_seed("seed", 2);
        let c = derive_seed("seed", 3);
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn samples_are_normalized() {
        let stack = FbmStack::new("normalization");
        let params = BiomeParams::default();
        for x in (-200..200).step_by(17) {
            for z in (-200..200).step_by(13) {
                let sample = stack.sample(&params, x, z);
                assert!((0.0..=1.0).contains(&sample), "sample {sample} at ({x}, {z})");
            }
        }
    }

    #[test]
    fn same_seed_reproduces_heights() {
        let params = BiomeParams::default();
        let first = FbmStack::new("test_seed");
        let second = FbmStack::new("test_seed");
        for x in -40..40 {
            assert_eq!(
                first.height(&params, x, -x),
                second.height(&params, x, -x)
            );
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let params = BiomeParams::default();
        let first = FbmStack::new("seed_a");
        let second = FbmStack::new("seed_b");
        let diverges = (0..64).any(|x| {
            first.height(&params, x * 7, x * 3) != second.height(&params, x * 7, x * 3)
        });
        assert!(diverges);
    }
}
