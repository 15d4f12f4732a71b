//! Deterministic smooth noise used for terrain and tornado jitter.

use std::fmt;

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};

const OCTAVES: i32 = 4;
const FALLOFF: f32 = 0.5;
const LACUNARITY: f32 = 2.0;

/// Continuous pseudo-random scalar field sampled by the simulation.
///
/// Both samplers return values in `[0, 1]` and must be deterministic for a
/// given seed. `sample_1d` evaluates the same family along a single axis.
pub trait NoiseField {
    /// Samples the field at a two-dimensional coordinate.
    fn sample_2d(&self, x: f32, y: f32) -> f32;

    /// Samples the field along a single "time" axis.
    fn sample_1d(&self, t: f32) -> f32 {
        self.sample_2d(t, 0.0)
    }
}

/// Fractal Perlin noise backed by FastNoiseLite.
pub struct PerlinField {
    seed: u64,
    noise: FastNoiseLite,
}

impl PerlinField {
    /// Creates a new field seeded with the provided value.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut noise = FastNoiseLite::with_seed(fold_seed(seed));
        noise.set_noise_type(Some(NoiseType::Perlin));
        noise.set_frequency(Some(1.0));
        noise.set_fractal_type(Some(FractalType::FBm));
        noise.set_fractal_octaves(Some(OCTAVES));
        noise.set_fractal_gain(Some(FALLOFF));
        noise.set_fractal_lacunarity(Some(LACUNARITY));
        Self { seed, noise }
    }

    /// Seed used to construct the field.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Replaces the field with a freshly seeded one.
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }
}

impl NoiseField for PerlinField {
    fn sample_2d(&self, x: f32, y: f32) -> f32 {
        let raw = self.noise.get_noise_2d(x, y);
        ((raw + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

impl fmt::Debug for PerlinField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PerlinField")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

fn fold_seed(seed: u64) -> i32 {
    let folded = (seed ^ (seed >> 32)) & 0xffff_ffff;
    folded as u32 as i32
}

/// Field that returns the same value everywhere.
///
/// Useful for hosts that want motion without jitter and for tests that pin
/// the noise sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantField(pub f32);

impl NoiseField for ConstantField {
    fn sample_2d(&self, _x: f32, _y: f32) -> f32 {
        self.0.clamp(0.0, 1.0)
    }
}
