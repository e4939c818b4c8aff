//! Fractal (fBm) simplex noise
//!
//! One generator value is built per generation run from the configuration seed
//! and handed to every stage that needs it, so no noise state outlives a run.

use glam::Vec3;
use noise::{NoiseFn, Simplex};

/// Configuration for fractal noise
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FractalConfig {
    /// Number of octaves summed
    pub octaves: usize,
    /// Amplitude ratio between consecutive octaves
    pub persistence: f64,
    /// Frequency multiplier per octave
    pub lacunarity: f64,
}

impl Default for FractalConfig {
    fn default() -> Self {
        Self {
            octaves: 5,
            persistence: 2.0 / 3.0,
            lacunarity: 2.0,
        }
    }
}

/// Seeded multi-octave simplex noise over 3D positions
#[derive(Debug, Clone)]
pub struct FractalNoise {
    simplex: Simplex,
    config: FractalConfig,
}

impl FractalNoise {
    /// Create a generator with the default 5 octaves and persistence 2/3
    pub fn new(seed: u32) -> Self {
        Self::with_config(seed, FractalConfig::default())
    }

    /// Create a generator with custom octave settings
    pub fn with_config(seed: u32, config: FractalConfig) -> Self {
        Self {
            simplex: Simplex::new(seed),
            config,
        }
    }

    /// Sample the noise at `position`, approximately in [-1, 1]
    ///
    /// Octaves are weighted by `persistence^i` and the sum is divided by the
    /// total weight.
    pub fn sample(&self, position: Vec3) -> f32 {
        let p = [position.x as f64, position.y as f64, position.z as f64];
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_value = 0.0;

        for _ in 0..self.config.octaves {
            total += self.simplex.get([p[0] * frequency, p[1] * frequency, p[2] * frequency]) * amplitude;
            max_value += amplitude;
            amplitude *= self.config.persistence;
            frequency *= self.config.lacunarity;
        }

        if max_value == 0.0 {
            return 0.0;
        }
        (total / max_value) as f32
    }

    /// Sample remapped to [0, 1]
    #[inline]
    pub fn sample_unit(&self, position: Vec3) -> f32 {
        ((self.sample(position) + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

/// The noise generators of one generation run
#[derive(Debug, Clone)]
pub struct PlanetNoise {
    /// Elevation roughness
    pub elevation: FractalNoise,
    /// Temperature variation
    pub temperature: FractalNoise,
    /// Moisture variation
    pub moisture: FractalNoise,
}

impl PlanetNoise {
    /// Build all generators from the planet seed
    pub fn new(seed: u32) -> Self {
        Self {
            elevation: FractalNoise::new(seed),
            temperature: FractalNoise::new(seed.wrapping_add(1000)),
            moisture: FractalNoise::new(seed.wrapping_add(2000)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let a = FractalNoise::new(42);
        let b = FractalNoise::new(42);
        let position = Vec3::new(0.5, 0.7, 0.3);
        assert_eq!(a.sample(position), b.sample(position));
    }

    #[test]
    fn test_range() {
        let noise = FractalNoise::new(12345);
        let positions = [
            Vec3::X,
            Vec3::Y,
            Vec3::Z,
            Vec3::new(0.577, 0.577, 0.577),
            Vec3::new(-0.5, 0.5, 0.707),
        ];
        for position in positions {
            let value = noise.sample(position);
            assert!((-1.0..=1.0).contains(&value), "value {} at {:?}", value, position);
            let unit = noise.sample_unit(position);
            assert!((0.0..=1.0).contains(&unit));
        }
    }

    #[test]
    fn test_different_seeds() {
        let position = Vec3::new(0.31, -0.52, 0.79);
        let samples: Vec<f32> = (0..8).map(|seed| FractalNoise::new(seed).sample(position)).collect();
        assert!(samples.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_zero_octaves() {
        let noise = FractalNoise::with_config(
            1,
            FractalConfig {
                octaves: 0,
                ..Default::default()
            },
        );
        assert_eq!(noise.sample(Vec3::X), 0.0);
    }
}
