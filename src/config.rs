//! Planet generation options and builder
//!
//! This module provides the configuration for deterministic planet generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{PlanetError, Result};

/// Options for deterministic planet generation
///
/// The same configuration will always produce the identical planet. Only the
/// configuration needs to be stored or sent over the wire; every field array is
/// regenerated from it.
///
/// # Example
///
/// ```rust
/// use voronoi_worldgen::*;
///
/// let config = PlanetConfigBuilder::new()
///     .seed(42)
///     .number_cells(2_000)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: PlanetConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetConfig {
    /// Random seed; every stochastic step derives its randomness from it
    pub seed: u32,

    /// Number of regions on the finished mesh, including the pole region
    pub number_cells: usize,

    /// Sampling irregularity in [0, 1]
    ///
    /// - 0.0: exact Fibonacci lattice, independent of seed
    /// - 0.75: default, irregular cells without clumping
    pub jitter: f32,

    /// Number of tectonic plates, clamped to [1, number_cells]
    pub number_plates: usize,

    /// Probability in [0, 1] that a plate is oceanic
    pub ocean_plate_percent: f32,

    /// Amplitude of the fractal noise added to elevation
    pub terrain_roughness: f32,

    /// Additive elevation bias, applied before clamping to [-1, 1]
    pub height_modifier: f32,

    /// River flow scale in [0, 1]
    pub flow_modifier: f32,

    /// Additive shift applied to normalised moisture
    pub moisture_modifier: f32,

    /// Additive shift applied to normalised temperature
    pub temperature_modifier: f32,

    /// Temperature assigned to the coldest region
    pub min_temperature: f32,

    /// Temperature assigned to the hottest region
    pub max_temperature: f32,

    /// Visual displacement magnitude in [0, 1]
    ///
    /// Not used by field generation; carried for geometry builders.
    pub protrude_height: f32,

    /// Axial tilt in degrees, drives seasonal insolation
    pub axial_tilt: f32,
}

/// Largest region count whose side indices still fit the `i32` export arrays
pub const MAX_CELLS: usize = i32::MAX as usize / 6;

impl PlanetConfig {
    /// Check every option, returning the first problem found
    pub fn validate(&self) -> Result<()> {
        check_cell_count(self.number_cells)?;
        check_unit("jitter", self.jitter)?;
        check_unit("ocean_plate_percent", self.ocean_plate_percent)?;
        check_unit("flow_modifier", self.flow_modifier)?;
        check_unit("protrude_height", self.protrude_height)?;
        check_finite("terrain_roughness", self.terrain_roughness)?;
        check_finite("height_modifier", self.height_modifier)?;
        check_finite("moisture_modifier", self.moisture_modifier)?;
        check_finite("temperature_modifier", self.temperature_modifier)?;
        check_finite("min_temperature", self.min_temperature)?;
        check_finite("max_temperature", self.max_temperature)?;
        check_finite("axial_tilt", self.axial_tilt)?;
        if self.min_temperature >= self.max_temperature {
            return Err(invalid(format!(
                "min_temperature must be < max_temperature (got {} >= {})",
                self.min_temperature, self.max_temperature
            )));
        }
        Ok(())
    }

    /// Plate count after clamping to [1, number_cells]
    #[inline]
    pub fn effective_plate_count(&self) -> usize {
        self.number_plates.clamp(1, self.number_cells.max(1))
    }
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            number_cells: 10_000,
            jitter: 0.75,
            number_plates: 20,
            ocean_plate_percent: 0.5,
            terrain_roughness: 0.1,
            height_modifier: 0.0,
            flow_modifier: 0.2,
            moisture_modifier: 0.0,
            temperature_modifier: 0.0,
            min_temperature: -30.0,
            max_temperature: 40.0,
            protrude_height: 0.1,
            axial_tilt: 23.44,
        }
    }
}

fn invalid(msg: String) -> PlanetError {
    PlanetError::InvalidConfig(msg)
}

fn check_cell_count(count: usize) -> Result<()> {
    if count == 0 {
        return Err(invalid("number_cells must be > 0 (got 0)".into()));
    }
    if count > MAX_CELLS {
        return Err(invalid(format!("number_cells must be <= {} (got {})", MAX_CELLS, count)));
    }
    Ok(())
}

fn check_unit(name: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("{} must be in [0, 1] (got {})", name, value)))
    }
}

fn check_finite(name: &str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(format!("{} must be finite (got {})", name, value)))
    }
}

/// Builder for creating PlanetConfig with validation
///
/// # Example
///
/// ```rust
/// use voronoi_worldgen::*;
///
/// let config = PlanetConfigBuilder::new()
///     .seed(123)
///     .number_cells(1_000)
///     .unwrap()
///     .number_plates(10)
///     .ocean_plate_percent(0.75)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.number_plates, 10);
/// ```
#[derive(Debug, Clone)]
pub struct PlanetConfigBuilder {
    config: PlanetConfig,
}

impl PlanetConfigBuilder {
    /// Create a new builder with the default options
    pub fn new() -> Self {
        Self {
            config: PlanetConfig::default(),
        }
    }

    /// Set the random seed
    pub fn seed(mut self, seed: u32) -> Self {
        self.config.seed = seed;
        self
    }

    /// Set the region count
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if count is 0 or above [`MAX_CELLS`]
    pub fn number_cells(mut self, count: usize) -> Result<Self> {
        check_cell_count(count)?;
        self.config.number_cells = count;
        Ok(self)
    }

    /// Set the sampling jitter
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if jitter is outside [0, 1]
    pub fn jitter(mut self, jitter: f32) -> Result<Self> {
        check_unit("jitter", jitter)?;
        self.config.jitter = jitter;
        Ok(self)
    }

    /// Set the plate count (clamped at generation time)
    pub fn number_plates(mut self, count: usize) -> Self {
        self.config.number_plates = count;
        self
    }

    /// Set the oceanic plate probability
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if percent is outside [0, 1]
    pub fn ocean_plate_percent(mut self, percent: f32) -> Result<Self> {
        check_unit("ocean_plate_percent", percent)?;
        self.config.ocean_plate_percent = percent;
        Ok(self)
    }

    /// Set the elevation noise amplitude
    pub fn terrain_roughness(mut self, roughness: f32) -> Self {
        self.config.terrain_roughness = roughness;
        self
    }

    /// Set the additive elevation bias
    pub fn height_modifier(mut self, modifier: f32) -> Self {
        self.config.height_modifier = modifier;
        self
    }

    /// Set the river flow scale
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if modifier is outside [0, 1]
    pub fn flow_modifier(mut self, modifier: f32) -> Result<Self> {
        check_unit("flow_modifier", modifier)?;
        self.config.flow_modifier = modifier;
        Ok(self)
    }

    /// Set the moisture shift
    pub fn moisture_modifier(mut self, modifier: f32) -> Self {
        self.config.moisture_modifier = modifier;
        self
    }

    /// Set the temperature shift
    pub fn temperature_modifier(mut self, modifier: f32) -> Self {
        self.config.temperature_modifier = modifier;
        self
    }

    /// Set the temperature range
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if min >= max
    pub fn temperature_range(mut self, min: f32, max: f32) -> Result<Self> {
        if !(min < max) {
            return Err(invalid(format!(
                "min_temperature must be < max_temperature (got {} >= {})",
                min, max
            )));
        }
        self.config.min_temperature = min;
        self.config.max_temperature = max;
        Ok(self)
    }

    /// Set the visual protrusion height
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if height is outside [0, 1]
    pub fn protrude_height(mut self, height: f32) -> Result<Self> {
        check_unit("protrude_height", height)?;
        self.config.protrude_height = height;
        Ok(self)
    }

    /// Set the axial tilt in degrees
    pub fn axial_tilt(mut self, degrees: f32) -> Self {
        self.config.axial_tilt = degrees;
        self
    }

    /// Build the configuration, running full validation
    pub fn build(self) -> Result<PlanetConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for PlanetConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = PlanetConfigBuilder::new().build().unwrap();
        assert_eq!(config, PlanetConfig::default());
        assert_eq!(config.number_cells, 10_000);
        assert_eq!(config.seed, 0);
    }

    #[test]
    fn test_builder_custom() {
        let config = PlanetConfigBuilder::new()
            .seed(42)
            .number_cells(500)
            .unwrap()
            .jitter(0.0)
            .unwrap()
            .number_plates(7)
            .temperature_range(-10.0, 30.0)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.number_cells, 500);
        assert_eq!(config.jitter, 0.0);
        assert_eq!(config.number_plates, 7);
        assert_eq!(config.min_temperature, -10.0);
        assert_eq!(config.max_temperature, 30.0);
    }

    #[test]
    fn test_builder_zero_cells() {
        let result = PlanetConfigBuilder::new().number_cells(0);
        assert!(matches!(result, Err(PlanetError::InvalidConfig(_))));
    }

    #[test]
    fn test_cell_count_upper_bound() {
        assert!(PlanetConfigBuilder::new().number_cells(MAX_CELLS).is_ok());
        assert!(PlanetConfigBuilder::new().number_cells(MAX_CELLS + 1).is_err());

        let config = PlanetConfig {
            number_cells: MAX_CELLS + 1,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PlanetError::InvalidConfig(_))));
        // Every side index of the largest mesh fits the exported i32 arrays
        assert!(6 * MAX_CELLS - 12 <= i32::MAX as usize);
    }

    #[test]
    fn test_validate_zero_cells() {
        let config = PlanetConfig {
            number_cells: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PlanetError::InvalidConfig(_))));
    }

    #[test]
    fn test_builder_out_of_range() {
        assert!(PlanetConfigBuilder::new().jitter(1.5).is_err());
        assert!(PlanetConfigBuilder::new().jitter(-0.1).is_err());
        assert!(PlanetConfigBuilder::new().ocean_plate_percent(2.0).is_err());
        assert!(PlanetConfigBuilder::new().flow_modifier(-1.0).is_err());
        assert!(PlanetConfigBuilder::new().protrude_height(1.1).is_err());
        assert!(PlanetConfigBuilder::new().temperature_range(5.0, 5.0).is_err());
    }

    #[test]
    fn test_validate_non_finite() {
        let config = PlanetConfig {
            terrain_roughness: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PlanetConfig {
            min_temperature: 50.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_plate_count_clamping() {
        let config = PlanetConfig {
            number_cells: 50,
            number_plates: 500,
            ..Default::default()
        };
        assert_eq!(config.effective_plate_count(), 50);

        let config = PlanetConfig {
            number_plates: 0,
            ..Default::default()
        };
        assert_eq!(config.effective_plate_count(), 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = PlanetConfigBuilder::new().seed(12345).build().unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: PlanetConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}
