//! Biome classification
//!
//! Land biomes come from a fixed moisture × temperature table. Some table
//! cells vary with altitude and hold one biome per elevation band.

use crate::error::{PlanetError, Result};

/// Below this, a below-sea-level region is open ocean rather than coast
const OCEAN_DEPTH: f32 = -0.1;
/// Normalized temperature below which below-sea-level regions freeze over
const GLACIAL_TEMPERATURE: f32 = 0.1;
/// Upper bounds of the low and mid elevation bands
const ELEVATION_BANDS: [f32; 2] = [0.6, 0.9];

/// Moisture bucket, ordered from driest to wettest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MoistureZone {
    Arid,
    Dry,
    Moderate,
    Moist,
    Wet,
}

impl MoistureZone {
    pub const ALL: [MoistureZone; 5] = [Self::Arid, Self::Dry, Self::Moderate, Self::Moist, Self::Wet];

    /// Exclusive upper bounds of all zones but the last, which includes 1.0
    pub const UPPER_BOUNDS: [f32; 4] = [25.0 / 300.0, 50.0 / 300.0, 0.3, 0.6];

    /// Zone containing a moisture value in [0, 1]
    ///
    /// # Errors
    ///
    /// Returns `Classification` for NaN or values outside [0, 1].
    pub fn from_value(value: f32) -> Result<Self> {
        zone_index(value, &Self::UPPER_BOUNDS)
            .map(|i| Self::ALL[i])
            .ok_or(PlanetError::Classification {
                field: "moisture",
                value,
            })
    }
}

/// Temperature bucket, ordered from coldest to hottest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TemperatureZone {
    Frigid,
    Cold,
    Temperate,
    Warm,
    Hot,
}

impl TemperatureZone {
    pub const ALL: [TemperatureZone; 5] = [Self::Frigid, Self::Cold, Self::Temperate, Self::Warm, Self::Hot];

    /// Exclusive upper bounds of all zones but the last, which includes 1.0
    pub const UPPER_BOUNDS: [f32; 4] = [0.2, 0.4, 0.6, 0.85];

    /// Zone containing a normalized temperature in [0, 1]
    ///
    /// # Errors
    ///
    /// Returns `Classification` for NaN or values outside [0, 1].
    pub fn from_value(value: f32) -> Result<Self> {
        zone_index(value, &Self::UPPER_BOUNDS)
            .map(|i| Self::ALL[i])
            .ok_or(PlanetError::Classification {
                field: "temperature",
                value,
            })
    }
}

#[inline]
fn zone_index(value: f32, upper_bounds: &[f32; 4]) -> Option<usize> {
    if !(0.0..=1.0).contains(&value) {
        return None;
    }
    Some(upper_bounds.iter().position(|&bound| value < bound).unwrap_or(upper_bounds.len()))
}

/// Surface biome of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Biome {
    #[default]
    Ocean,
    Coast,
    Glacial,
    Snow,
    Tundra,
    Bare,
    Scorched,
    Taiga,
    Shrubland,
    TemperateDesert,
    SubtropicalDesert,
    Grassland,
    TemperateDeciduousForest,
    TemperateRainForest,
    TropicalSeasonalForest,
    TropicalRainForest,
}

impl Biome {
    /// Check if this biome is water
    pub fn is_water(&self) -> bool {
        matches!(self, Biome::Ocean | Biome::Coast | Biome::Glacial)
    }

    /// Check if this biome is land
    pub fn is_land(&self) -> bool {
        !self.is_water()
    }
}

#[derive(Debug, Clone, Copy)]
enum BiomeCell {
    Single(Biome),
    /// Low, mid and high elevation
    ByElevation([Biome; 3]),
}

use Biome::*;
use BiomeCell::{ByElevation, Single};

// Rows are moisture zones, columns temperature zones.
const BIOME_TABLE: [[BiomeCell; 5]; 5] = [
    // Arid
    [
        ByElevation([Tundra, Bare, Scorched]),
        ByElevation([TemperateDesert, Bare, Scorched]),
        Single(TemperateDesert),
        Single(SubtropicalDesert),
        Single(SubtropicalDesert),
    ],
    // Dry
    [
        ByElevation([Tundra, Bare, Scorched]),
        ByElevation([TemperateDesert, Shrubland, Bare]),
        Single(Grassland),
        Single(Grassland),
        Single(SubtropicalDesert),
    ],
    // Moderate
    [
        ByElevation([Tundra, Snow, Snow]),
        ByElevation([Shrubland, Taiga, Tundra]),
        ByElevation([Grassland, Shrubland, Bare]),
        Single(TemperateDeciduousForest),
        Single(TropicalSeasonalForest),
    ],
    // Moist
    [
        ByElevation([Tundra, Snow, Snow]),
        ByElevation([Taiga, Taiga, Snow]),
        ByElevation([TemperateDeciduousForest, Taiga, Tundra]),
        Single(TemperateDeciduousForest),
        Single(TropicalSeasonalForest),
    ],
    // Wet
    [
        Single(Snow),
        ByElevation([Taiga, Snow, Snow]),
        ByElevation([TemperateRainForest, Taiga, Snow]),
        Single(TemperateRainForest),
        Single(TropicalRainForest),
    ],
];

/// Biome and climate zones of one region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionBiome {
    pub biome: Biome,
    pub moisture_zone: MoistureZone,
    pub temperature_zone: TemperatureZone,
}

/// Classify a region from elevation, moisture and normalized temperature
///
/// Cold below-sea-level regions are glacial before depth is considered, so a
/// frozen shallow sea is never reported as coast.
///
/// # Errors
///
/// Returns `Classification` if moisture or temperature lies outside [0, 1].
pub fn classify_region(elevation: f32, moisture: f32, temperature_ratio: f32) -> Result<RegionBiome> {
    let moisture_zone = MoistureZone::from_value(moisture)?;
    let temperature_zone = TemperatureZone::from_value(temperature_ratio)?;

    let biome = if elevation < 0.0 && temperature_ratio < GLACIAL_TEMPERATURE {
        Glacial
    } else if elevation < OCEAN_DEPTH {
        Ocean
    } else if elevation < 0.0 {
        Coast
    } else {
        match BIOME_TABLE[moisture_zone as usize][temperature_zone as usize] {
            Single(biome) => biome,
            ByElevation(bands) => bands[elevation_band(elevation)],
        }
    };

    Ok(RegionBiome {
        biome,
        moisture_zone,
        temperature_zone,
    })
}

/// Classify a region, returning only the biome
pub fn classify_biome(elevation: f32, moisture: f32, temperature_ratio: f32) -> Result<Biome> {
    classify_region(elevation, moisture, temperature_ratio).map(|c| c.biome)
}

#[inline]
fn elevation_band(elevation: f32) -> usize {
    ELEVATION_BANDS
        .iter()
        .position(|&bound| elevation < bound)
        .unwrap_or(ELEVATION_BANDS.len())
}
