//! Per-region inspection records
//!
//! The generator keeps every field in flat arrays. These types gather the
//! values of a single region for UI inspection and ray picking.

use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::biome::{Biome, MoistureZone, TemperatureZone};

/// Full climate and biome record of one region
///
/// Built on demand by [`crate::Planet::region_info`]; nothing holds on to
/// these between queries.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RegionInfo {
    /// Region id (0 to region_count-1)
    pub id: usize,

    /// Unit position of the region center
    pub position: Vec3,

    /// Elevation in [-1, 1], negative below sea level
    pub elevation: f32,

    /// Moisture in [0, 1]
    pub moisture: f32,

    /// Temperature in configured degrees
    pub temperature: f32,

    /// Normalized temperature in [0, 1]
    pub temperature_ratio: f32,

    /// Insolation in [0, 1] at the current point of the year
    pub insolation: f32,

    pub biome: Biome,
    pub moisture_zone: MoistureZone,
    pub temperature_zone: TemperatureZone,

    /// Plate id (seed region of the plate)
    pub plate: usize,

    /// Whether the plate is oceanic
    pub is_ocean_plate: bool,

    /// Hops to the nearest ocean; `None` for ocean and unreachable land
    pub coast_distance: Option<u32>,

    pub roughness: f32,
    pub desirability: f32,

    /// Adjacent region ids in circulation order
    pub neighbors: Vec<usize>,

    /// Border polygon through the surrounding triangle centers
    pub polygon: Vec<Vec3>,
}

impl RegionInfo {
    /// Get the number of neighboring regions
    ///
    /// Typically 5-7, exactly 3 only in degenerate spots.
    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Check if this region borders another region
    #[inline]
    pub fn is_neighbor_of(&self, other_id: usize) -> bool {
        self.neighbors.contains(&other_id)
    }

    /// Whether the region lies below sea level
    #[inline]
    pub fn is_ocean(&self) -> bool {
        self.elevation < 0.0
    }

    /// Approximate surface area of the border polygon
    ///
    /// Sums the flat triangles between the center and consecutive polygon
    /// vertices, which is close to the spherical area for small cells.
    pub fn approximate_area(&self) -> f32 {
        if self.polygon.len() < 3 {
            return 0.0;
        }

        let n = self.polygon.len();
        (0..n)
            .map(|i| {
                let a = self.polygon[i] - self.position;
                let b = self.polygon[(i + 1) % n] - self.position;
                a.cross(b).length() * 0.5
            })
            .sum()
    }
}

/// Result of a ray pick
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPick {
    /// Region that was hit
    pub region: usize,

    /// Hit point on the mesh surface
    pub point: Vec3,

    /// Distance along the ray, in multiples of the direction length
    pub time_of_impact: f32,

    /// Border polygon of the region
    pub polygon: Vec<Vec3>,
}
