//! Seeded procedural planet generation on a spherical Voronoi mesh
//!
//! Builds a closed sphere mesh from a jittered Fibonacci spiral, then runs a
//! fixed pipeline over it: tectonic plates, elevation from plate collisions,
//! coastline distance, temperature/moisture/insolation, river flow, biomes and
//! derived metrics. The same configuration always produces the same planet.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use voronoi_worldgen::*;
//!
//! let config = PlanetConfigBuilder::new()
//!     .seed(42)
//!     .number_cells(20_000).unwrap()
//!     .number_plates(25)
//!     .build().unwrap();
//!
//! let planet = Planet::generate(config).unwrap();
//! if let Some(pick) = planet.pick(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z) {
//!     let info = planet.region_info(pick.region).unwrap();
//!     println!("{:?}, {:.1}°", info.biome, info.temperature);
//! }
//!
//! // Hand the arrays to a renderer
//! let fields = planet.into_fields();
//! println!("{} regions", fields.region_count);
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-region lookups using KD-tree
//! - `serde`: Enables serialization support for configuration, records and field sets

// Modules
pub mod error;
pub mod config;
pub mod rng;
pub mod generation;
pub mod mesh;
pub mod terrain;
pub mod climate;
pub mod rivers;
pub mod biome;
pub mod metrics;
pub mod cell;
pub mod export;
pub mod planet;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{PlanetError, Result};
pub use config::{PlanetConfig, PlanetConfigBuilder, MAX_CELLS};
pub use rng::{RngStream, SeededRng};
pub use generation::{generate_sphere_geometry, SphereGeometry};
pub use mesh::DualMesh;
pub use terrain::{CoastDistance, FractalNoise, Plate, Plates};
pub use climate::ClimateFields;
pub use rivers::RiverFields;
pub use biome::{classify_biome, Biome, MoistureZone, RegionBiome, TemperatureZone};
pub use cell::{RegionInfo, RegionPick};
pub use export::{FieldSet, LineSegments, NONE_INDEX};
pub use planet::Planet;

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::Vec3 for convenience
pub use glam::Vec3;
