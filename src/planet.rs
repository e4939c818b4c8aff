//! Planet main structure and the generation pipeline

use std::collections::VecDeque;
use std::time::Instant;

use glam::Vec3;
use log::{debug, info, warn};
use parry3d::math::{Point, Real, Vector};
use parry3d::query::{Ray, RayCast};
use parry3d::shape::Triangle;

use crate::biome::{classify_region, Biome, RegionBiome};
use crate::cell::{RegionInfo, RegionPick};
use crate::climate::{assign_climate, assign_insolation, update_insolation, ClimateFields, ClimateInput, ClimateSettings};
use crate::config::PlanetConfig;
use crate::error::{PlanetError, Result};
use crate::export::{
    coastline_segments, flatten_optional, plate_border_segments, river_segments, FieldSet, LineSegments,
};
use crate::generation::{generate_sphere_geometry, SphereGeometry};
use crate::mesh::DualMesh;
use crate::metrics::{assign_desirability, assign_roughness};
use crate::rivers::{assign_rivers, RiverFields};
use crate::terrain::{assign_region_elevation, coast_distance_field, CoastDistance, PlanetNoise, Plates};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// A fully generated planet
///
/// Every field is a flat array indexed by region, triangle or side id. The
/// planet owns its arrays; [`Planet::into_fields`] moves them out for hand-off.
///
/// # Examples
///
/// ```
/// use voronoi_worldgen::*;
///
/// let config = PlanetConfigBuilder::new()
///     .seed(42)
///     .number_cells(2000)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let planet = Planet::generate(config).unwrap();
/// assert_eq!(planet.region_count(), 2000);
///
/// let info = planet.region_info(0).unwrap();
/// println!("Region 0 is {:?} at {:.2}", info.biome, info.elevation);
/// ```
#[derive(Clone)]
pub struct Planet {
    config: PlanetConfig,
    mesh: DualMesh,
    region_xyz: Vec<Vec3>,
    triangle_xyz: Vec<Vec3>,
    plates: Plates,
    elevation: Vec<f32>,
    coast: CoastDistance,
    climate: ClimateFields,
    insolation: Vec<f32>,
    rivers: RiverFields,
    biomes: Vec<RegionBiome>,
    roughness: Vec<f32>,
    desirability: Vec<f32>,

    /// Spatial index for fast position-to-region lookups (requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl Planet {
    /// Run the whole pipeline for `config`
    ///
    /// Stages run in a fixed order: mesh, plates, elevation, coastline
    /// distance, climate, rivers, biomes, metrics. Each run owns freshly
    /// allocated arrays.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the configuration fails validation; nothing is built
    /// - `Topology` if the sphere cannot be triangulated and stitched
    /// - `Classification` if a climate value escapes [0, 1]
    pub fn generate(config: PlanetConfig) -> Result<Self> {
        config.validate()?;
        let total_start = Instant::now();

        let plate_count = config.effective_plate_count();
        if plate_count != config.number_plates {
            warn!(
                "number_plates {} clamped to {} for {} cells",
                config.number_plates, plate_count, config.number_cells
            );
        }

        let stage = Instant::now();
        let SphereGeometry {
            mesh,
            region_xyz,
            triangle_xyz,
        } = generate_sphere_geometry(&config)?;
        debug!(
            "mesh: {} regions, {} triangles, {} sides in {:?}",
            mesh.region_count(),
            mesh.triangle_count(),
            mesh.side_count(),
            stage.elapsed()
        );

        let noise = PlanetNoise::new(config.seed);

        let stage = Instant::now();
        let plates = Plates::generate(&mesh, &region_xyz, plate_count, config.ocean_plate_percent, config.seed);
        debug!("plates: {} in {:?}", plates.len(), stage.elapsed());

        let stage = Instant::now();
        let elevation = assign_region_elevation(
            &mesh,
            &region_xyz,
            &plates,
            &noise.elevation,
            config.terrain_roughness,
            config.height_modifier,
            config.seed,
        );
        debug!("elevation in {:?}", stage.elapsed());

        let stage = Instant::now();
        let coast = coast_distance_field(&mesh, &elevation);
        debug!("coast distance: max {} in {:?}", coast.max_distance, stage.elapsed());

        let stage = Instant::now();
        let climate = assign_climate(
            &ClimateInput {
                region_xyz: &region_xyz,
                elevation: &elevation,
                coast: &coast,
                noise: &noise,
            },
            &ClimateSettings {
                moisture_modifier: config.moisture_modifier,
                temperature_modifier: config.temperature_modifier,
                min_temperature: config.min_temperature,
                max_temperature: config.max_temperature,
            },
        );
        let insolation = assign_insolation(&region_xyz, config.axial_tilt, 0.0);
        debug!("climate in {:?}", stage.elapsed());

        let stage = Instant::now();
        let rivers = assign_rivers(&mesh, &elevation, &climate.moisture, config.flow_modifier);
        debug!(
            "rivers: {} of {} triangles routed in {:?}",
            rivers.order.len(),
            mesh.triangle_count(),
            stage.elapsed()
        );

        let stage = Instant::now();
        let biomes = (0..mesh.region_count())
            .map(|r| classify_region(elevation[r], climate.moisture[r], climate.temperature_ratio[r]))
            .collect::<Result<Vec<_>>>()?;
        debug!("biomes in {:?}", stage.elapsed());

        let stage = Instant::now();
        let roughness = assign_roughness(&mesh, &elevation, &rivers.triangle_elevation);
        let desirability = assign_desirability(&elevation, &climate.temperature_ratio, &climate.moisture);
        debug!("metrics in {:?}", stage.elapsed());

        #[cfg(feature = "spatial-index")]
        let spatial_index = SpatialIndex::new(&region_xyz);

        let ocean_regions = elevation.iter().filter(|&&e| e < 0.0).count();
        info!(
            "generated planet seed {}: {} regions ({} ocean), {} plates in {:?}",
            config.seed,
            mesh.region_count(),
            ocean_regions,
            plates.len(),
            total_start.elapsed()
        );

        Ok(Self {
            config,
            mesh,
            region_xyz,
            triangle_xyz,
            plates,
            elevation,
            coast,
            climate,
            insolation,
            rivers,
            biomes,
            roughness,
            desirability,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    /// Get the configuration used to generate this planet
    #[inline]
    pub fn config(&self) -> &PlanetConfig {
        &self.config
    }

    #[inline]
    pub fn mesh(&self) -> &DualMesh {
        &self.mesh
    }

    #[inline]
    pub fn region_count(&self) -> usize {
        self.mesh.region_count()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    #[inline]
    pub fn side_count(&self) -> usize {
        self.mesh.side_count()
    }

    #[inline]
    pub fn region_xyz(&self) -> &[Vec3] {
        &self.region_xyz
    }

    #[inline]
    pub fn triangle_xyz(&self) -> &[Vec3] {
        &self.triangle_xyz
    }

    #[inline]
    pub fn plates(&self) -> &Plates {
        &self.plates
    }

    #[inline]
    pub fn elevation(&self) -> &[f32] {
        &self.elevation
    }

    #[inline]
    pub fn moisture(&self) -> &[f32] {
        &self.climate.moisture
    }

    /// Temperature in configured degrees
    #[inline]
    pub fn temperature(&self) -> &[f32] {
        &self.climate.temperature
    }

    /// Normalized temperature in [0, 1]
    #[inline]
    pub fn temperature_ratio(&self) -> &[f32] {
        &self.climate.temperature_ratio
    }

    #[inline]
    pub fn insolation(&self) -> &[f32] {
        &self.insolation
    }

    #[inline]
    pub fn coast_distance(&self) -> &CoastDistance {
        &self.coast
    }

    #[inline]
    pub fn rivers(&self) -> &RiverFields {
        &self.rivers
    }

    #[inline]
    pub fn biomes(&self) -> &[RegionBiome] {
        &self.biomes
    }

    /// Biome of a region, `None` if the id is out of range
    #[inline]
    pub fn biome(&self, r: usize) -> Option<Biome> {
        self.biomes.get(r).map(|b| b.biome)
    }

    #[inline]
    pub fn roughness(&self) -> &[f32] {
        &self.roughness
    }

    #[inline]
    pub fn desirability(&self) -> &[f32] {
        &self.desirability
    }

    /// Border polygon of a region through the centers of its triangles
    pub fn region_polygon(&self, r: usize) -> Vec<Vec3> {
        self.mesh
            .incoming_sides(r)
            .map(|s| self.triangle_xyz[self.mesh.inner_triangle(s)])
            .collect()
    }

    /// Full climate and biome record of a region
    ///
    /// # Errors
    ///
    /// Returns `RegionNotFound` if `r` is not a region id.
    pub fn region_info(&self, r: usize) -> Result<RegionInfo> {
        if r >= self.region_count() {
            return Err(PlanetError::RegionNotFound(r));
        }
        let zones = self.biomes[r];
        Ok(RegionInfo {
            id: r,
            position: self.region_xyz[r],
            elevation: self.elevation[r],
            moisture: self.climate.moisture[r],
            temperature: self.climate.temperature[r],
            temperature_ratio: self.climate.temperature_ratio[r],
            insolation: self.insolation[r],
            biome: zones.biome,
            moisture_zone: zones.moisture_zone,
            temperature_zone: zones.temperature_zone,
            plate: self.plates.region_plate[r],
            is_ocean_plate: self.plates.is_ocean_region(r),
            coast_distance: self.coast.distance[r],
            roughness: self.roughness[r],
            desirability: self.desirability[r],
            neighbors: self.mesh.region_neighbors(r),
            polygon: self.region_polygon(r),
        })
    }

    /// First region hit by a ray, with its border polygon
    ///
    /// The ray is cast against the triangle fans that cover each region
    /// (center plus two consecutive triangle centers). Returns `None` for a
    /// zero direction or a ray that misses the planet.
    pub fn pick(&self, origin: Vec3, direction: Vec3) -> Option<RegionPick> {
        if direction.length_squared() == 0.0 {
            return None;
        }
        let ray = Ray::new(to_point(origin), Vector::new(direction.x, direction.y, direction.z));

        let mut best: Option<(usize, Real)> = None;
        for r in 0..self.region_count() {
            let center = to_point(self.region_xyz[r]);
            for s in self.mesh.incoming_sides(r) {
                let fan = Triangle::new(
                    center,
                    to_point(self.triangle_xyz[self.mesh.inner_triangle(s)]),
                    to_point(self.triangle_xyz[self.mesh.outer_triangle(s)]),
                );
                let max_time = best.map_or(Real::MAX, |(_, toi)| toi);
                if let Some(toi) = fan.cast_local_ray(&ray, max_time, true) {
                    if toi < max_time {
                        best = Some((r, toi));
                    }
                }
            }
        }

        best.map(|(region, toi)| RegionPick {
            region,
            point: origin + direction * toi,
            time_of_impact: toi,
            polygon: self.region_polygon(region),
        })
    }

    /// Find the region under a position at any altitude (requires spatial-index feature)
    ///
    /// Returns `None` for the origin or a non-finite position.
    #[cfg(feature = "spatial-index")]
    pub fn find_region_at(&self, position: Vec3) -> Option<usize> {
        self.spatial_index.find_nearest(position)
    }

    /// Regions within `hops` steps of `center`, including `center`, in BFS order
    ///
    /// Returns an empty list if `center` is not a region id.
    pub fn regions_within_hops(&self, center: usize, hops: usize) -> Vec<usize> {
        if center >= self.region_count() {
            return vec![];
        }

        let mut depth = vec![usize::MAX; self.region_count()];
        let mut found = vec![center];
        let mut queue = VecDeque::from([center]);
        depth[center] = 0;

        while let Some(r) = queue.pop_front() {
            if depth[r] == hops {
                continue;
            }
            for s in self.mesh.incoming_sides(r) {
                let n = self.mesh.begin_region(s);
                if depth[n] == usize::MAX {
                    depth[n] = depth[r] + 1;
                    found.push(n);
                    queue.push_back(n);
                }
            }
        }

        found
    }

    /// Recompute insolation for a point of the year in [0, 1)
    ///
    /// This is the only field that changes after generation.
    pub fn update_insolation(&mut self, year_ratio: f32) {
        update_insolation(&mut self.insolation, &self.region_xyz, self.config.axial_tilt, year_ratio);
    }

    /// Land/ocean boundary edges
    pub fn coastlines(&self) -> LineSegments {
        coastline_segments(&self.mesh, &self.triangle_xyz, &self.elevation)
    }

    /// River edges weighted by flow
    pub fn river_segments(&self) -> LineSegments {
        river_segments(&self.mesh, &self.triangle_xyz, &self.rivers.side_flow)
    }

    /// Plate boundary edges weighted by convergence
    pub fn plate_borders(&self) -> LineSegments {
        plate_border_segments(&self.mesh, &self.region_xyz, &self.triangle_xyz, &self.plates)
    }

    /// Move every field array out of the planet
    pub fn into_fields(self) -> FieldSet {
        let region_count = self.mesh.region_count();
        let triangle_count = self.mesh.triangle_count();
        let side_count = self.mesh.side_count();

        FieldSet {
            region_count,
            triangle_count,
            side_count,
            region_xyz: self.region_xyz,
            elevation: self.elevation,
            moisture: self.climate.moisture,
            temperature: self.climate.temperature,
            temperature_ratio: self.climate.temperature_ratio,
            insolation: self.insolation,
            biome: self.biomes.iter().map(|b| b.biome).collect(),
            plate: self.plates.region_plate,
            coast_distance: flatten_optional(&self.coast.distance),
            max_coast_distance: self.coast.max_distance,
            roughness: self.roughness,
            desirability: self.desirability,
            triangle_xyz: self.triangle_xyz,
            triangle_elevation: self.rivers.triangle_elevation,
            triangle_moisture: self.rivers.triangle_moisture,
            triangle_flow: self.rivers.triangle_flow,
            downflow: flatten_optional(&self.rivers.downflow),
            order: self.rivers.order,
            side_flow: self.rivers.side_flow,
        }
    }
}

#[inline]
fn to_point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::NONE_INDEX;
    use crate::PlanetConfigBuilder;

    fn small_config(seed: u32) -> PlanetConfig {
        PlanetConfig {
            seed,
            number_cells: 1000,
            number_plates: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_reference_scenario() {
        let config = PlanetConfigBuilder::new()
            .seed(123)
            .number_cells(1000)
            .unwrap()
            .number_plates(10)
            .ocean_plate_percent(0.75)
            .unwrap()
            .build()
            .unwrap();

        let planet = Planet::generate(config).unwrap();

        assert_eq!(planet.region_count(), 1000);
        assert_eq!(planet.side_count(), 3 * planet.triangle_count());
        assert!(planet.biomes().iter().any(|b| b.biome == Biome::Ocean));
        assert!(planet.biomes().iter().any(|b| b.biome.is_land()));
        let coast = planet.coast_distance();
        assert_eq!(coast.max_distance, coast.distance.iter().flatten().copied().max().unwrap_or(0));
    }

    fn assert_closed_planet(planet: &Planet, number_cells: usize) {
        let mesh = planet.mesh();
        assert_eq!(planet.region_count(), number_cells);
        assert_eq!(planet.triangle_count(), 2 * number_cells - 4);
        for s in 0..mesh.side_count() {
            let o = mesh.opposite(s);
            assert_eq!(mesh.opposite(o), s);
            assert_eq!(mesh.begin_region(s), mesh.end_region(o));
        }
        assert!(planet.elevation().iter().all(|e| (-1.0..=1.0).contains(e)));
    }

    #[test]
    fn test_every_seed_generates_at_jitter_extremes() {
        for jitter in [0.0, 1.0] {
            for seed in 0..200 {
                let config = PlanetConfig {
                    seed,
                    jitter,
                    number_cells: 400,
                    number_plates: 8,
                    ..Default::default()
                };
                let planet = match Planet::generate(config) {
                    Ok(planet) => planet,
                    Err(err) => panic!("seed {} jitter {}: {}", seed, jitter, err),
                };
                assert_closed_planet(&planet, 400);
            }
        }
    }

    #[test]
    fn test_point_jittered_past_pole() {
        // This seed throws its first sample over the north pole
        let planet = Planet::generate(small_config(240)).unwrap();
        assert_closed_planet(&planet, 1000);
    }

    #[test]
    fn test_zero_cells_rejected() {
        let config = PlanetConfig {
            number_cells: 0,
            ..Default::default()
        };
        assert!(matches!(Planet::generate(config), Err(PlanetError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_temperature_range_rejected() {
        let config = PlanetConfig {
            min_temperature: 10.0,
            max_temperature: 10.0,
            ..small_config(1)
        };
        assert!(matches!(Planet::generate(config), Err(PlanetError::InvalidConfig(_))));
    }

    #[test]
    fn test_seed_changes_elevation() {
        let a = Planet::generate(small_config(1)).unwrap();
        let b = Planet::generate(small_config(2)).unwrap();
        assert_ne!(a.elevation(), b.elevation());
    }

    #[test]
    fn test_determinism() {
        let a = Planet::generate(small_config(99)).unwrap().into_fields();
        let b = Planet::generate(small_config(99)).unwrap().into_fields();

        assert_eq!(a.region_xyz, b.region_xyz);
        assert_eq!(a.elevation, b.elevation);
        assert_eq!(a.moisture, b.moisture);
        assert_eq!(a.temperature, b.temperature);
        assert_eq!(a.biome, b.biome);
        assert_eq!(a.plate, b.plate);
        assert_eq!(a.downflow, b.downflow);
        assert_eq!(a.side_flow, b.side_flow);
        assert_eq!(a.desirability, b.desirability);
    }

    #[test]
    fn test_field_ranges() {
        let config = small_config(7);
        let planet = Planet::generate(config).unwrap();

        assert!(planet.elevation().iter().all(|e| (-1.0..=1.0).contains(e)));
        assert!(planet.moisture().iter().all(|m| (0.0..=1.0).contains(m)));
        assert!(planet
            .temperature()
            .iter()
            .all(|t| (config.min_temperature..=config.max_temperature).contains(t)));
        assert!(planet.insolation().iter().all(|i| (0.0..=1.0).contains(i)));
        assert!(planet.roughness().iter().all(|&r| r >= 0.0));
        assert!(planet.desirability().iter().all(|&d| d >= 0.0));
        for r in 0..planet.region_count() {
            if planet.elevation()[r] < 0.0 {
                assert_eq!(planet.desirability()[r], 0.0);
                assert_eq!(planet.coast_distance().distance[r], None);
            }
        }
    }

    #[test]
    fn test_plate_invariants() {
        let planet = Planet::generate(small_config(5)).unwrap();
        let plates = planet.plates();

        assert_eq!(plates.len(), 10);
        for &id in &plates.region_plate {
            assert!(plates.plate(id).is_some());
        }
        for plate in &plates.plates {
            assert_eq!(plates.region_plate[plate.seed_region], plate.seed_region);
        }
    }

    #[test]
    fn test_plate_count_is_clamped() {
        let config = PlanetConfig {
            number_cells: 50,
            number_plates: 0,
            ..Default::default()
        };
        let planet = Planet::generate(config).unwrap();
        assert_eq!(planet.plates().len(), 1);

        let config = PlanetConfig {
            number_cells: 50,
            number_plates: 500,
            ..Default::default()
        };
        let planet = Planet::generate(config).unwrap();
        assert_eq!(planet.plates().len(), 50);
    }

    #[test]
    fn test_no_river_flow_next_to_ocean() {
        let planet = Planet::generate(small_config(11)).unwrap();
        let mesh = planet.mesh();
        for s in 0..planet.side_count() {
            let begin = planet.elevation()[mesh.begin_region(s)];
            let end = planet.elevation()[mesh.end_region(s)];
            if begin < 0.0 || end < 0.0 {
                assert_eq!(planet.rivers().side_flow[s], 0.0);
            }
        }
    }

    #[test]
    fn test_region_info() {
        let planet = Planet::generate(small_config(3)).unwrap();
        let info = planet.region_info(17).unwrap();

        assert_eq!(info.id, 17);
        assert_eq!(info.elevation, planet.elevation()[17]);
        assert_eq!(info.biome, planet.biome(17).unwrap());
        assert_eq!(info.neighbor_count(), info.polygon.len());
        assert!(info.neighbor_count() >= 3);
        assert!(info.approximate_area() > 0.0);

        assert_eq!(planet.region_info(1000), Err(PlanetError::RegionNotFound(1000)));
        assert_eq!(planet.biome(1000), None);
    }

    #[test]
    fn test_pick() {
        let planet = Planet::generate(small_config(8)).unwrap();
        let r = 123;
        let s = planet.mesh().incoming_sides(r).next().unwrap();
        // Interior point of one of the region's fan triangles
        let target = planet.region_xyz()[r] * 0.8
            + planet.triangle_xyz()[planet.mesh().inner_triangle(s)] * 0.1
            + planet.triangle_xyz()[planet.mesh().outer_triangle(s)] * 0.1;

        let pick = planet.pick(target * 3.0, -target).unwrap();
        assert_eq!(pick.region, r);
        assert!((pick.point - target).length() < 1e-3);
        assert_eq!(pick.polygon, planet.region_polygon(r));

        assert!(planet.pick(target * 3.0, target).is_none());
        assert!(planet.pick(target * 3.0, Vec3::ZERO).is_none());
    }

    #[cfg(feature = "spatial-index")]
    #[test]
    fn test_find_region_at() {
        let planet = Planet::generate(small_config(8)).unwrap();
        for r in [0, 250, 999] {
            assert_eq!(planet.find_region_at(planet.region_xyz()[r]), Some(r));
            assert_eq!(planet.find_region_at(planet.region_xyz()[r] * 2.5), Some(r));
        }
        assert_eq!(planet.find_region_at(Vec3::ZERO), None);
    }

    #[test]
    fn test_regions_within_hops() {
        let planet = Planet::generate(small_config(4)).unwrap();

        assert_eq!(planet.regions_within_hops(0, 0), vec![0]);

        let ring = planet.regions_within_hops(0, 1);
        assert_eq!(ring.len(), 1 + planet.mesh().region_neighbors(0).len());

        let wider = planet.regions_within_hops(0, 2);
        assert!(wider.len() > ring.len());
        assert!(planet.regions_within_hops(5000, 3).is_empty());
    }

    #[test]
    fn test_update_insolation() {
        let mut planet = Planet::generate(small_config(2)).unwrap();
        let winter = planet.insolation().to_vec();
        planet.update_insolation(0.5);
        assert_ne!(planet.insolation(), winter.as_slice());
        assert!(planet.insolation().iter().all(|i| (0.0..=1.0).contains(i)));
    }

    #[test]
    fn test_into_fields() {
        let planet = Planet::generate(small_config(6)).unwrap();
        let elevation = planet.elevation().to_vec();
        let rivers = planet.river_segments();
        let coastlines = planet.coastlines();
        let borders = planet.plate_borders();
        let fields = planet.into_fields();

        assert_eq!(fields.region_count, 1000);
        assert_eq!(fields.elevation, elevation);
        assert_eq!(fields.downflow.len(), fields.triangle_count);
        assert_eq!(fields.side_flow.len(), fields.side_count);
        assert!(fields.downflow.iter().all(|&d| d == NONE_INDEX || (d as usize) < fields.side_count));
        for (r, &d) in fields.coast_distance.iter().enumerate() {
            if fields.elevation[r] < 0.0 {
                assert_eq!(d, NONE_INDEX);
            } else {
                assert!(d == NONE_INDEX || (1..=fields.max_coast_distance as i32).contains(&d));
            }
        }
        assert_eq!(rivers.len(), fields.side_flow.iter().filter(|&&f| f > 0.0).count());
        assert!(!coastlines.is_empty());
        assert!(!borders.is_empty());
    }

    #[test]
    fn test_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Planet>();
        assert_send::<FieldSet>();
    }
}
