//! Flat field arrays and line geometry for consumers
//!
//! [`FieldSet`] owns every generated array. It is produced by moving the
//! planet's buffers out, so handing a generated world to another thread costs
//! no copies.

use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::biome::Biome;
use crate::mesh::DualMesh;
use crate::terrain::Plates;

/// Sentinel for "no value" in flattened integer arrays
pub const NONE_INDEX: i32 = -1;

/// Every generated field, indexed by region, triangle or side
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    pub region_count: usize,
    pub triangle_count: usize,
    pub side_count: usize,

    // Per region
    pub region_xyz: Vec<Vec3>,
    pub elevation: Vec<f32>,
    pub moisture: Vec<f32>,
    pub temperature: Vec<f32>,
    pub temperature_ratio: Vec<f32>,
    pub insolation: Vec<f32>,
    pub biome: Vec<Biome>,
    pub plate: Vec<usize>,
    /// Hops to the nearest ocean, [`NONE_INDEX`] for ocean and unreachable land
    pub coast_distance: Vec<i32>,
    pub max_coast_distance: u32,
    pub roughness: Vec<f32>,
    pub desirability: Vec<f32>,

    // Per triangle
    pub triangle_xyz: Vec<Vec3>,
    pub triangle_elevation: Vec<f32>,
    pub triangle_moisture: Vec<f32>,
    pub triangle_flow: Vec<f32>,
    /// Drain side per triangle, [`NONE_INDEX`] for roots and unreached triangles
    pub downflow: Vec<i32>,
    /// Triangles in river visit order
    pub order: Vec<usize>,

    // Per side
    pub side_flow: Vec<f32>,
}

/// Flatten optional indices with [`NONE_INDEX`]
///
/// Indices come from a validated mesh, and `PlanetConfig` caps the cell count
/// at [`crate::config::MAX_CELLS`] so every side index fits in an `i32`.
pub(crate) fn flatten_optional<T: Copy + TryInto<i32>>(values: &[Option<T>]) -> Vec<i32> {
    values
        .iter()
        .map(|v| match v {
            Some(v) => {
                let index = (*v).try_into();
                debug_assert!(index.is_ok(), "index does not fit in i32");
                index.unwrap_or(NONE_INDEX)
            }
            None => NONE_INDEX,
        })
        .collect()
}

/// Line segments with one scalar per segment
///
/// `points` holds two entries per segment.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineSegments {
    pub points: Vec<Vec3>,
    pub values: Vec<f32>,
}

impl LineSegments {
    /// Number of segments
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn push(&mut self, a: Vec3, b: Vec3, value: f32) {
        self.points.push(a);
        self.points.push(b);
        self.values.push(value);
    }

    /// Iterate `(start, end, value)`
    pub fn iter(&self) -> impl Iterator<Item = (Vec3, Vec3, f32)> + '_ {
        self.points
            .chunks_exact(2)
            .zip(&self.values)
            .map(|(pair, &value)| (pair[0], pair[1], value))
    }
}

/// Border edge between the two triangles of a side
#[inline]
fn border(mesh: &DualMesh, triangle_xyz: &[Vec3], s: usize) -> (Vec3, Vec3) {
    (triangle_xyz[mesh.inner_triangle(s)], triangle_xyz[mesh.outer_triangle(s)])
}

/// Edges between land and ocean regions; value is the land elevation
pub fn coastline_segments(mesh: &DualMesh, triangle_xyz: &[Vec3], elevation: &[f32]) -> LineSegments {
    let mut segments = LineSegments::default();
    for s in 0..mesh.side_count() {
        let land = elevation[mesh.begin_region(s)];
        let sea = elevation[mesh.end_region(s)];
        if land >= 0.0 && sea < 0.0 {
            let (a, b) = border(mesh, triangle_xyz, s);
            segments.push(a, b, land);
        }
    }
    segments
}

/// Segments between triangle centers along sides that carry flow; value is the flow
pub fn river_segments(mesh: &DualMesh, triangle_xyz: &[Vec3], side_flow: &[f32]) -> LineSegments {
    let mut segments = LineSegments::default();
    for (s, &flow) in side_flow.iter().enumerate() {
        if flow > 0.0 {
            segments.push(
                triangle_xyz[mesh.inner_triangle(s)],
                triangle_xyz[mesh.outer_triangle(s)],
                flow,
            );
        }
    }
    segments
}

/// Edges between regions on different plates, each once
///
/// The value is the closing speed of the two plates across the edge: positive
/// where they converge, negative where they pull apart.
pub fn plate_border_segments(
    mesh: &DualMesh,
    region_xyz: &[Vec3],
    triangle_xyz: &[Vec3],
    plates: &Plates,
) -> LineSegments {
    let mut segments = LineSegments::default();
    for s in 0..mesh.side_count() {
        let (begin, end) = (mesh.begin_region(s), mesh.end_region(s));
        if begin > end || plates.region_plate[begin] == plates.region_plate[end] {
            continue;
        }
        let across = (region_xyz[end] - region_xyz[begin]).normalize_or_zero();
        let relative = plates.plate_of(begin).movement - plates.plate_of(end).movement;
        let (a, b) = border(mesh, triangle_xyz, s);
        segments.push(a, b, relative.dot(across));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlanetConfig;
    use crate::generation::{generate_sphere_geometry, SphereGeometry};

    fn geometry() -> SphereGeometry {
        let config = PlanetConfig {
            number_cells: 400,
            seed: 3,
            ..Default::default()
        };
        generate_sphere_geometry(&config).unwrap()
    }

    #[test]
    fn test_flatten_optional() {
        assert_eq!(flatten_optional(&[Some(4usize), None, Some(0)]), vec![4, NONE_INDEX, 0]);
        assert_eq!(flatten_optional(&[Some(7u32), None]), vec![7, NONE_INDEX]);
    }

    #[test]
    fn test_coastline_follows_sign_change() {
        let g = geometry();
        let elevation: Vec<f32> = g.region_xyz.iter().map(|p| p.z).collect();
        let coast = coastline_segments(&g.mesh, &g.triangle_xyz, &elevation);

        let expected = (0..g.mesh.side_count())
            .filter(|&s| elevation[g.mesh.begin_region(s)] >= 0.0 && elevation[g.mesh.end_region(s)] < 0.0)
            .count();
        assert_eq!(coast.len(), expected);
        assert!(!coast.is_empty());
        assert_eq!(coast.points.len(), 2 * coast.len());
        // An equatorial coastline stays near the equator
        for (a, b, value) in coast.iter() {
            assert!(a.z.abs() < 0.3 && b.z.abs() < 0.3);
            assert!(value >= 0.0);
        }
    }

    #[test]
    fn test_river_segments_skip_dry_sides() {
        let g = geometry();
        let mut flow = vec![0.0; g.mesh.side_count()];
        flow[5] = 0.25;
        flow[9] = 1.5;
        let rivers = river_segments(&g.mesh, &g.triangle_xyz, &flow);
        assert_eq!(rivers.values, vec![0.25, 1.5]);
        assert_eq!(rivers.points[0], g.triangle_xyz[g.mesh.inner_triangle(5)]);
    }

    #[test]
    fn test_plate_borders_once_per_edge() {
        let g = geometry();
        let plates = Plates::generate(&g.mesh, &g.region_xyz, 6, 0.5, 3);
        let borders = plate_border_segments(&g.mesh, &g.region_xyz, &g.triangle_xyz, &plates);

        let crossing_sides = (0..g.mesh.side_count())
            .filter(|&s| plates.region_plate[g.mesh.begin_region(s)] != plates.region_plate[g.mesh.end_region(s)])
            .count();
        assert_eq!(borders.len() * 2, crossing_sides);
        assert!(borders.values.iter().all(|v| v.abs() <= 2.0 + 1e-4));
    }
}
