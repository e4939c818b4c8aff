//! Region elevation from plate collisions
//!
//! Plate boundaries are classified by simulating one small step of plate
//! movement. Regions that get pushed together become mountain or coastline
//! seeds, diverging oceanic boundaries become ocean seeds. Elevation is then
//! interpolated between the seed sets using hop distances:
//!
//! ```text
//! e = (1/a - 1/b) / (1/a + 1/b + 1/c)
//! ```
//!
//! where `a` is the distance from mountains, `b` from oceans and `c` from
//! coastlines (each plus ε).

use glam::Vec3;
use log::debug;

use super::{randomized_flood_fill, FractalNoise, Plates};
use crate::mesh::DualMesh;
use crate::rng::{RngStream, SeededRng};

/// Simulated movement step
const DELTA_TIME: f32 = 1e-2;
/// Distance reduction (per unit time) that counts as a collision
const COLLISION_THRESHOLD: f32 = 0.75;
/// Added to every distance so the formula never divides by zero
const EPSILON: f32 = 1e-3;
/// Elevation where no mountain or ocean is reachable
const UNREACHABLE_ELEVATION: f32 = 0.1;

/// Seed regions produced by collision detection, each in ascending region order
#[derive(Debug, Clone, Default)]
pub struct CollisionSeeds {
    /// Converging continental boundaries
    pub mountains: Vec<usize>,
    /// Converging oceanic or mixed boundaries, plus continental plate seeds
    pub coastlines: Vec<usize>,
    /// Diverging oceanic boundaries, plus oceanic plate seeds
    pub oceans: Vec<usize>,
}

/// Classify plate-boundary regions into mountain, coastline and ocean seeds
///
/// For each region the neighbor on another plate that ends up closest after
/// both move for [`DELTA_TIME`] is the collision candidate. The pair collided
/// if their distance shrank by more than `COLLISION_THRESHOLD * DELTA_TIME`.
///
/// | plates        | collided   | not collided                 |
/// |---------------|------------|------------------------------|
/// | land + land   | mountain   | -                            |
/// | ocean + ocean | coastline  | ocean                        |
/// | mixed         | coastline  | ocean if own plate is oceanic |
pub fn find_collisions(mesh: &DualMesh, region_xyz: &[Vec3], plates: &Plates) -> CollisionSeeds {
    let mut seeds = CollisionSeeds::default();

    for r in 0..mesh.region_count() {
        let plate = plates.plate_of(r);
        let moved = region_xyz[r] + plate.movement * DELTA_TIME;

        let mut best: Option<(usize, f32, f32)> = None;
        for s in mesh.incoming_sides(r) {
            let neighbor = mesh.begin_region(s);
            if plates.region_plate[neighbor] == plates.region_plate[r] {
                continue;
            }
            let neighbor_plate = plates.plate_of(neighbor);
            let before = region_xyz[r].distance(region_xyz[neighbor]);
            let after = moved.distance(region_xyz[neighbor] + neighbor_plate.movement * DELTA_TIME);
            if best.map_or(true, |(_, best_after, _)| after < best_after) {
                best = Some((neighbor, after, before - after));
            }
        }

        let Some((neighbor, _, compression)) = best else {
            continue;
        };
        let collided = compression > COLLISION_THRESHOLD * DELTA_TIME;
        let own_ocean = plate.is_ocean;
        let other_ocean = plates.is_ocean_region(neighbor);

        match (own_ocean, other_ocean, collided) {
            (false, false, true) => seeds.mountains.push(r),
            (false, false, false) => {}
            (true, true, true) => seeds.coastlines.push(r),
            (true, true, false) => seeds.oceans.push(r),
            (_, _, true) => seeds.coastlines.push(r),
            (true, false, false) => seeds.oceans.push(r),
            (false, true, false) => {}
        }
    }

    seeds
}

/// Hop distance from `seeds` to every region, never expanding into `stop`
///
/// Uses the randomized flood fill, so ties between equally distant seeds are
/// broken by the random stream. Unreached regions are `f32::INFINITY`.
pub fn distance_field(mesh: &DualMesh, seeds: &[usize], stop: &[bool], rng: &mut SeededRng) -> Vec<f32> {
    let mut distance = vec![f32::INFINITY; mesh.region_count()];
    for &r in seeds {
        distance[r] = 0.0;
    }
    randomized_flood_fill(mesh, seeds.to_vec(), rng, |current, neighbor| {
        if distance[neighbor] == f32::INFINITY && !stop[neighbor] {
            distance[neighbor] = distance[current] + 1.0;
            true
        } else {
            false
        }
    });
    distance
}

/// Compute elevation in [-1, 1] for every region
pub fn assign_region_elevation(
    mesh: &DualMesh,
    region_xyz: &[Vec3],
    plates: &Plates,
    noise: &FractalNoise,
    terrain_roughness: f32,
    height_modifier: f32,
    seed: u32,
) -> Vec<f32> {
    let region_count = mesh.region_count();
    let mut seeds = find_collisions(mesh, region_xyz, plates);

    let mut is_mountain = vec![false; region_count];
    let mut is_coastline = vec![false; region_count];
    let mut is_ocean = vec![false; region_count];
    for &r in &seeds.mountains {
        is_mountain[r] = true;
    }
    for &r in &seeds.coastlines {
        is_coastline[r] = true;
    }
    for &r in &seeds.oceans {
        is_ocean[r] = true;
    }
    for plate in &plates.plates {
        let r = plate.seed_region;
        if plate.is_ocean && !is_ocean[r] {
            is_ocean[r] = true;
            seeds.oceans.push(r);
        } else if !plate.is_ocean && !is_coastline[r] {
            is_coastline[r] = true;
            seeds.coastlines.push(r);
        }
    }

    let stop: Vec<bool> = (0..region_count)
        .map(|r| is_mountain[r] || is_coastline[r] || is_ocean[r])
        .collect();

    debug!(
        "collision seeds: {} mountain, {} coastline, {} ocean",
        seeds.mountains.len(),
        seeds.coastlines.len(),
        seeds.oceans.len()
    );

    let distance_a = distance_field(
        mesh,
        &seeds.mountains,
        &is_ocean,
        &mut SeededRng::new(seed, RngStream::MountainDistance),
    );
    let distance_b = distance_field(
        mesh,
        &seeds.oceans,
        &is_coastline,
        &mut SeededRng::new(seed, RngStream::OceanDistance),
    );
    let distance_c = distance_field(
        mesh,
        &seeds.coastlines,
        &stop,
        &mut SeededRng::new(seed, RngStream::CoastlineDistance),
    );

    (0..region_count)
        .map(|r| {
            let base = blend_distances(distance_a[r], distance_b[r], distance_c[r]);
            let e = base + terrain_roughness * noise.sample(region_xyz[r]);
            (e + height_modifier).clamp(-1.0, 1.0)
        })
        .collect()
}

/// Combine the three distance fields; 0.1 if neither mountains nor oceans are reachable
#[inline]
fn blend_distances(a: f32, b: f32, c: f32) -> f32 {
    if a.is_infinite() && b.is_infinite() {
        return UNREACHABLE_ELEVATION;
    }
    let (a, b, c) = (a + EPSILON, b + EPSILON, c + EPSILON);
    (1.0 / a - 1.0 / b) / (1.0 / a + 1.0 / b + 1.0 / c)
}
