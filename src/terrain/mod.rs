//! Tectonics, elevation and coastline distance
//!
//! Plates are grown from random seeds, their collisions seed mountains,
//! coastlines and oceans, and elevation is interpolated between those seeds
//! with three hop-distance fields plus fractal noise.

mod coast;
mod elevation;
mod noise;
mod plates;

pub use coast::{coast_distance_field, CoastDistance};
pub use elevation::{assign_region_elevation, distance_field, find_collisions, CollisionSeeds};
pub use noise::{FractalConfig, FractalNoise, PlanetNoise};
pub use plates::{pick_random_regions, Plate, Plates};

use crate::mesh::DualMesh;
use crate::rng::SeededRng;

/// Flood fill that expands a random frontier element instead of the oldest one
///
/// The frontier is `queue[out..]`. Each step swaps a random frontier element to
/// `out`, expands it, and appends every neighbor for which `claim(current,
/// neighbor)` returns true. Compared with breadth-first order this makes region
/// boundaries irregular rather than Voronoi-like.
pub(crate) fn randomized_flood_fill<F>(mesh: &DualMesh, mut queue: Vec<usize>, rng: &mut SeededRng, mut claim: F)
where
    F: FnMut(usize, usize) -> bool,
{
    let mut out = 0;
    while out < queue.len() {
        let pick = out + rng.next_int(queue.len() - out);
        queue.swap(out, pick);
        let current = queue[out];
        for s in mesh.incoming_sides(current) {
            let neighbor = mesh.begin_region(s);
            if claim(current, neighbor) {
                queue.push(neighbor);
            }
        }
        out += 1;
    }
}
