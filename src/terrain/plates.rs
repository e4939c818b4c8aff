//! Tectonic plate assignment via randomized flood fill

use glam::Vec3;
use log::debug;

use super::randomized_flood_fill;
use crate::mesh::DualMesh;
use crate::rng::{RngStream, SeededRng};

/// One tectonic plate, identified by its seed region
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plate {
    /// Region the plate grew from; also the plate id
    pub seed_region: usize,
    /// Unit tangential movement direction
    pub movement: Vec3,
    /// Whether the plate carries ocean floor
    pub is_ocean: bool,
}

/// Plate membership for every region
#[derive(Debug, Clone)]
pub struct Plates {
    /// Plates in the order their seeds were picked
    pub plates: Vec<Plate>,
    /// Plate id (seed region) of each region
    pub region_plate: Vec<usize>,
    /// Index into `plates` for seed regions, `None` elsewhere
    slot: Vec<Option<usize>>,
}

impl Plates {
    /// Partition the mesh into `plate_count` plates
    ///
    /// `plate_count` must already be clamped to [1, region_count].
    pub fn generate(
        mesh: &DualMesh,
        region_xyz: &[Vec3],
        plate_count: usize,
        ocean_plate_percent: f32,
        seed: u32,
    ) -> Self {
        let region_count = mesh.region_count();
        let seeds = pick_random_regions(region_count, plate_count, &mut SeededRng::new(seed, RngStream::PlateSeeds));

        let mut region_plate = vec![usize::MAX; region_count];
        for &r in &seeds {
            region_plate[r] = r;
        }
        let mut growth = SeededRng::new(seed, RngStream::PlateGrowth);
        randomized_flood_fill(mesh, seeds.clone(), &mut growth, |current, neighbor| {
            if region_plate[neighbor] == usize::MAX {
                region_plate[neighbor] = region_plate[current];
                true
            } else {
                false
            }
        });

        let mut coin = SeededRng::new(seed, RngStream::OceanPlates);
        let mut slot = vec![None; region_count];
        let plates: Vec<Plate> = seeds
            .iter()
            .enumerate()
            .map(|(i, &r)| {
                slot[r] = Some(i);
                Plate {
                    seed_region: r,
                    movement: movement_vector(mesh, region_xyz, r),
                    is_ocean: coin.next_float() < ocean_plate_percent,
                }
            })
            .collect();

        debug!(
            "{} plates, {} oceanic",
            plates.len(),
            plates.iter().filter(|p| p.is_ocean).count()
        );

        Self {
            plates,
            region_plate,
            slot,
        }
    }

    /// Plate with the given id (seed region)
    #[inline]
    pub fn plate(&self, id: usize) -> Option<&Plate> {
        self.slot.get(id).copied().flatten().map(|i| &self.plates[i])
    }

    /// Plate a region belongs to
    #[inline]
    pub fn plate_of(&self, r: usize) -> &Plate {
        let id = self.region_plate[r];
        &self.plates[self.slot[id].unwrap_or_default()]
    }

    /// Whether a region sits on an oceanic plate
    #[inline]
    pub fn is_ocean_region(&self, r: usize) -> bool {
        self.plate_of(r).is_ocean
    }

    /// Number of plates
    #[inline]
    pub fn len(&self) -> usize {
        self.plates.len()
    }

    /// Whether there are no plates
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.plates.is_empty()
    }
}

/// Pick `count` distinct regions by rejection sampling
pub fn pick_random_regions(region_count: usize, count: usize, rng: &mut SeededRng) -> Vec<usize> {
    let count = count.min(region_count);
    let mut taken = vec![false; region_count];
    let mut chosen = Vec::with_capacity(count);
    while chosen.len() < count {
        let r = rng.next_int(region_count);
        if !taken[r] {
            taken[r] = true;
            chosen.push(r);
        }
    }
    chosen
}

/// Direction from a seed region towards its first neighbor
fn movement_vector(mesh: &DualMesh, region_xyz: &[Vec3], r: usize) -> Vec3 {
    mesh.incoming_sides(r)
        .next()
        .map(|s| (region_xyz[mesh.begin_region(s)] - region_xyz[r]).normalize_or_zero())
        .unwrap_or(Vec3::ZERO)
}
