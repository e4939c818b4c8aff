//! Hop distance from land regions to the nearest ocean

use std::collections::VecDeque;

use crate::mesh::DualMesh;

/// Per-region distance to the coast
#[derive(Debug, Clone, PartialEq)]
pub struct CoastDistance {
    /// Hops from the nearest ocean region; `None` for ocean regions and for
    /// land that no ocean reaches
    pub distance: Vec<Option<u32>>,
    /// Largest finite distance, 0 if there is none
    pub max_distance: u32,
}

impl CoastDistance {
    /// Distance as a ratio of the maximum, 0 where undefined
    pub fn inland_ratio(&self, r: usize) -> f32 {
        match self.distance[r] {
            Some(d) if self.max_distance > 0 => d as f32 / self.max_distance as f32,
            _ => 0.0,
        }
    }
}

/// Multi-source breadth-first search from every region with elevation < 0
pub fn coast_distance_field(mesh: &DualMesh, elevation: &[f32]) -> CoastDistance {
    let region_count = mesh.region_count();
    let mut hops: Vec<Option<u32>> = vec![None; region_count];
    let mut queue = VecDeque::new();

    for r in 0..region_count {
        if elevation[r] < 0.0 {
            hops[r] = Some(0);
            queue.push_back(r);
        }
    }

    let mut neighbors = Vec::with_capacity(8);
    while let Some(current) = queue.pop_front() {
        let next = hops[current].map_or(0, |d| d + 1);
        mesh.region_neighbors_into(current, &mut neighbors);
        for &n in &neighbors {
            if hops[n].is_none() {
                hops[n] = Some(next);
                queue.push_back(n);
            }
        }
    }

    let distance: Vec<Option<u32>> = hops
        .into_iter()
        .zip(elevation)
        .map(|(d, &e)| if e < 0.0 { None } else { d })
        .collect();
    let max_distance = distance.iter().flatten().copied().max().unwrap_or(0);

    CoastDistance { distance, max_distance }
}
