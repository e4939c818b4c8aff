//! River routing over the triangle graph
//!
//! Triangles are visited from the ocean upwards in ascending elevation order.
//! Each land triangle drains through the side it was first reached across, so
//! the drainage graph is a forest rooted in ocean triangles. Flow is then
//! accumulated leaf-first by walking the visit order backwards.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::trace;

use crate::mesh::DualMesh;

#[derive(Clone, Copy, Debug)]
struct HeapItem {
    elevation: f32,
    triangle: usize,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapItem {}

// Min-heap by elevation via reversed ordering; ties pop the lower index first.
impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .elevation
            .total_cmp(&self.elevation)
            .then_with(|| other.triangle.cmp(&self.triangle))
    }
}

/// Triangle and side fields written by the river stage
#[derive(Debug, Clone, Default)]
pub struct RiverFields {
    /// Mean elevation of each triangle's regions, lowered where a trunk sat above its tributary
    pub triangle_elevation: Vec<f32>,
    /// Mean moisture of each triangle's regions
    pub triangle_moisture: Vec<f32>,
    /// Side each triangle drains through; `None` for roots and unreached triangles
    pub downflow: Vec<Option<usize>>,
    /// Triangles in the order they were visited
    pub order: Vec<usize>,
    /// Accumulated flow per triangle
    pub triangle_flow: Vec<f32>,
    /// Accumulated flow per side, 0 next to the ocean
    pub side_flow: Vec<f32>,
}

/// Average a region field onto triangles
pub fn triangle_average(mesh: &DualMesh, region_values: &[f32]) -> Vec<f32> {
    (0..mesh.triangle_count())
        .map(|t| {
            let [a, b, c] = mesh.triangle_regions(t);
            (region_values[a] + region_values[b] + region_values[c]) / 3.0
        })
        .collect()
}

/// Compute downflow sides and the visit order
///
/// Ocean triangles (elevation < 0) are roots and drain towards their lowest
/// neighbor if it is lower. Land triangles are claimed by the first popped
/// triangle next to them.
pub fn assign_downflow(mesh: &DualMesh, triangle_elevation: &[f32]) -> (Vec<Option<usize>>, Vec<usize>) {
    let triangle_count = mesh.triangle_count();
    let mut downflow = vec![None; triangle_count];
    let mut visited = vec![false; triangle_count];
    let mut order = Vec::with_capacity(triangle_count);
    let mut heap = BinaryHeap::new();

    for t in 0..triangle_count {
        let elevation = triangle_elevation[t];
        if elevation >= 0.0 {
            continue;
        }
        let mut best: Option<(usize, f32)> = None;
        for s in mesh.triangle_sides(t) {
            let e = triangle_elevation[mesh.outer_triangle(s)];
            if e < best.map_or(elevation, |(_, best_e)| best_e) {
                best = Some((s, e));
            }
        }
        downflow[t] = best.map(|(s, _)| s);
        visited[t] = true;
        order.push(t);
        heap.push(HeapItem { elevation, triangle: t });
    }

    while let Some(HeapItem { triangle: t, .. }) = heap.pop() {
        for s in mesh.triangle_sides(t) {
            let neighbor = mesh.outer_triangle(s);
            if visited[neighbor] || triangle_elevation[neighbor] < 0.0 {
                continue;
            }
            visited[neighbor] = true;
            downflow[neighbor] = Some(mesh.opposite(s));
            order.push(neighbor);
            heap.push(HeapItem {
                elevation: triangle_elevation[neighbor],
                triangle: neighbor,
            });
        }
    }

    (downflow, order)
}

/// Accumulate flow along the downflow forest
///
/// Returns per-triangle and per-side flow. Trunk elevations above their
/// tributary are lowered to it in `triangle_elevation`.
pub fn assign_flow(
    mesh: &DualMesh,
    triangle_elevation: &mut [f32],
    triangle_moisture: &[f32],
    downflow: &[Option<usize>],
    order: &[usize],
    flow_modifier: f32,
) -> (Vec<f32>, Vec<f32>) {
    let mut triangle_flow: Vec<f32> = triangle_elevation
        .iter()
        .zip(triangle_moisture)
        .map(|(&e, &m)| if e >= 0.0 { flow_modifier * m * m } else { 0.0 })
        .collect();
    let mut side_flow = vec![0.0; mesh.side_count()];

    for &tributary in order.iter().rev() {
        let Some(s) = downflow[tributary] else {
            continue;
        };
        let trunk = mesh.outer_triangle(s);
        let flow = triangle_flow[tributary];
        triangle_flow[trunk] += flow;
        side_flow[s] += flow;
        if triangle_elevation[trunk] > triangle_elevation[tributary] {
            triangle_elevation[trunk] = triangle_elevation[tributary];
        }
    }

    (triangle_flow, side_flow)
}

/// Run the routing and accumulation twice, then clear flow next to the ocean
pub fn assign_rivers(mesh: &DualMesh, region_elevation: &[f32], region_moisture: &[f32], flow_modifier: f32) -> RiverFields {
    let mut triangle_elevation = triangle_average(mesh, region_elevation);
    let triangle_moisture = triangle_average(mesh, region_moisture);

    let mut fields = RiverFields::default();
    for pass in 0..2 {
        let (downflow, order) = assign_downflow(mesh, &triangle_elevation);
        let (triangle_flow, side_flow) = assign_flow(
            mesh,
            &mut triangle_elevation,
            &triangle_moisture,
            &downflow,
            &order,
            flow_modifier,
        );
        trace!("river pass {}: {} of {} triangles reached", pass, order.len(), mesh.triangle_count());
        fields.downflow = downflow;
        fields.order = order;
        fields.triangle_flow = triangle_flow;
        fields.side_flow = side_flow;
    }

    for s in 0..mesh.side_count() {
        if region_elevation[mesh.begin_region(s)] < 0.0 || region_elevation[mesh.end_region(s)] < 0.0 {
            fields.side_flow[s] = 0.0;
        }
    }

    fields.triangle_elevation = triangle_elevation;
    fields.triangle_moisture = triangle_moisture;
    fields
}
