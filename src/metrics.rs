//! Terrain roughness and settlement desirability

use std::f32::consts::PI;

use crate::mesh::DualMesh;

/// Sum of absolute elevation differences between each region and its triangles
pub fn assign_roughness(mesh: &DualMesh, region_elevation: &[f32], triangle_elevation: &[f32]) -> Vec<f32> {
    (0..mesh.region_count())
        .map(|r| {
            let e = region_elevation[r];
            mesh.incoming_sides(r)
                .map(|s| (e - triangle_elevation[mesh.inner_triangle(s)]).abs())
                .sum::<f32>()
        })
        .collect()
}

/// Desirability of a single region, 0 for ocean
///
/// Low land is preferred, temperature favorability peaks at the middle of the
/// range and moisture counts linearly.
#[inline]
pub fn desirability(elevation: f32, temperature_ratio: f32, moisture: f32) -> f32 {
    if elevation < 0.0 {
        return 0.0;
    }
    ((1.0 - elevation) * (PI * temperature_ratio).sin() * moisture).max(0.0)
}

/// Desirability for every region
pub fn assign_desirability(elevation: &[f32], temperature_ratio: &[f32], moisture: &[f32]) -> Vec<f32> {
    elevation
        .iter()
        .zip(temperature_ratio)
        .zip(moisture)
        .map(|((&e, &t), &m)| desirability(e, t, m))
        .collect()
}
