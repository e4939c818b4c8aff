//! Sphere mesh construction
//!
//! Sampler → stereographic triangulation → pole stitching → dual mesh.

mod delaunay;
mod fibonacci;

pub use delaunay::{stereographic_projection, stitch_pole, triangulate_sphere, SphereTriangulation};
pub use fibonacci::{fibonacci_lat_lon, generate_fibonacci_sphere_points, spherical_to_cartesian};

use glam::Vec3;

use crate::config::PlanetConfig;
use crate::error::{PlanetError, Result};
use crate::mesh::DualMesh;
use crate::rng::{RngStream, SeededRng};

/// Mesh topology plus the positions of its regions and triangles
#[derive(Debug, Clone)]
pub struct SphereGeometry {
    /// Region/triangle/side topology
    pub mesh: DualMesh,
    /// Unit-sphere position of each region; the last one is the pole
    pub region_xyz: Vec<Vec3>,
    /// Centroid of each triangle's three regions (inside the sphere)
    pub triangle_xyz: Vec<Vec3>,
}

/// Build the closed sphere mesh for `config.number_cells` regions
///
/// `number_cells - 1` points are sampled and the pole (0, 0, 1) is appended as the
/// last region.
pub fn generate_sphere_geometry(config: &PlanetConfig) -> Result<SphereGeometry> {
    if config.number_cells == 0 {
        return Err(PlanetError::InvalidConfig("number_cells must be > 0 (got 0)".into()));
    }

    let mut rng = SeededRng::new(config.seed, RngStream::Sampler);
    let mut region_xyz = generate_fibonacci_sphere_points(config.number_cells - 1, config.jitter, &mut rng);

    let triangulation = triangulate_sphere(&region_xyz)?;
    region_xyz.push(Vec3::Z);

    let mesh = DualMesh::new(region_xyz.len(), triangulation.triangles, triangulation.halfedges)?;
    let triangle_xyz = triangle_centroids(&mesh, &region_xyz);

    Ok(SphereGeometry {
        mesh,
        region_xyz,
        triangle_xyz,
    })
}

/// Average of the three region positions of every triangle
pub fn triangle_centroids(mesh: &DualMesh, region_xyz: &[Vec3]) -> Vec<Vec3> {
    (0..mesh.triangle_count())
        .map(|t| {
            let [a, b, c] = mesh.triangle_regions(t);
            (region_xyz[a] + region_xyz[b] + region_xyz[c]) / 3.0
        })
        .collect()
}
