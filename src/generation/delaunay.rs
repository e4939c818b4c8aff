//! Delaunay triangulation of sphere points via stereographic projection
//!
//! All points except the north pole are projected onto the plane from (0, 0, 1)
//! and triangulated in 2D. The planar triangulation leaves a ring of unmatched
//! half-edges along its convex hull; these surround the missing pole. Stitching
//! walks that hull and fans one triangle from each hull edge to the pole, which
//! closes the mesh.

use delaunator::{Point, EMPTY};
use glam::Vec3;

use crate::error::{PlanetError, Result};

/// Triangle/half-edge arrays of a closed sphere mesh
///
/// Side `s` belongs to triangle `s / 3`, begins at region `triangles[s]` and is
/// paired with `halfedges[s]`.
#[derive(Debug, Clone)]
pub struct SphereTriangulation {
    /// Begin region of each side
    pub triangles: Vec<usize>,
    /// Opposite side of each side
    pub halfedges: Vec<usize>,
    /// Region index of the pole, always the last region
    pub pole: usize,
}

/// Project points onto the plane tangent at the south pole, as seen from (0, 0, 1)
///
/// `X = x / (1 - z)`, `Y = y / (1 - z)`. The projection is computed in f64 so
/// points close to the pole keep their ordering. In the northern hemisphere
/// `1 - z` is taken as `(x² + y²) / (1 + z)`, which stays exact when `z` has
/// rounded to 1 but `x` and `y` have not.
pub fn stereographic_projection(points: &[Vec3]) -> Vec<Point> {
    points
        .iter()
        .map(|p| {
            let (x, y, z) = (p.x as f64, p.y as f64, p.z as f64);
            let denom = if z > 0.0 { (x * x + y * y) / (1.0 + z) } else { 1.0 - z };
            Point { x: x / denom, y: y / denom }
        })
        .collect()
}

/// Triangulate sphere points and stitch the pole at index `points.len()`
///
/// # Errors
///
/// Returns `Topology` if a point sits on the pole, if the planar triangulation
/// is empty (fewer than three distinct, non-collinear points) or if the hull
/// walk cannot be completed.
pub fn triangulate_sphere(points: &[Vec3]) -> Result<SphereTriangulation> {
    let projected = stereographic_projection(points);
    if let Some(i) = projected.iter().position(|p| !(p.x.is_finite() && p.y.is_finite())) {
        return Err(PlanetError::topology(i, "point coincides with the pole"));
    }
    let planar = delaunator::triangulate(&projected);

    if planar.triangles.is_empty() {
        return Err(PlanetError::topology(
            points.len(),
            format!("planar triangulation of {} points produced no triangles", points.len()),
        ));
    }

    let pole = points.len();
    let (triangles, halfedges) = stitch_pole(pole, planar.triangles, planar.halfedges)?;

    Ok(SphereTriangulation {
        triangles,
        halfedges,
        pole,
    })
}

#[inline]
fn next_side(s: usize) -> usize {
    if s % 3 == 2 {
        s - 2
    } else {
        s + 1
    }
}

/// Close a planar triangulation by attaching every hull edge to `pole`
///
/// Each unmatched side `A→B` gets a new triangle `(B, A, pole)` whose first side
/// `B→A` is paired with it. The pole-facing sides of consecutive new triangles
/// are paired with each other while walking the hull, so the fan closes into a
/// ring around the pole.
///
/// # Errors
///
/// Returns `Topology` naming the offending side if there is no unmatched side,
/// if the walk reaches a hull vertex with no unmatched outgoing side (as happens
/// with degenerate zero-area triangles), or if any side is still unmatched
/// afterwards.
pub fn stitch_pole(
    pole: usize,
    mut triangles: Vec<usize>,
    mut halfedges: Vec<usize>,
) -> Result<(Vec<usize>, Vec<usize>)> {
    let num_sides = triangles.len();
    if halfedges.len() != num_sides || num_sides % 3 != 0 {
        return Err(PlanetError::topology(
            num_sides,
            format!(
                "{} triangle entries and {} half-edges do not form whole triangles",
                num_sides,
                halfedges.len()
            ),
        ));
    }

    // Hull vertex -> its unmatched outgoing side
    let mut hull_side_from = vec![EMPTY; pole];
    let mut num_unpaired = 0;
    let mut first_unpaired = EMPTY;
    for s in 0..num_sides {
        if halfedges[s] == EMPTY {
            let begin = triangles[s];
            if begin >= pole {
                return Err(PlanetError::topology(s, format!("side begins at out-of-range region {}", begin)));
            }
            hull_side_from[begin] = s;
            num_unpaired += 1;
            if first_unpaired == EMPTY {
                first_unpaired = s;
            }
        }
    }

    if num_unpaired == 0 {
        return Err(PlanetError::topology(pole, "triangulation has no hull sides to attach the pole to"));
    }

    triangles.resize(num_sides + 3 * num_unpaired, 0);
    halfedges.resize(num_sides + 3 * num_unpaired, EMPTY);

    let mut s = first_unpaired;
    for i in 0..num_unpaired {
        if i > 0 {
            let hull_vertex = triangles[next_side(s)];
            s = hull_side_from[hull_vertex];
            if s == EMPTY || halfedges[s] != EMPTY {
                return Err(PlanetError::topology(
                    hull_vertex,
                    format!("hull walk lost the next unpaired side after {} of {} sides", i, num_unpaired),
                ));
            }
        }

        let pole_s = num_sides + 3 * i;
        halfedges[s] = pole_s;
        halfedges[pole_s] = s;
        triangles[pole_s] = triangles[next_side(s)];
        triangles[pole_s + 1] = triangles[s];
        triangles[pole_s + 2] = pole;

        let k = num_sides + (3 * i + 4) % (3 * num_unpaired);
        halfedges[pole_s + 2] = k;
        halfedges[k] = pole_s + 2;
    }

    if let Some(s) = halfedges.iter().position(|&h| h == EMPTY) {
        return Err(PlanetError::topology(s, "side is still unmatched after pole stitching"));
    }

    Ok((triangles, halfedges))
}
