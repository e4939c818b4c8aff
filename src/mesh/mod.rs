//! Dual mesh over a closed sphere triangulation
//!
//! Regions (`r`) are the sample points and become Voronoi cells, triangles (`t`)
//! are Delaunay faces and sides (`s`) are directed half-edges, three per
//! triangle. Every field in the generator is a flat array indexed by one of
//! these.
//!
//! Circulation around a region walks half-edges without allocating. The
//! `*_into` queries write into a caller-owned buffer so hot loops can reuse one
//! allocation for the whole pass.

use crate::error::{PlanetError, Result};

/// Immutable region/triangle/side topology
#[derive(Debug, Clone)]
pub struct DualMesh {
    triangles: Vec<usize>,
    halfedges: Vec<usize>,
    region_in_side: Vec<usize>,
}

impl DualMesh {
    /// Wrap triangle/half-edge arrays, checking that the mesh is closed
    ///
    /// # Errors
    ///
    /// Returns `Topology` if the arrays are not whole triangles, if a side has
    /// no valid opposite, if opposites are not mutual, or if a region is not
    /// touched by any triangle.
    pub fn new(region_count: usize, triangles: Vec<usize>, halfedges: Vec<usize>) -> Result<Self> {
        let side_count = triangles.len();
        if side_count % 3 != 0 || halfedges.len() != side_count {
            return Err(PlanetError::topology(
                side_count,
                format!("{} sides and {} half-edges do not form whole triangles", side_count, halfedges.len()),
            ));
        }

        for s in 0..side_count {
            let o = halfedges[s];
            if o >= side_count {
                return Err(PlanetError::topology(s, "side has no opposite"));
            }
            if halfedges[o] != s {
                return Err(PlanetError::topology(s, format!("opposite {} does not point back", o)));
            }
            if triangles[s] >= region_count {
                return Err(PlanetError::topology(s, format!("begin region {} out of range", triangles[s])));
            }
            if triangles[s] != triangles[next_side(o)] {
                return Err(PlanetError::topology(s, format!("side and opposite {} disagree on endpoints", o)));
            }
        }

        let mut region_in_side = vec![usize::MAX; region_count];
        for s in 0..side_count {
            region_in_side[triangles[next_side(s)]] = s;
        }
        if let Some(r) = region_in_side.iter().position(|&s| s == usize::MAX) {
            return Err(PlanetError::topology(r, "region is not part of any triangle"));
        }

        Ok(Self {
            triangles,
            halfedges,
            region_in_side,
        })
    }

    /// Number of regions
    #[inline]
    pub fn region_count(&self) -> usize {
        self.region_in_side.len()
    }

    /// Number of triangles
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Number of sides, always three per triangle
    #[inline]
    pub fn side_count(&self) -> usize {
        self.triangles.len()
    }

    /// Region a side starts at
    #[inline]
    pub fn begin_region(&self, s: usize) -> usize {
        self.triangles[s]
    }

    /// Region a side ends at
    #[inline]
    pub fn end_region(&self, s: usize) -> usize {
        self.triangles[next_side(s)]
    }

    /// Triangle that owns a side
    #[inline]
    pub fn inner_triangle(&self, s: usize) -> usize {
        s / 3
    }

    /// Triangle on the other side of a side
    #[inline]
    pub fn outer_triangle(&self, s: usize) -> usize {
        self.halfedges[s] / 3
    }

    /// The paired half-edge running the other way
    #[inline]
    pub fn opposite(&self, s: usize) -> usize {
        self.halfedges[s]
    }

    /// The three regions of a triangle
    #[inline]
    pub fn triangle_regions(&self, t: usize) -> [usize; 3] {
        [self.triangles[3 * t], self.triangles[3 * t + 1], self.triangles[3 * t + 2]]
    }

    /// The three sides of a triangle
    #[inline]
    pub fn triangle_sides(&self, t: usize) -> [usize; 3] {
        [3 * t, 3 * t + 1, 3 * t + 2]
    }

    /// The three triangles adjacent to a triangle
    #[inline]
    pub fn triangle_neighbors(&self, t: usize) -> [usize; 3] {
        [
            self.outer_triangle(3 * t),
            self.outer_triangle(3 * t + 1),
            self.outer_triangle(3 * t + 2),
        ]
    }

    /// Iterate the sides ending at `r`, in circulation order
    ///
    /// For each yielded side `s`: `begin_region(s)` is a neighbor of `r`,
    /// `inner_triangle(s)` touches `r`, and `opposite(s)` leaves `r`.
    #[inline]
    pub fn incoming_sides(&self, r: usize) -> IncomingSides<'_> {
        let start = self.region_in_side[r];
        IncomingSides {
            mesh: self,
            start,
            current: Some(start),
        }
    }

    /// Fill `out` with the sides leaving `r`
    pub fn region_sides_into(&self, r: usize, out: &mut Vec<usize>) {
        out.clear();
        out.extend(self.incoming_sides(r).map(|s| self.halfedges[s]));
    }

    /// Fill `out` with the regions adjacent to `r`
    pub fn region_neighbors_into(&self, r: usize, out: &mut Vec<usize>) {
        out.clear();
        out.extend(self.incoming_sides(r).map(|s| self.triangles[s]));
    }

    /// Fill `out` with the triangles touching `r`, in circulation order
    pub fn region_triangles_into(&self, r: usize, out: &mut Vec<usize>) {
        out.clear();
        out.extend(self.incoming_sides(r).map(|s| s / 3));
    }

    /// Regions adjacent to `r`, allocating a new list
    pub fn region_neighbors(&self, r: usize) -> Vec<usize> {
        let mut out = Vec::with_capacity(7);
        self.region_neighbors_into(r, &mut out);
        out
    }
}

#[inline]
fn next_side(s: usize) -> usize {
    if s % 3 == 2 {
        s - 2
    } else {
        s + 1
    }
}

/// Allocation-free circulation around one region
#[derive(Debug, Clone)]
pub struct IncomingSides<'a> {
    mesh: &'a DualMesh,
    start: usize,
    current: Option<usize>,
}

impl Iterator for IncomingSides<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        let incoming = self.current?;
        let outgoing = next_side(incoming);
        let following = self.mesh.halfedges[outgoing];
        self.current = (following != self.start).then_some(following);
        Some(incoming)
    }
}
