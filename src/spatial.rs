//! Nearest-region lookup by position
//!
//! This module is only available with the `spatial-index` feature.

use glam::Vec3;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

/// KD-tree over region centers on the unit sphere
///
/// Built once per generated planet. Queries are projected radially onto the
/// sphere first, so a point at any altitude maps to the region beneath it.
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f32, usize, 3, 32>,
}

impl SpatialIndex {
    /// Build the index from unit-length region centers
    ///
    /// # Example
    ///
    /// ```
    /// use voronoi_worldgen::*;
    ///
    /// let centers = vec![Vec3::X, Vec3::Y, Vec3::Z];
    /// let index = SpatialIndex::new(&centers);
    /// assert_eq!(index.find_nearest(Vec3::new(5.0, 0.5, 0.0)), Some(0));
    /// ```
    pub fn new(centers: &[Vec3]) -> Self {
        let points: Vec<[f32; 3]> = centers.iter().map(|c| c.to_array()).collect();
        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
        }
    }

    /// Region under `position`
    ///
    /// Returns `None` for the origin or a non-finite position, which have no
    /// direction to project along.
    pub fn find_nearest(&self, position: Vec3) -> Option<usize> {
        let direction = position.try_normalize()?;
        let result = self.tree.nearest_one::<SquaredEuclidean>(&direction.to_array());
        Some(result.item as usize)
    }
}
