//! Static nearest-neighbor index over a point set.

use kiddo::{ImmutableKdTree, SquaredEuclidean};
use mesh_types::Point3;
use tracing::debug;

use crate::error::{AssignError, AssignResult};

/// Closest indexed point returned by [`SpatialIndex::query_nearest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestHit {
    /// Position of the indexed point.
    pub point: Point3<f64>,
    /// Insertion index of the point.
    pub id: usize,
    /// Euclidean distance from the query.
    pub distance: f64,
}

/// Balanced KD-tree over a fixed set of points.
///
/// The tree is built once from the whole point set and never modified, so
/// coplanar or grid-aligned vertices with many equal coordinates are fine.
/// Queries borrow it shared, so a single index can serve many threads.
///
/// # Example
///
/// ```
/// use mesh_assign::SpatialIndex;
/// use mesh_types::Point3;
///
/// let points = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 2.0, 0.0),
/// ];
/// let index = SpatialIndex::build(&points).unwrap();
///
/// let hit = index.query_nearest(&Point3::new(0.9, 0.1, 0.0)).unwrap();
/// assert_eq!(hit.id, 1);
/// ```
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    tree: Option<ImmutableKdTree<f64, 3>>,
    points: Vec<Point3<f64>>,
}

impl SpatialIndex {
    /// Build an index over `points`.
    ///
    /// An empty point set gives an empty index; querying it fails with
    /// [`AssignError::EmptyIndex`].
    ///
    /// # Errors
    ///
    /// Does not fail for any point set; the `Result` matches
    /// [`with_capacity`](Self::with_capacity).
    pub fn build(points: &[Point3<f64>]) -> AssignResult<Self> {
        if points.is_empty() {
            return Ok(Self {
                tree: None,
                points: Vec::new(),
            });
        }
        Self::with_capacity(points, points.len())
    }

    /// Build an index whose size is declared up front.
    ///
    /// # Errors
    ///
    /// Returns [`AssignError::InvalidCapacity`] if `capacity` is zero or
    /// differs from `points.len()`.
    pub fn with_capacity(points: &[Point3<f64>], capacity: usize) -> AssignResult<Self> {
        if capacity == 0 || capacity != points.len() {
            return Err(AssignError::InvalidCapacity {
                capacity,
                points: points.len(),
            });
        }

        // Items are slice positions, matching insertion order
        let coords: Vec<[f64; 3]> = points.iter().map(|p| [p.x, p.y, p.z]).collect();
        let tree = ImmutableKdTree::new_from_slice(&coords);
        debug!(points = capacity, "built spatial index");

        Ok(Self {
            tree: Some(tree),
            points: points.to_vec(),
        })
    }

    /// Number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the index holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Indexed point by insertion index.
    #[must_use]
    pub fn point(&self, id: usize) -> Option<Point3<f64>> {
        self.points.get(id).copied()
    }

    /// Closest indexed point to `query`.
    ///
    /// # Errors
    ///
    /// Returns [`AssignError::EmptyIndex`] if the index holds no points.
    #[allow(clippy::cast_possible_truncation)]
    pub fn query_nearest(&self, query: &Point3<f64>) -> AssignResult<NearestHit> {
        let Some(tree) = &self.tree else {
            return Err(AssignError::EmptyIndex);
        };

        let nearest = tree.nearest_one::<SquaredEuclidean>(&[query.x, query.y, query.z]);
        let id = nearest.item as usize;
        let point = self.points.get(id).copied().ok_or(AssignError::EmptyIndex)?;

        Ok(NearestHit {
            point,
            id,
            distance: nearest.distance.sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Deterministic pseudo-random points in `[-10, 10)^3`.
    fn scattered_points(count: usize, seed: u64) -> Vec<Point3<f64>> {
        let mut state = seed;
        let mut next = move || {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            #[allow(clippy::cast_precision_loss)]
            let unit = (state >> 11) as f64 / (1u64 << 53) as f64;
            unit * 20.0 - 10.0
        };
        (0..count)
            .map(|_| {
                let x = next();
                let y = next();
                let z = next();
                Point3::new(x, y, z)
            })
            .collect()
    }

    #[test]
    fn matches_brute_force() {
        let points = scattered_points(100, 7);
        let queries = scattered_points(20, 99);
        let index = SpatialIndex::build(&points).unwrap();
        assert_eq!(index.len(), 100);

        for q in &queries {
            let hit = index.query_nearest(q).unwrap();
            let (best_id, best_dist) = points
                .iter()
                .enumerate()
                .map(|(i, p)| (i, (p - q).norm()))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .unwrap();

            assert_eq!(hit.id, best_id);
            assert_eq!(hit.point, points[best_id]);
            assert_relative_eq!(hit.distance, best_dist, epsilon = 1e-12);
        }
    }

    #[test]
    fn coplanar_grid_builds_and_queries() {
        // 400 points sharing z and 20 points per x or y value
        let points: Vec<Point3<f64>> = (0..20)
            .flat_map(|y| (0..20).map(move |x| Point3::new(f64::from(x), f64::from(y), 0.0)))
            .collect();
        let index = SpatialIndex::build(&points).unwrap();
        assert_eq!(index.len(), 400);

        let hit = index.query_nearest(&Point3::new(3.2, 7.7, 0.5)).unwrap();
        assert_eq!(hit.id, 8 * 20 + 3);
        assert_relative_eq!(hit.distance, (0.04f64 + 0.09 + 0.25).sqrt(), epsilon = 1e-12);

        for q in scattered_points(20, 42) {
            let hit = index.query_nearest(&q).unwrap();
            let best = points
                .iter()
                .map(|p| (p - q).norm())
                .fold(f64::INFINITY, f64::min);
            assert_relative_eq!(hit.distance, best, epsilon = 1e-12);
            assert_relative_eq!((hit.point - q).norm(), hit.distance, epsilon = 1e-12);
        }
    }

    #[test]
    fn exact_hit_has_zero_distance() {
        let points = scattered_points(10, 3);
        let index = SpatialIndex::build(&points).unwrap();
        let hit = index.query_nearest(&points[4]).unwrap();
        assert_eq!(hit.id, 4);
        assert_relative_eq!(hit.distance, 0.0);
    }

    #[test]
    fn empty_index_query_fails() {
        let index = SpatialIndex::build(&[]).unwrap();
        assert!(index.is_empty());
        assert!(matches!(
            index.query_nearest(&Point3::origin()),
            Err(AssignError::EmptyIndex)
        ));
    }

    #[test]
    fn capacity_is_checked() {
        let points = scattered_points(5, 1);
        assert!(matches!(
            SpatialIndex::with_capacity(&points, 0),
            Err(AssignError::InvalidCapacity {
                capacity: 0,
                points: 5
            })
        ));
        assert!(matches!(
            SpatialIndex::with_capacity(&points, 6),
            Err(AssignError::InvalidCapacity { capacity: 6, .. })
        ));
        assert!(matches!(
            SpatialIndex::with_capacity(&[], 0),
            Err(AssignError::InvalidCapacity { .. })
        ));
        assert_eq!(SpatialIndex::with_capacity(&points, 5).unwrap().len(), 5);
    }

    #[test]
    fn index_is_shareable_across_threads() {
        fn assert_sync<T: Sync + Send>() {}
        assert_sync::<SpatialIndex>();

        let points = scattered_points(50, 11);
        let index = SpatialIndex::build(&points).unwrap();
        std::thread::scope(|s| {
            for q in scattered_points(4, 5) {
                let index = &index;
                s.spawn(move || assert!(index.query_nearest(&q).is_ok()));
            }
        });
    }

    #[test]
    fn point_lookup() {
        let points = scattered_points(3, 2);
        let index = SpatialIndex::build(&points).unwrap();
        assert_eq!(index.point(2), Some(points[2]));
        assert_eq!(index.point(3), None);
    }
}
