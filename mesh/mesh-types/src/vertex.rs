//! Mesh vertex.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A mesh vertex: a position plus the normal the mesh source supplied, if any.
///
/// Supplied normals are optional input; analysis code computes its own
/// normals from the faces unless asked otherwise.
///
/// ```
/// use mesh_types::{Vertex, Point3};
///
/// let v = Vertex::from_coords(1.0, 2.0, 3.0);
/// assert_eq!(v, Vertex::new(Point3::new(1.0, 2.0, 3.0)));
/// assert!(v.normal.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    /// Position in world coordinates.
    pub position: Point3<f64>,

    /// Normal supplied by the mesh source.
    pub normal: Option<Vector3<f64>>,
}

impl Vertex {
    /// Vertex at `position` without a normal.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            normal: None,
        }
    }

    /// Vertex at `(x, y, z)` without a normal.
    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Vertex carrying a supplied normal.
    #[inline]
    #[must_use]
    pub const fn with_normal(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            position,
            normal: Some(normal),
        }
    }
}

impl From<Point3<f64>> for Vertex {
    fn from(position: Point3<f64>) -> Self {
        Self::new(position)
    }
}

impl From<[f64; 3]> for Vertex {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::from_coords(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        let from_array: Vertex = [1.0, 2.0, 3.0].into();
        let from_point: Vertex = Point3::new(1.0, 2.0, 3.0).into();
        assert_eq!(from_array, from_point);
        assert!(from_array.normal.is_none());
    }

    #[test]
    fn supplied_normal_is_kept() {
        let v = Vertex::with_normal(Point3::origin(), Vector3::z());
        assert_eq!(v.normal, Some(Vector3::z()));
    }
}
