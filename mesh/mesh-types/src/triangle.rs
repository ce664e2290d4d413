//! Resolved triangle geometry.

use nalgebra::{Point3, Vector3};

/// The three corner positions of one face.
///
/// Corners follow the face winding, so [`normal`](Self::normal) points to
/// the side from which the corners appear counter-clockwise.
///
/// # Example
///
/// ```
/// use mesh_types::{Triangle, Point3};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// assert!((tri.area() - 0.5).abs() < 1e-10);
/// assert!((tri.normal().unwrap().z - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Corner positions in winding order.
    pub corners: [Point3<f64>; 3],
}

impl Triangle {
    /// Triangle from its corners in winding order.
    #[inline]
    #[must_use]
    pub const fn new(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Self {
        Self {
            corners: [a, b, c],
        }
    }

    /// Edge vector leaving corner `i` toward the next corner.
    #[inline]
    #[must_use]
    pub fn edge(&self, i: usize) -> Vector3<f64> {
        self.corners[(i + 1) % 3] - self.corners[i % 3]
    }

    /// Cross product of the two edges at corner 0; its length is twice the area.
    #[inline]
    #[must_use]
    pub fn scaled_normal(&self) -> Vector3<f64> {
        self.edge(0).cross(&-self.edge(2))
    }

    /// Unit normal, or `None` for a zero-area triangle.
    ///
    /// ```
    /// use mesh_types::{Triangle, Point3};
    ///
    /// let collinear = Triangle::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(2.0, 0.0, 0.0),
    /// );
    /// assert!(collinear.normal().is_none());
    /// ```
    #[must_use]
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let n = self.scaled_normal();
        (n.norm_squared() > f64::EPSILON).then(|| n.normalize())
    }

    /// Area.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        0.5 * self.scaled_normal().norm()
    }

    /// Mean of the corners.
    #[inline]
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        let [a, b, c] = self.corners;
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }

    /// Interior angle in radians at corner `i` (taken modulo 3).
    ///
    /// Zero when an adjacent edge has no length.
    ///
    /// ```
    /// use mesh_types::{Triangle, Point3};
    ///
    /// let tri = Triangle::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// );
    /// assert!((tri.angle_at(0) - std::f64::consts::FRAC_PI_2).abs() < 1e-10);
    /// ```
    #[must_use]
    pub fn angle_at(&self, i: usize) -> f64 {
        let outgoing = self.edge(i);
        let incoming = -self.edge(i + 2);
        if outgoing.norm_squared() <= f64::EPSILON || incoming.norm_squared() <= f64::EPSILON {
            return 0.0;
        }
        outgoing.angle(&incoming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    fn right_triangle() -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn angles_sum_to_pi() {
        let tri = right_triangle();
        assert_relative_eq!(tri.angle_at(0), FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(tri.angle_at(1), FRAC_PI_4, epsilon = 1e-12);
        assert_relative_eq!(tri.angle_at(2), FRAC_PI_4, epsilon = 1e-12);
        assert_relative_eq!(tri.angle_at(3), tri.angle_at(0));
    }

    #[test]
    fn zero_length_edge_has_zero_angle() {
        let tri = Triangle::new(Point3::origin(), Point3::origin(), Point3::new(1.0, 0.0, 0.0));
        assert!(tri.angle_at(0).abs() < f64::EPSILON);
        assert!(tri.normal().is_none());
    }

    #[test]
    fn centroid_and_area() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(0.0, 3.0, 0.0),
        );
        assert_relative_eq!(tri.area(), 4.5, epsilon = 1e-12);
        assert_relative_eq!(tri.centroid(), Point3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn reversed_winding_flips_normal() {
        let [a, b, c] = right_triangle().corners;
        let n = Triangle::new(a, b, c).normal().unwrap();
        let m = Triangle::new(a, c, b).normal().unwrap();
        assert_relative_eq!(n.dot(&m), -1.0, epsilon = 1e-12);
    }
}
