//! Per-vertex curvature values.

/// Curvature estimator variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CurvatureKind {
    /// Spread of incident face normals around the vertex normal.
    #[default]
    Angular,
    /// Average dihedral angle over incident edges.
    Dihedral,
}

/// One curvature value per vertex.
///
/// # Example
///
/// ```
/// use mesh_curvature::{CurvatureField, CurvatureKind};
///
/// let field = CurvatureField::new(CurvatureKind::Angular, vec![0.0, 0.5, 0.25]);
/// assert_eq!(field.max(), Some(0.5));
/// assert_eq!(field.normalized(), vec![0.0, 1.0, 0.5]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurvatureField {
    /// Estimator that produced the values.
    pub kind: CurvatureKind,
    /// Value per vertex, in vertex order.
    pub values: Vec<f64>,
    /// Vertices that fell back to zero (too few faces, no normal).
    pub vertices_skipped: usize,
}

impl CurvatureField {
    /// Wrap raw values.
    #[must_use]
    pub const fn new(kind: CurvatureKind, values: Vec<f64>) -> Self {
        Self {
            kind,
            values,
            vertices_skipped: 0,
        }
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a vertex.
    #[must_use]
    pub fn get(&self, vertex: usize) -> Option<f64> {
        self.values.get(vertex).copied()
    }

    /// Smallest value.
    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }

    /// Largest value.
    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    /// Arithmetic mean.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }

    /// Values divided by the maximum, for color mapping.
    ///
    /// All zeros when the maximum is not positive.
    #[must_use]
    pub fn normalized(&self) -> Vec<f64> {
        match self.max() {
            Some(max) if max > 0.0 => self.values.iter().map(|v| v / max).collect(),
            _ => vec![0.0; self.values.len()],
        }
    }

    /// Vertices whose value exceeds `threshold`.
    #[must_use]
    pub fn vertices_above(&self, threshold: f64) -> Vec<usize> {
        self.values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v > threshold)
            .map(|(i, _)| i)
            .collect()
    }
}
