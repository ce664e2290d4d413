//! Parameters for spot assignment.

/// Parameters for [`SurfaceAssigner`](crate::SurfaceAssigner).
///
/// # Example
///
/// ```
/// use mesh_assign::AssignParams;
///
/// let params = AssignParams::default();
/// assert!(params.max_distance.is_none());
///
/// let near = AssignParams::default().with_max_distance(5.0);
/// assert_eq!(near.max_distance, Some(5.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AssignParams {
    /// Direction vectors shorter than this count as zero length.
    ///
    /// A spot whose classification involves a zero-length vector is
    /// reported inside and flagged degenerate.
    pub degenerate_epsilon: f64,

    /// Spots farther than this from every source vertex are left unassigned.
    /// `None` assigns every spot.
    pub max_distance: Option<f64>,
}

impl Default for AssignParams {
    fn default() -> Self {
        Self {
            degenerate_epsilon: 1e-12,
            max_distance: None,
        }
    }
}

impl AssignParams {
    /// Set the zero-length threshold for direction vectors.
    #[must_use]
    pub const fn with_degenerate_epsilon(mut self, epsilon: f64) -> Self {
        self.degenerate_epsilon = epsilon;
        self
    }

    /// Leave spots beyond `distance` unassigned.
    #[must_use]
    pub const fn with_max_distance(mut self, distance: f64) -> Self {
        self.max_distance = Some(distance);
        self
    }
}
