//! Parameters for curvature estimation.

use mesh_types::NormalWeighting;

/// Which edges count towards the dihedral average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DihedralDenominator {
    /// Every edge touching the vertex, including boundary and non-manifold ones.
    #[default]
    AllEdges,
    /// Only edges shared by exactly two faces.
    ManifoldEdges,
}

/// Parameters for curvature estimation.
///
/// # Example
///
/// ```
/// use mesh_curvature::{CurvatureParams, DihedralDenominator};
/// use mesh_types::NormalWeighting;
///
/// let params = CurvatureParams::default();
/// assert_eq!(params.weighting, NormalWeighting::Angle);
/// assert_eq!(params.min_faces, 2);
///
/// let params = CurvatureParams::manifold_only();
/// assert_eq!(params.denominator, DihedralDenominator::ManifoldEdges);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurvatureParams {
    /// How face normals are averaged into vertex normals.
    ///
    /// Default: [`NormalWeighting::Angle`]
    pub weighting: NormalWeighting,

    /// Use the normals stored on the vertices when every vertex has one.
    ///
    /// Default: `false`
    pub use_supplied_normals: bool,

    /// Vertices with fewer incident faces get a curvature of zero.
    ///
    /// Default: `2`
    pub min_faces: usize,

    /// Denominator of the dihedral average.
    ///
    /// Default: [`DihedralDenominator::AllEdges`]
    pub denominator: DihedralDenominator,
}

impl Default for CurvatureParams {
    fn default() -> Self {
        Self {
            weighting: NormalWeighting::Angle,
            use_supplied_normals: false,
            min_faces: 2,
            denominator: DihedralDenominator::AllEdges,
        }
    }
}

impl CurvatureParams {
    /// Area-weighted vertex normals, otherwise default.
    #[must_use]
    pub fn area_weighted() -> Self {
        Self {
            weighting: NormalWeighting::Area,
            ..Default::default()
        }
    }

    /// Dihedral average over two-face edges only, otherwise default.
    #[must_use]
    pub fn manifold_only() -> Self {
        Self {
            denominator: DihedralDenominator::ManifoldEdges,
            ..Default::default()
        }
    }

    /// Set the vertex normal weighting.
    #[must_use]
    pub const fn with_weighting(mut self, weighting: NormalWeighting) -> Self {
        self.weighting = weighting;
        self
    }

    /// Set whether supplied vertex normals are used.
    #[must_use]
    pub const fn with_supplied_normals(mut self, use_supplied: bool) -> Self {
        self.use_supplied_normals = use_supplied;
        self
    }

    /// Set the minimum incident face count.
    #[must_use]
    pub const fn with_min_faces(mut self, min_faces: usize) -> Self {
        self.min_faces = min_faces;
        self
    }

    /// Set the dihedral denominator policy.
    #[must_use]
    pub const fn with_denominator(mut self, denominator: DihedralDenominator) -> Self {
        self.denominator = denominator;
        self
    }
}
