//! Estimator front end and batch processing.

use mesh_types::IndexedMesh;
use rayon::prelude::*;
use tracing::info;

use crate::angular::angular_curvature;
use crate::dihedral::dihedral_curvature;
use crate::error::CurvatureResult;
use crate::params::CurvatureParams;
use crate::result::{CurvatureField, CurvatureKind};

/// A curvature estimator: which variant, with which parameters.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_curvature::CurvatureEstimator;
///
/// let field = CurvatureEstimator::dihedral().estimate(&unit_cube()).unwrap();
/// assert_eq!(field.len(), 8);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurvatureEstimator {
    /// Estimator variant.
    pub kind: CurvatureKind,
    /// Estimation parameters.
    pub params: CurvatureParams,
}

impl CurvatureEstimator {
    /// Angular estimator with default parameters.
    #[must_use]
    pub fn angular() -> Self {
        Self {
            kind: CurvatureKind::Angular,
            params: CurvatureParams::default(),
        }
    }

    /// Dihedral estimator with default parameters.
    #[must_use]
    pub fn dihedral() -> Self {
        Self {
            kind: CurvatureKind::Dihedral,
            params: CurvatureParams::default(),
        }
    }

    /// Replace the parameters.
    #[must_use]
    pub const fn with_params(mut self, params: CurvatureParams) -> Self {
        self.params = params;
        self
    }

    /// Estimate curvature for one mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh is malformed.
    pub fn estimate(&self, mesh: &IndexedMesh) -> CurvatureResult<CurvatureField> {
        match self.kind {
            CurvatureKind::Angular => angular_curvature(mesh, &self.params),
            CurvatureKind::Dihedral => dihedral_curvature(mesh, &self.params),
        }
    }
}

/// Estimate curvature for many meshes in parallel.
///
/// Results are returned in input order; a malformed mesh only fails its own
/// entry.
///
/// # Example
///
/// ```
/// use mesh_types::{unit_cube, IndexedMesh};
/// use mesh_curvature::{estimate_batch, CurvatureEstimator};
///
/// let meshes = vec![unit_cube(), IndexedMesh::new()];
/// let fields = estimate_batch(&meshes, &CurvatureEstimator::angular());
/// assert_eq!(fields.len(), 2);
/// assert!(fields[1].as_ref().unwrap().is_empty());
/// ```
#[must_use]
pub fn estimate_batch(
    meshes: &[IndexedMesh],
    estimator: &CurvatureEstimator,
) -> Vec<CurvatureResult<CurvatureField>> {
    let results: Vec<_> = meshes
        .par_iter()
        .map(|mesh| estimator.estimate(mesh))
        .collect();

    info!(
        "Estimated {:?} curvature for {} meshes ({} failed)",
        estimator.kind,
        meshes.len(),
        results.iter().filter(|r| r.is_err()).count()
    );

    results
}
