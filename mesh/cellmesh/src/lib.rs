//! Mesh segmentation and quantification for microscopy surfaces.
//!
//! This umbrella crate re-exports the cellmesh crates and adds a per-shell
//! pipeline. Every operation is a pure function of explicit inputs; nothing is
//! looked up by name from host state.
//!
//! # Quick Start
//!
//! ```
//! use cellmesh::prelude::*;
//!
//! let nucleus = unit_cube();
//!
//! // Connectivity and boundaries
//! let shells = analyze_shells(&nucleus, &AnalysisParams::default()).unwrap();
//! assert_eq!(shells.len(), 1);
//!
//! // Spot ownership
//! let report = assign_spots(
//!     &[SourceMesh::new("nucleus", &nucleus)],
//!     &[Spot::new("spot.000", Point3::new(0.6, 0.55, 0.45))],
//!     &AssignParams::default(),
//! )
//! .unwrap();
//! assert_eq!(report.count_for("nucleus").inside, 1);
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - Core data structures: `IndexedMesh`, `Vertex`, `SceneObject`
//! - [`topology`] - Adjacency, boundary loops, components, hole filling, welding, smoothing, flattening
//! - [`curvature`] - Angular and dihedral per-vertex curvature
//! - [`assign`] - Spatial index and spot assignment
//!
//! The pipeline in [`analyze_shells`] welds, splits, then cleans up and
//! measures each shell in parallel.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod analysis;
mod error;

// =============================================================================
// Re-exports
// =============================================================================

/// Core data structures: `IndexedMesh`, `Vertex`, `Triangle`, `SceneObject`.
pub use mesh_types as types;

/// Adjacency, boundary loops, components, hole filling, welding, smoothing, flattening.
pub use mesh_topology as topology;

/// Angular and dihedral per-vertex curvature.
pub use mesh_curvature as curvature;

/// Spatial index and spot assignment.
pub use mesh_assign as assign;

pub use analysis::{
    AnalysisParams, ShellReport, ShellSummary, analyze_shells, shells_summary_json,
};
pub use error::{AnalysisError, AnalysisResult};

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for mesh analysis.
///
/// # Usage
///
/// ```
/// use cellmesh::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use mesh_types::{
        CompareOp, IndexedMesh, Point3, SceneObject, Vector3, Vertex, select_by_volume, unit_cube,
    };

    // Topology
    pub use mesh_topology::{
        BoundaryReport, BoundaryTracer, FillParams, FlattenParams, SmoothParams, TopologyGraph,
        TraceParams, detect_holes, fill_holes, flatten, smooth_laplacian, split_into_components,
        weld_vertices,
    };

    // Curvature
    pub use mesh_curvature::{CurvatureEstimator, CurvatureField, CurvatureParams};

    // Assignment
    pub use mesh_assign::{AssignParams, SourceMesh, SpatialIndex, Spot, SurfaceAssigner, assign_spots};

    // Pipeline
    pub use crate::{AnalysisParams, ShellReport, analyze_shells};
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        use prelude::*;

        let mesh = IndexedMesh::new();
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.face_count(), 0);
    }

    #[test]
    fn test_module_reexports() {
        let _ = types::IndexedMesh::new();
        let _ = topology::FillParams::default();
        let _ = curvature::CurvatureParams::default();
        let _ = assign::AssignParams::default();
    }
}
