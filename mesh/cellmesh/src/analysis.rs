//! Per-shell analysis pipeline.
//!
//! A segmented surface is optionally welded, then split into its connected
//! shells. Each shell goes through the optional clean-up stages in order
//! (smooth, flatten, fill, smooth again) and is then traced for boundary
//! loops and given a curvature field. Shells are processed in parallel.

use mesh_curvature::{CurvatureEstimator, CurvatureField};
use mesh_topology::{
    BoundaryReport, FillParams, FlattenParams, SmoothParams, TraceParams, detect_holes_with,
    fill_holes, flatten, smooth_laplacian, split_into_components, weld_vertices,
};
use mesh_types::IndexedMesh;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::AnalysisResult;

/// Parameters for [`analyze_shells`].
///
/// # Example
///
/// ```
/// use cellmesh::AnalysisParams;
/// use cellmesh::curvature::CurvatureEstimator;
///
/// let params = AnalysisParams::default()
///     .with_weld_epsilon(1e-6)
///     .with_curvature(CurvatureEstimator::dihedral());
/// assert_eq!(params.weld_epsilon, Some(1e-6));
/// assert!(params.fill.is_none());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnalysisParams {
    /// Merge vertices closer than this before splitting. `None` skips welding.
    pub weld_epsilon: Option<f64>,
    /// Smooth each shell before flattening.
    pub smooth: Option<SmoothParams>,
    /// Reduce each shell to the sheet facing its centroid.
    pub flatten: Option<FlattenParams>,
    /// Close holes in each shell. `None` leaves shells open.
    pub fill: Option<FillParams>,
    /// Smooth each shell again after filling.
    pub resmooth: Option<SmoothParams>,
    /// Boundary walk rule.
    pub trace: TraceParams,
    /// Curvature estimator applied to each shell.
    pub curvature: CurvatureEstimator,
}

impl AnalysisParams {
    /// Weld vertices closer than `epsilon` first.
    #[must_use]
    pub const fn with_weld_epsilon(mut self, epsilon: f64) -> Self {
        self.weld_epsilon = Some(epsilon);
        self
    }

    /// Smooth each shell before flattening.
    #[must_use]
    pub const fn with_smooth(mut self, smooth: SmoothParams) -> Self {
        self.smooth = Some(smooth);
        self
    }

    /// Flatten each shell to its contact sheet.
    #[must_use]
    pub const fn with_flatten(mut self, flatten: FlattenParams) -> Self {
        self.flatten = Some(flatten);
        self
    }

    /// Fill holes in each shell.
    #[must_use]
    pub const fn with_fill(mut self, fill: FillParams) -> Self {
        self.fill = Some(fill);
        self
    }

    /// Smooth each shell again after filling.
    #[must_use]
    pub const fn with_resmooth(mut self, resmooth: SmoothParams) -> Self {
        self.resmooth = Some(resmooth);
        self
    }

    /// Set the boundary walk rule.
    #[must_use]
    pub const fn with_trace(mut self, trace: TraceParams) -> Self {
        self.trace = trace;
        self
    }

    /// Set the curvature estimator.
    #[must_use]
    pub const fn with_curvature(mut self, curvature: CurvatureEstimator) -> Self {
        self.curvature = curvature;
        self
    }
}

/// Analysis of one connected shell.
#[derive(Debug, Clone)]
pub struct ShellReport {
    /// Position of the shell in split order.
    pub index: usize,
    /// Shell geometry after clean-up, with compact local indices.
    pub mesh: IndexedMesh,
    /// Boundary loops in local vertex indices.
    pub boundary: BoundaryReport,
    /// One curvature value per local vertex.
    pub curvature: CurvatureField,
    /// Enclosed volume. Only meaningful for closed shells.
    pub volume: f64,
}

impl ShellReport {
    /// Check if the shell has no exterior vertex.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.boundary.exterior_count == 0
    }

    /// Serializable view of the report.
    #[must_use]
    pub fn summary(&self) -> ShellSummary {
        ShellSummary {
            index: self.index,
            vertices: self.mesh.vertex_count(),
            faces: self.mesh.face_count(),
            volume: self.volume,
            holes: self.boundary.to_index_lists(),
            degenerate_loops: self.boundary.degenerate_count(),
            curvature: self.curvature.values.clone(),
        }
    }
}

/// JSON form of a [`ShellReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShellSummary {
    /// Position of the shell in split order.
    pub index: usize,
    /// Vertex count.
    pub vertices: usize,
    /// Face count.
    pub faces: usize,
    /// Enclosed volume.
    pub volume: f64,
    /// Boundary loops as vertex index lists.
    pub holes: Vec<Vec<u32>>,
    /// Loops made of a single vertex.
    pub degenerate_loops: usize,
    /// Curvature per vertex.
    pub curvature: Vec<f64>,
}

/// Split `mesh` into shells and analyze each one.
///
/// Shells come back in split order (ordered by their lowest face index).
/// A mesh without faces yields no shells. A shell that flattening leaves
/// without faces is dropped, so indices may skip.
///
/// # Errors
///
/// Returns an error if the mesh is malformed or a stage fails.
///
/// # Example
///
/// ```
/// use cellmesh::{analyze_shells, AnalysisParams};
/// use cellmesh::types::unit_cube;
///
/// let shells = analyze_shells(&unit_cube(), &AnalysisParams::default()).unwrap();
/// assert_eq!(shells.len(), 1);
/// assert!(shells[0].is_closed());
/// ```
pub fn analyze_shells(
    mesh: &IndexedMesh,
    params: &AnalysisParams,
) -> AnalysisResult<Vec<ShellReport>> {
    mesh.validate()?;

    let working = match params.weld_epsilon {
        Some(epsilon) => {
            let welded = weld_vertices(mesh, epsilon)?;
            debug!(merged = welded.merged, "welded before split");
            welded.mesh
        }
        None => mesh.clone(),
    };

    let shells = split_into_components(&working)?;
    let shell_count = shells.len();

    let reports: Vec<ShellReport> = shells
        .into_par_iter()
        .enumerate()
        .map(|(index, shell)| -> AnalysisResult<Option<ShellReport>> {
            let shell = clean_shell(shell, params)?;
            if shell.faces.is_empty() {
                return Ok(None);
            }
            let boundary = detect_holes_with(&shell, &params.trace)?;
            let curvature = params.curvature.estimate(&shell)?;
            let volume = shell.volume();
            Ok(Some(ShellReport {
                index,
                mesh: shell,
                boundary,
                curvature,
                volume,
            }))
        })
        .collect::<AnalysisResult<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect();

    info!(
        shells = reports.len(),
        dropped = shell_count - reports.len(),
        open = reports.iter().filter(|r| !r.is_closed()).count(),
        "analyzed shells"
    );

    Ok(reports)
}

/// Run the enabled clean-up stages on one shell.
fn clean_shell(mut shell: IndexedMesh, params: &AnalysisParams) -> AnalysisResult<IndexedMesh> {
    if let Some(smooth) = &params.smooth {
        shell = smooth_laplacian(&shell, smooth)?.mesh;
    }

    if let Some(flat) = &params.flatten {
        let flattened = flatten(&shell, flat)?;
        debug!(
            facing = flattened.facing_vertices,
            faces = flattened.mesh.face_count(),
            "flattened shell"
        );
        shell = flattened.mesh;
    }

    if let Some(fill) = &params.fill {
        let filled = fill_holes(&shell, fill)?;
        debug!(
            filled = filled.holes_filled,
            skipped = filled.holes_skipped,
            "closed shell holes"
        );
        shell = filled.mesh;
    }

    if let Some(resmooth) = &params.resmooth {
        shell = smooth_laplacian(&shell, resmooth)?.mesh;
    }

    Ok(shell)
}

/// Pretty-printed JSON array of shell summaries.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn shells_summary_json(reports: &[ShellReport]) -> AnalysisResult<String> {
    let summaries: Vec<ShellSummary> = reports.iter().map(ShellReport::summary).collect();
    Ok(serde_json::to_string_pretty(&summaries)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_curvature::CurvatureKind;
    use mesh_types::unit_cube;

    /// Unit cube without its top, shifted along x.
    fn open_box(dx: f64) -> IndexedMesh {
        let mut mesh = unit_cube();
        mesh.faces.drain(2..4);
        for v in &mut mesh.vertices {
            v.position.x += dx;
        }
        mesh
    }

    fn cube_and_open_box() -> IndexedMesh {
        let mut mesh = unit_cube();
        mesh.merge(&open_box(3.0));
        mesh
    }

    /// Closed slab: a concave dish over a copy 0.3 below, joined at the rim.
    fn thick_dish(dx: f64) -> IndexedMesh {
        let mut positions = Vec::new();
        for dz in [0.0, -0.3] {
            for y in 0..3 {
                for x in 0..3 {
                    let sag = if (x, y) == (1, 1) { -1.0 } else { 0.0 };
                    positions.extend([f64::from(x) + dx, f64::from(y), sag + dz]);
                }
            }
        }
        let mut indices = Vec::new();
        for y in 0..2u32 {
            for x in 0..2u32 {
                let a = y * 3 + x;
                indices.extend([a, a + 1, a + 4, a, a + 4, a + 3]);
                let b = a + 9;
                indices.extend([b, b + 4, b + 1, b, b + 3, b + 4]);
            }
        }
        let rim = [0u32, 1, 2, 5, 8, 7, 6, 3];
        for (i, &a) in rim.iter().enumerate() {
            let b = rim[(i + 1) % rim.len()];
            indices.extend([a, a + 9, b, b, a + 9, b + 9]);
        }
        IndexedMesh::from_raw(&positions, &indices)
    }

    #[test]
    fn empty_mesh_has_no_shells() {
        let shells = analyze_shells(&IndexedMesh::new(), &AnalysisParams::default()).unwrap();
        assert!(shells.is_empty());
    }

    #[test]
    fn shells_are_analyzed_separately() {
        let shells = analyze_shells(&cube_and_open_box(), &AnalysisParams::default()).unwrap();
        assert_eq!(shells.len(), 2);

        let cube = &shells[0];
        assert_eq!(cube.index, 0);
        assert!(cube.is_closed());
        assert_eq!(cube.boundary.hole_count(), 0);
        assert_eq!(cube.curvature.kind, CurvatureKind::Angular);
        assert_eq!(cube.curvature.len(), 8);
        assert_relative_eq!(cube.volume, 1.0, epsilon = 1e-9);

        let open = &shells[1];
        assert!(!open.is_closed());
        assert_eq!(open.boundary.hole_count(), 1);
        assert_eq!(open.boundary.loops[0].vertices.len(), 4);
        assert_eq!(open.mesh.face_count(), 10);
    }

    #[test]
    fn fill_closes_every_shell() {
        let params = AnalysisParams::default().with_fill(FillParams::default());
        let shells = analyze_shells(&cube_and_open_box(), &params).unwrap();
        assert_eq!(shells.len(), 2);
        assert!(shells.iter().all(ShellReport::is_closed));
        assert_relative_eq!(shells[1].volume, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn flatten_keeps_the_contact_sheet() {
        let slab = thick_dish(0.0);
        let closed = analyze_shells(&slab, &AnalysisParams::default()).unwrap();
        assert!(closed[0].is_closed());
        assert_relative_eq!(closed[0].volume, 1.2, epsilon = 1e-9);

        let params = AnalysisParams::default().with_flatten(FlattenParams::default());
        let shells = analyze_shells(&slab, &params).unwrap();
        assert_eq!(shells.len(), 1);
        assert_eq!(shells[0].mesh.face_count(), 6);
        assert_eq!(shells[0].mesh.vertex_count(), 7);
        assert!(!shells[0].is_closed());
        // Only the upper sheet at z = 0 and its sag at z = -1 survive
        assert!(shells[0].mesh.vertices.iter().all(|v| {
            let z = v.position.z;
            z.abs() < 1e-12 || (z + 1.0).abs() < 1e-12
        }));
    }

    #[test]
    fn flatten_then_fill_closes_the_sheet() {
        let params = AnalysisParams::default()
            .with_flatten(FlattenParams::default())
            .with_fill(FillParams::default());
        let shells = analyze_shells(&thick_dish(0.0), &params).unwrap();
        assert_eq!(shells.len(), 1);
        assert!(shells[0].is_closed());
        assert!(shells[0].mesh.face_count() > 6);
    }

    #[test]
    fn flatten_drops_convex_shells() {
        let mut mesh = unit_cube();
        mesh.merge(&thick_dish(5.0));

        let params = AnalysisParams::default().with_flatten(FlattenParams::default());
        let shells = analyze_shells(&mesh, &params).unwrap();
        assert_eq!(shells.len(), 1);
        assert_eq!(shells[0].index, 1);
        assert_eq!(shells[0].mesh.face_count(), 6);
    }

    #[test]
    fn smoothing_runs_on_each_shell() {
        let params = AnalysisParams::default()
            .with_smooth(SmoothParams::default())
            .with_resmooth(SmoothParams::default().with_iterations(1));
        let shells = analyze_shells(&cube_and_open_box(), &params).unwrap();
        assert_eq!(shells.len(), 2);
        assert_eq!(shells[0].mesh.face_count(), 12);
        assert!(shells[0].volume < 1.0);
        assert!(shells[0].is_closed());
        assert!(!shells[1].is_closed());
    }

    #[test]
    fn weld_joins_split_triangles() {
        // Two triangles that each carry their own copy of the shared edge
        let mesh = IndexedMesh::from_raw(
            &[
                0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, //
                1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0,
            ],
            &[0, 1, 2, 3, 4, 5],
        );

        let unwelded = analyze_shells(&mesh, &AnalysisParams::default()).unwrap();
        assert_eq!(unwelded.len(), 2);

        let welded = analyze_shells(&mesh, &AnalysisParams::default().with_weld_epsilon(1e-6))
            .unwrap();
        assert_eq!(welded.len(), 1);
        assert_eq!(welded[0].mesh.vertex_count(), 4);
        assert_eq!(welded[0].boundary.loops[0].vertices.len(), 4);
    }

    #[test]
    fn malformed_mesh_is_rejected() {
        let mut mesh = unit_cube();
        mesh.faces.push([0, 1, 99]);
        assert!(analyze_shells(&mesh, &AnalysisParams::default()).is_err());
    }

    #[test]
    fn summary_json_lists_loops_and_curvature() {
        let shells = analyze_shells(&cube_and_open_box(), &AnalysisParams::default()).unwrap();
        let json = shells_summary_json(&shells).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[0]["holes"].as_array().map(Vec::len), Some(0));
        assert_eq!(value[1]["holes"][0].as_array().map(Vec::len), Some(4));
        assert_eq!(value[1]["curvature"].as_array().map(Vec::len), Some(8));
    }
}
