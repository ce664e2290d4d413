//! Average dihedral angle per vertex.

use mesh_topology::TopologyGraph;
use mesh_types::{IndexedMesh, Vector3};
use rayon::prelude::*;
use tracing::debug;

use crate::error::CurvatureResult;
use crate::params::{CurvatureParams, DihedralDenominator};
use crate::result::{CurvatureField, CurvatureKind};

/// Compute the dihedral curvature of every vertex.
///
/// For each edge touching the vertex and shared by exactly two faces, the
/// angle between the two face normals is summed. The sum is divided by the
/// edge count selected by `params.denominator`. Vertices without any counted
/// edge are zero. Edges next to a degenerate face contribute no angle.
///
/// # Errors
///
/// Returns an error if the mesh is malformed.
///
/// # Example
///
/// ```
/// use std::f64::consts::PI;
/// use mesh_types::unit_cube;
/// use mesh_curvature::{dihedral_curvature, CurvatureParams};
///
/// let field = dihedral_curvature(&unit_cube(), &CurvatureParams::default()).unwrap();
/// // Corner 0 has three folded edges and three flat diagonals
/// assert!((field.values[0] - PI / 4.0).abs() < 1e-9);
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn dihedral_curvature(
    mesh: &IndexedMesh,
    params: &CurvatureParams,
) -> CurvatureResult<CurvatureField> {
    mesh.validate()?;

    let graph = TopologyGraph::build(&mesh.faces, mesh.vertices.len());
    let face_normals = mesh.unit_face_normals();

    let values: Vec<Option<f64>> = (0..mesh.vertices.len())
        .into_par_iter()
        .map(|v| {
            let v = v as u32;
            let mut angle_sum = 0.0;
            let mut manifold_edges = 0usize;

            for &n in graph.neighbors(v) {
                let Some(&[f0, f1]) = graph.faces_for_edge(v, n) else {
                    continue;
                };
                manifold_edges += 1;
                if let (Some(a), Some(b)) = (face_normals[f0], face_normals[f1]) {
                    angle_sum += angle_between(&a, &b);
                }
            }

            let denominator = match params.denominator {
                DihedralDenominator::AllEdges => graph.neighbors(v).len(),
                DihedralDenominator::ManifoldEdges => manifold_edges,
            };
            (denominator > 0).then(|| angle_sum / denominator as f64)
        })
        .collect();

    let vertices_skipped = values.iter().filter(|v| v.is_none()).count();
    debug!(
        vertices = values.len(),
        skipped = vertices_skipped,
        "computed dihedral curvature"
    );

    Ok(CurvatureField {
        kind: CurvatureKind::Dihedral,
        values: values.into_iter().map(|v| v.unwrap_or(0.0)).collect(),
        vertices_skipped,
    })
}

/// Unsigned angle between two unit vectors, stable near 0 and pi.
fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.cross(b).norm().atan2(a.dot(b))
}
