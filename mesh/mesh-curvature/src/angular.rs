//! Discrete angular curvature.
//!
//! For a vertex with unit normal `n_v` and incident unit face normals `n_f`,
//! the curvature is `mean(|n_f - n_v|) / sqrt(2)`. A flat neighborhood gives
//! zero; the value grows as incident faces fan away from the vertex normal.

use std::f64::consts::SQRT_2;

use mesh_topology::TopologyGraph;
use mesh_types::{IndexedMesh, Vector3};
use rayon::prelude::*;
use tracing::debug;

use crate::error::CurvatureResult;
use crate::params::CurvatureParams;
use crate::result::{CurvatureField, CurvatureKind};

/// Compute the angular curvature of every vertex.
///
/// Vertices with fewer than `params.min_faces` incident faces, or without a
/// usable vertex normal, are set to zero. Degenerate faces are left out of
/// the mean.
///
/// # Errors
///
/// Returns an error if the mesh is malformed.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_curvature::{angular_curvature, CurvatureParams};
///
/// let field = angular_curvature(&unit_cube(), &CurvatureParams::default()).unwrap();
/// let corner = (1.0 - 1.0 / 3.0_f64.sqrt()).sqrt();
/// assert!(field.values.iter().all(|c| (c - corner).abs() < 1e-9));
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn angular_curvature(
    mesh: &IndexedMesh,
    params: &CurvatureParams,
) -> CurvatureResult<CurvatureField> {
    mesh.validate()?;

    let graph = TopologyGraph::build(&mesh.faces, mesh.vertices.len());
    let face_normals = mesh.unit_face_normals();
    let vertex_normals = vertex_normals(mesh, params);

    let values: Vec<Option<f64>> = (0..mesh.vertices.len())
        .into_par_iter()
        .map(|v| {
            let faces = graph.faces_for_vertex(v as u32);
            if faces.len() < params.min_faces {
                return None;
            }
            let n_v = vertex_normals[v]?;

            let (sum, count) = faces
                .iter()
                .filter_map(|&f| face_normals[f])
                .fold((0.0, 0usize), |(sum, count), n_f| {
                    (sum + (n_f - n_v).norm(), count + 1)
                });
            if count == 0 {
                return None;
            }
            Some(sum / count as f64 / SQRT_2)
        })
        .collect();

    let vertices_skipped = values.iter().filter(|v| v.is_none()).count();
    debug!(
        vertices = values.len(),
        skipped = vertices_skipped,
        "computed angular curvature"
    );

    Ok(CurvatureField {
        kind: CurvatureKind::Angular,
        values: values.into_iter().map(|v| v.unwrap_or(0.0)).collect(),
        vertices_skipped,
    })
}

/// Unit vertex normals, supplied or computed.
fn vertex_normals(mesh: &IndexedMesh, params: &CurvatureParams) -> Vec<Option<Vector3<f64>>> {
    if params.use_supplied_normals && mesh.vertices.iter().all(|v| v.normal.is_some()) {
        return mesh
            .vertices
            .iter()
            .map(|v| v.normal.and_then(|n| n.try_normalize(f64::EPSILON)))
            .collect();
    }
    mesh.vertex_normals(params.weighting)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{NormalWeighting, Point3, Vertex, unit_cube};

    fn cube_corner_value() -> f64 {
        (1.0 - 1.0 / 3.0_f64.sqrt()).sqrt()
    }

    fn flat_grid() -> IndexedMesh {
        let mut positions = Vec::new();
        for y in 0..3 {
            for x in 0..3 {
                positions.extend([f64::from(x), f64::from(y), 0.0]);
            }
        }
        let mut indices = Vec::new();
        for y in 0..2u32 {
            for x in 0..2u32 {
                let a = y * 3 + x;
                indices.extend([a, a + 1, a + 4, a, a + 4, a + 3]);
            }
        }
        IndexedMesh::from_raw(&positions, &indices)
    }

    #[test]
    fn cube_corners_are_uniform() {
        let field = angular_curvature(&unit_cube(), &CurvatureParams::default()).unwrap();
        assert_eq!(field.len(), 8);
        assert_eq!(field.vertices_skipped, 0);
        for &c in &field.values {
            assert_relative_eq!(c, cube_corner_value(), epsilon = 1e-9);
        }
    }

    #[test]
    fn flat_patch_is_zero() {
        let field = angular_curvature(&flat_grid(), &CurvatureParams::default()).unwrap();
        for &c in &field.values {
            assert_relative_eq!(c, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn single_face_vertices_are_zero() {
        let mesh = IndexedMesh::from_raw(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[0, 1, 2]);
        let field = angular_curvature(&mesh, &CurvatureParams::default()).unwrap();
        assert_eq!(field.values, vec![0.0; 3]);
        assert_eq!(field.vertices_skipped, 3);

        let relaxed = angular_curvature(&mesh, &CurvatureParams::default().with_min_faces(1));
        assert_eq!(relaxed.unwrap().vertices_skipped, 0);
    }

    #[test]
    fn unreferenced_vertex_is_zero() {
        let mut mesh = unit_cube();
        mesh.vertices.push(Vertex::from_coords(5.0, 5.0, 5.0));
        let field = angular_curvature(&mesh, &CurvatureParams::default()).unwrap();
        assert_eq!(field.get(8), Some(0.0));
        assert_eq!(field.vertices_skipped, 1);
    }

    #[test]
    fn supplied_normals_are_used_when_complete() {
        // Point every supplied normal along +Z (length is irrelevant)
        let mut mesh = unit_cube();
        for v in &mut mesh.vertices {
            v.normal = Some(Vector3::z() * 3.0);
        }
        let supplied = angular_curvature(&mesh, &CurvatureParams::default().with_supplied_normals(true))
            .unwrap();
        let computed = angular_curvature(&mesh, &CurvatureParams::default()).unwrap();

        assert_relative_eq!(computed.values[0], cube_corner_value(), epsilon = 1e-9);
        assert!((supplied.values[0] - computed.values[0]).abs() > 1e-3);

        // One missing normal disables the supplied set
        mesh.vertices[3].normal = None;
        let partial = angular_curvature(&mesh, &CurvatureParams::default().with_supplied_normals(true))
            .unwrap();
        assert_eq!(partial, computed);
    }

    #[test]
    fn area_weighting_changes_cube_corners() {
        // Corner 0 touches two triangles on each face plane, corner 1 only one
        // on the bottom; area weights are uneven there.
        let angle = angular_curvature(&unit_cube(), &CurvatureParams::default()).unwrap();
        let area = angular_curvature(&unit_cube(), &CurvatureParams::area_weighted()).unwrap();
        assert_relative_eq!(angle.values[1], cube_corner_value(), epsilon = 1e-9);
        assert!((area.values[1] - angle.values[1]).abs() > 1e-6);
        assert_eq!(
            CurvatureParams::area_weighted().weighting,
            NormalWeighting::Area
        );
    }

    #[test]
    fn degenerate_faces_are_ignored() {
        let mut mesh = flat_grid();
        // Zero-area sliver on vertex 4
        mesh.vertices.push(Vertex::new(Point3::new(1.0, 1.0, 0.0)));
        mesh.faces.push([4, 9, 4]);
        let field = angular_curvature(&mesh, &CurvatureParams::default()).unwrap();
        assert_relative_eq!(field.values[4], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn malformed_mesh_is_rejected() {
        let mut mesh = unit_cube();
        mesh.faces.push([0, 1, 8]);
        assert!(angular_curvature(&mesh, &CurvatureParams::default()).is_err());
    }
}
