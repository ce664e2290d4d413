//! Laplacian smoothing.
//!
//! Each pass moves every vertex part of the way toward the centroid of its
//! graph neighbors:
//!
//! ```text
//! v_new = v + lambda * (centroid(N(v)) - v)
//! ```
//!
//! Marching-cubes surfaces carry voxel staircase noise that inflates
//! curvature; a few passes remove it. Repeated passes shrink closed shells.

use mesh_types::{IndexedMesh, Vector3};
use tracing::debug;

use crate::error::TopologyResult;
use crate::graph::TopologyGraph;
use crate::params::SmoothParams;

/// Result of [`smooth_laplacian`].
#[derive(Debug, Clone)]
pub struct SmoothOutcome {
    /// Smoothed mesh with the input's faces.
    pub mesh: IndexedMesh,
    /// Passes applied.
    pub iterations: u32,
    /// Largest single-vertex move over all passes.
    pub max_displacement: f64,
}

/// Smooth a mesh with `params.iterations` Laplacian passes.
///
/// Connectivity is unchanged. Vertices without neighbors stay put, as do
/// exterior vertices when `params.preserve_boundary` is set. Supplied face
/// and vertex normals are dropped once any pass runs, since they no longer
/// match the geometry.
///
/// # Errors
///
/// Returns an error if the mesh is malformed.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_topology::{smooth_laplacian, SmoothParams};
///
/// let cube = unit_cube();
/// let outcome = smooth_laplacian(&cube, &SmoothParams::default()).unwrap();
/// assert_eq!(outcome.mesh.faces, cube.faces);
/// assert!(outcome.mesh.volume() < cube.volume());
/// ```
pub fn smooth_laplacian(mesh: &IndexedMesh, params: &SmoothParams) -> TopologyResult<SmoothOutcome> {
    let graph = TopologyGraph::from_mesh(mesh)?;

    let mut result = mesh.clone();
    if params.iterations == 0 || mesh.faces.is_empty() {
        return Ok(SmoothOutcome {
            mesh: result,
            iterations: 0,
            max_displacement: 0.0,
        });
    }

    let pinned: Vec<bool> = if params.preserve_boundary {
        graph.exterior_vertices()
    } else {
        vec![false; mesh.vertices.len()]
    };

    let mut max_displacement = 0.0_f64;
    for _ in 0..params.iterations {
        let step = laplacian_pass(&mut result, &graph, &pinned, params.lambda);
        max_displacement = max_displacement.max(step);
    }

    result.face_normals = None;
    for vertex in &mut result.vertices {
        vertex.normal = None;
    }

    debug!(
        iterations = params.iterations,
        max_displacement, "smoothed mesh"
    );

    Ok(SmoothOutcome {
        mesh: result,
        iterations: params.iterations,
        max_displacement,
    })
}

/// One pass in place. Returns the largest move.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn laplacian_pass(mesh: &mut IndexedMesh, graph: &TopologyGraph, pinned: &[bool], lambda: f64) -> f64 {
    // All moves are computed from the previous positions
    let moves: Vec<Vector3<f64>> = mesh
        .vertices
        .iter()
        .enumerate()
        .map(|(i, vertex)| {
            let neighbors = graph.neighbors(i as u32);
            if pinned[i] || neighbors.is_empty() {
                return Vector3::zeros();
            }
            let sum: Vector3<f64> = neighbors
                .iter()
                .map(|&n| mesh.vertices[n as usize].position.coords)
                .sum();
            let centroid = sum / neighbors.len() as f64;
            (centroid - vertex.position.coords) * lambda
        })
        .collect();

    let mut largest = 0.0_f64;
    for (vertex, delta) in mesh.vertices.iter_mut().zip(&moves) {
        largest = largest.max(delta.norm());
        vertex.position.coords += delta;
    }
    largest
}
