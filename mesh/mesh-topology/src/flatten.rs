//! Contact-surface extraction.
//!
//! A contact region between two cells is segmented as a thin volume: two
//! sheets a few voxels apart, joined along a rim. Only the concave sheet is
//! wanted. Its vertex normals point back toward the region's centroid while
//! the opposite sheet's point away, so keeping the faces whose corners all
//! face the centroid collapses the volume to a single open surface.

use mesh_types::{IndexedMesh, NormalWeighting, Point3, Vector3};
use tracing::{debug, warn};

use crate::components::submesh;
use crate::error::TopologyResult;
use crate::params::FlattenParams;

/// Result of [`flatten`].
#[derive(Debug, Clone)]
pub struct FlattenOutcome {
    /// Kept faces with compact vertex indices. Empty if nothing faced the
    /// reference point.
    pub mesh: IndexedMesh,
    /// Input vertices that faced the reference point.
    pub facing_vertices: usize,
    /// Point the normals were tested against, `None` for a mesh without vertices.
    pub reference: Option<Point3<f64>>,
    /// Whether the reference point was moved off the centroid.
    pub nudged: bool,
}

/// Which vertices have a normal pointing toward `target`.
///
/// A vertex faces `target` when the cosine between its area-weighted normal
/// and the direction to `target` exceeds `threshold`. Vertices without a
/// normal, or sitting on `target`, never face it.
///
/// # Errors
///
/// Returns an error if the mesh is malformed.
pub fn vertices_facing(
    mesh: &IndexedMesh,
    target: &Point3<f64>,
    threshold: f64,
) -> TopologyResult<Vec<bool>> {
    mesh.validate()?;
    let normals = mesh.vertex_normals(NormalWeighting::Area);
    Ok(facing_mask(mesh, &normals, target, threshold))
}

/// Keep the part of `mesh` whose normals face its centroid.
///
/// If no vertex faces the centroid (a flat patch, or a sheet bent the other
/// way) and `params.nudge` is positive, the reference point is pushed along
/// the mean vertex normal by `params.nudge` and the test is repeated.
/// Vertex positions are never moved.
///
/// # Errors
///
/// Returns an error if the mesh is malformed.
///
/// # Example
///
/// ```
/// use mesh_types::IndexedMesh;
/// use mesh_topology::{flatten, FlattenParams};
///
/// // A flat square faces nothing in its own plane; the nudge keeps it whole
/// let square = IndexedMesh::from_raw(
///     &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
///     &[0, 1, 2, 0, 2, 3],
/// );
/// let outcome = flatten(&square, &FlattenParams::default()).unwrap();
/// assert!(outcome.nudged);
/// assert_eq!(outcome.mesh.face_count(), 2);
/// ```
pub fn flatten(mesh: &IndexedMesh, params: &FlattenParams) -> TopologyResult<FlattenOutcome> {
    mesh.validate()?;

    let Some(center) = mesh.centroid() else {
        return Ok(FlattenOutcome {
            mesh: IndexedMesh::new(),
            facing_vertices: 0,
            reference: None,
            nudged: false,
        });
    };

    let normals = mesh.vertex_normals(NormalWeighting::Area);
    let mut reference = center;
    let mut nudged = false;
    let mut facing = facing_mask(mesh, &normals, &reference, params.facing_threshold);

    if !facing.contains(&true) && params.nudge > 0.0 {
        if let Some(mean) = mean_normal(&normals) {
            reference = center + mean * params.nudge;
            facing = facing_mask(mesh, &normals, &reference, params.facing_threshold);
            nudged = true;
        }
    }

    let facing_vertices = facing.iter().filter(|&&f| f).count();
    let kept: Vec<usize> = mesh
        .faces
        .iter()
        .enumerate()
        .filter(|(_, face)| face.iter().all(|&v| facing[v as usize]))
        .map(|(f, _)| f)
        .collect();

    if kept.is_empty() {
        warn!(
            vertices = mesh.vertex_count(),
            nudged, "no face points toward the centroid"
        );
    }
    debug!(
        facing_vertices,
        kept_faces = kept.len(),
        dropped_faces = mesh.face_count() - kept.len(),
        "flattened mesh"
    );

    Ok(FlattenOutcome {
        mesh: submesh(mesh, &kept),
        facing_vertices,
        reference: Some(reference),
        nudged,
    })
}

fn facing_mask(
    mesh: &IndexedMesh,
    normals: &[Option<Vector3<f64>>],
    target: &Point3<f64>,
    threshold: f64,
) -> Vec<bool> {
    mesh.vertices
        .iter()
        .zip(normals)
        .map(|(vertex, normal)| {
            let toward = (target - vertex.position).try_normalize(f64::EPSILON);
            match (normal, toward) {
                (Some(n), Some(d)) => n.dot(&d) > threshold,
                _ => false,
            }
        })
        .collect()
}

/// Unit mean of the available vertex normals.
#[allow(clippy::cast_precision_loss)]
fn mean_normal(normals: &[Option<Vector3<f64>>]) -> Option<Vector3<f64>> {
    let (sum, count) = normals
        .iter()
        .flatten()
        .fold((Vector3::zeros(), 0usize), |(sum, count), n| (sum + n, count + 1));
    if count == 0 {
        return None;
    }
    (sum / count as f64).try_normalize(f64::EPSILON)
}
