//! Hole filling by ear clipping.
//!
//! Closed boundary loops are triangulated and appended to a copy of the
//! mesh. Each loop is oriented against the face that owns its first edge, so
//! the patch winds consistently with its surroundings.
//!
//! # Example
//!
//! ```
//! use mesh_types::unit_cube;
//! use mesh_topology::{exterior_vertices, fill_holes, FillParams};
//!
//! // Box with its top face removed
//! let mut open = unit_cube();
//! open.faces.retain(|f| *f != [4, 5, 6] && *f != [4, 6, 7]);
//!
//! let outcome = fill_holes(&open, &FillParams::default()).unwrap();
//! assert_eq!(outcome.holes_filled, 1);
//! assert!(exterior_vertices(&outcome.mesh).unwrap().iter().all(|e| !e));
//! ```

use mesh_types::{IndexedMesh, Point3, Triangle, Vector3};
use tracing::{debug, info, warn};

use crate::boundary::{BoundaryLoop, trace_graph};
use crate::error::{TopologyError, TopologyResult};
use crate::graph::TopologyGraph;
use crate::params::FillParams;

/// Result of [`fill_holes`].
#[derive(Debug, Clone)]
pub struct FillOutcome {
    /// Mesh with the patch triangles appended.
    pub mesh: IndexedMesh,
    /// Loops that were triangulated.
    pub holes_filled: usize,
    /// Loops left open (too large, too short or not closed).
    pub holes_skipped: usize,
    /// Number of triangles added.
    pub triangles_added: usize,
}

/// Fill every closed loop with at most `params.max_hole_edges` edges.
///
/// The input is left untouched. If the mesh carries face normals, normals of
/// the new triangles are appended so the counts stay in step.
///
/// # Errors
///
/// Returns [`TopologyError::Mesh`] if the mesh is malformed, or
/// [`TopologyError::HoleFillFailed`] if a loop yields no triangles.
pub fn fill_holes(mesh: &IndexedMesh, params: &FillParams) -> TopologyResult<FillOutcome> {
    let graph = TopologyGraph::from_mesh(mesh)?;
    let report = trace_graph(&graph, &params.trace);

    let mut out = mesh.clone();
    let mut holes_filled = 0;
    let mut holes_skipped = 0;
    let mut triangles_added = 0;

    for hole in &report.loops {
        if !hole.closed || !hole.is_valid() {
            holes_skipped += 1;
            continue;
        }
        if hole.edge_count() > params.max_hole_edges {
            warn!(
                "Skipping large hole with {} edges (max: {})",
                hole.edge_count(),
                params.max_hole_edges
            );
            holes_skipped += 1;
            continue;
        }

        let oriented = orient_against_neighbor(mesh, &graph, hole);
        let triangles = fill_hole_ear_clipping(mesh, &oriented);
        if triangles.is_empty() {
            return Err(TopologyError::HoleFillFailed {
                reason: format!(
                    "Failed to triangulate hole with {} edges",
                    hole.edge_count()
                ),
            });
        }

        if let Some(normals) = out.face_normals.as_mut() {
            normals.extend(triangles.iter().map(|f| {
                Triangle::new(mesh.position(f[0]), mesh.position(f[1]), mesh.position(f[2]))
                    .normal()
                    .unwrap_or_else(Vector3::zeros)
            }));
        }

        triangles_added += triangles.len();
        out.faces.extend(triangles);
        holes_filled += 1;
    }

    if holes_filled > 0 {
        info!(
            "Filled {} holes with {} triangles ({} skipped)",
            holes_filled, triangles_added, holes_skipped
        );
    }

    Ok(FillOutcome {
        mesh: out,
        holes_filled,
        holes_skipped,
        triangles_added,
    })
}

/// Reverse the loop if its first edge already runs the same way in a face.
fn orient_against_neighbor(
    mesh: &IndexedMesh,
    graph: &TopologyGraph,
    hole: &BoundaryLoop,
) -> BoundaryLoop {
    let (a, b) = (hole.vertices[0], hole.vertices[1]);
    let same_direction = graph.faces_for_edge(a, b).is_some_and(|faces| {
        faces.iter().any(|&f| {
            let face = mesh.faces[f];
            (0..3).any(|k| face[k] == a && face[(k + 1) % 3] == b)
        })
    });

    let mut oriented = hole.clone();
    if same_direction {
        oriented.vertices.reverse();
    }
    oriented
}

/// Triangulate one loop by ear clipping.
///
/// Falls back to a fan over the remaining vertices when no ear can be found.
#[must_use]
pub fn fill_hole_ear_clipping(mesh: &IndexedMesh, boundary: &BoundaryLoop) -> Vec<[u32; 3]> {
    let n = boundary.vertices.len();
    if n < 3 {
        return Vec::new();
    }

    let positions: Vec<Point3<f64>> = boundary
        .vertices
        .iter()
        .map(|&idx| mesh.position(idx))
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let centroid = Point3::from(
        positions
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords)
            / n as f64,
    );
    let hole_normal = compute_hole_normal(&positions, &centroid);

    let mut remaining: Vec<usize> = (0..n).collect();
    let mut triangles = Vec::with_capacity(n - 2);

    while remaining.len() > 3 {
        let count = remaining.len();
        let ear = (0..count).find(|&i| {
            let prev = remaining[(i + count - 1) % count];
            let next = remaining[(i + 1) % count];
            is_ear(&positions, &remaining, prev, remaining[i], next, &hole_normal)
        });

        let Some(i) = ear else {
            warn!(
                "Ear clipping stuck with {} vertices remaining, using fan triangulation",
                count
            );
            break;
        };

        let prev = remaining[(i + count - 1) % count];
        let next = remaining[(i + 1) % count];
        triangles.push([
            boundary.vertices[prev],
            boundary.vertices[remaining[i]],
            boundary.vertices[next],
        ]);
        remaining.remove(i);
    }

    let center = remaining[0];
    for pair in remaining[1..].windows(2) {
        triangles.push([
            boundary.vertices[center],
            boundary.vertices[pair[0]],
            boundary.vertices[pair[1]],
        ]);
    }

    debug!(
        "Filled hole with {} edges using {} triangles",
        n,
        triangles.len()
    );

    triangles
}

/// Average normal of a loop, falling back to +Z for flat-collapsed loops.
fn compute_hole_normal(positions: &[Point3<f64>], centroid: &Point3<f64>) -> Vector3<f64> {
    let n = positions.len();
    let normal: Vector3<f64> = (0..n)
        .map(|i| (positions[i] - centroid).cross(&(positions[(i + 1) % n] - centroid)))
        .sum();

    normal
        .try_normalize(f64::EPSILON)
        .unwrap_or_else(Vector3::z)
}

fn is_ear(
    positions: &[Point3<f64>],
    remaining: &[usize],
    prev: usize,
    curr: usize,
    next: usize,
    hole_normal: &Vector3<f64>,
) -> bool {
    let (a, b, c) = (positions[prev], positions[curr], positions[next]);

    let Some(tri_normal) = Triangle::new(a, b, c).normal() else {
        return false;
    };
    // Reflex corner
    if tri_normal.dot(hole_normal) < 0.0 {
        return false;
    }

    remaining
        .iter()
        .filter(|&&idx| idx != prev && idx != curr && idx != next)
        .all(|&idx| !point_in_triangle_projected(&positions[idx], &a, &b, &c, hole_normal))
}

/// Point-in-triangle test after dropping the axis most aligned with `normal`.
fn point_in_triangle_projected(
    p: &Point3<f64>,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
    normal: &Vector3<f64>,
) -> bool {
    let abs = normal.abs();
    let project = |q: &Point3<f64>| -> (f64, f64) {
        if abs.z >= abs.x && abs.z >= abs.y {
            (q.x, q.y)
        } else if abs.y >= abs.x {
            (q.x, q.z)
        } else {
            (q.y, q.z)
        }
    };

    let sign = |p1: (f64, f64), p2: (f64, f64), p3: (f64, f64)| -> f64 {
        (p1.0 - p3.0) * (p2.1 - p3.1) - (p2.0 - p3.0) * (p1.1 - p3.1)
    };

    let (p, a, b, c) = (project(p), project(v0), project(v1), project(v2));
    let d1 = sign(p, a, b);
    let d2 = sign(p, b, c);
    let d3 = sign(p, c, a);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}
