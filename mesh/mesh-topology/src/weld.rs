//! Vertex welding.
//!
//! Segmentation exports often duplicate vertices along patch seams, which
//! makes every seam look like an open boundary. Welding merges coincident
//! vertices so the topology can see the surface as one piece.

use hashbrown::HashMap;
use mesh_types::{IndexedMesh, Point3};
use tracing::debug;

use crate::error::TopologyResult;

/// Result of [`weld_vertices`].
#[derive(Debug, Clone)]
pub struct WeldOutcome {
    /// Welded mesh with a compact vertex list.
    pub mesh: IndexedMesh,
    /// Number of vertices merged into another.
    pub merged: usize,
    /// Number of faces dropped because two corners collapsed together.
    pub collapsed_faces: usize,
}

/// Merge vertices closer than `epsilon`.
///
/// Each vertex is merged into the lowest-indexed surviving vertex within
/// `epsilon`. Surviving vertices keep their relative order; faces are
/// remapped and faces with repeated corners are dropped together with their
/// supplied normals. A non-positive or non-finite `epsilon` merges nothing.
///
/// # Errors
///
/// Returns an error if the mesh is malformed.
///
/// # Example
///
/// ```
/// use mesh_types::IndexedMesh;
/// use mesh_topology::weld_vertices;
///
/// // Two triangles that each carry their own copy of the shared edge
/// let mesh = IndexedMesh::from_raw(
///     &[
///         0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, //
///         1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0,
///     ],
///     &[0, 1, 2, 3, 4, 5],
/// );
///
/// let welded = weld_vertices(&mesh, 1e-6).unwrap();
/// assert_eq!(welded.merged, 2);
/// assert_eq!(welded.mesh.vertex_count(), 4);
/// ```
#[allow(clippy::cast_possible_truncation)]
pub fn weld_vertices(mesh: &IndexedMesh, epsilon: f64) -> TopologyResult<WeldOutcome> {
    mesh.validate()?;

    if mesh.vertices.is_empty() || !epsilon.is_finite() || epsilon <= 0.0 {
        return Ok(WeldOutcome {
            mesh: mesh.clone(),
            merged: 0,
            collapsed_faces: 0,
        });
    }

    let cell_size = epsilon * 2.0;

    let mut spatial_hash: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    for (idx, vertex) in mesh.vertices.iter().enumerate() {
        spatial_hash
            .entry(pos_to_cell(&vertex.position, cell_size))
            .or_default()
            .push(idx as u32);
    }

    let mut vertex_remap: Vec<u32> = (0..mesh.vertices.len() as u32).collect();
    let mut merged = 0;

    for (idx, vertex) in mesh.vertices.iter().enumerate() {
        let idx = idx as u32;
        if vertex_remap[idx as usize] != idx {
            continue;
        }

        let cell = pos_to_cell(&vertex.position, cell_size);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(candidates) = spatial_hash.get(&(cell.0 + dx, cell.1 + dy, cell.2 + dz))
                    else {
                        continue;
                    };
                    for &other in candidates {
                        if other <= idx || vertex_remap[other as usize] != other {
                            continue;
                        }
                        let dist = (vertex.position - mesh.vertices[other as usize].position).norm();
                        if dist < epsilon {
                            vertex_remap[other as usize] = idx;
                            merged += 1;
                        }
                    }
                }
            }
        }
    }

    if merged == 0 {
        return Ok(WeldOutcome {
            mesh: mesh.clone(),
            merged: 0,
            collapsed_faces: 0,
        });
    }

    // Compact: survivors are the vertices that map to themselves
    let mut compact: Vec<u32> = vec![0; mesh.vertices.len()];
    let mut vertices = Vec::with_capacity(mesh.vertices.len() - merged);
    for (idx, vertex) in mesh.vertices.iter().enumerate() {
        if vertex_remap[idx] == idx as u32 {
            compact[idx] = vertices.len() as u32;
            vertices.push(vertex.clone());
        }
    }

    let mut faces = Vec::with_capacity(mesh.faces.len());
    let mut normals = mesh.face_normals.as_ref().map(|_| Vec::new());
    for (f, face) in mesh.faces.iter().enumerate() {
        let [a, b, c] = face.map(|v| compact[vertex_remap[v as usize] as usize]);
        if a == b || b == c || a == c {
            continue;
        }
        faces.push([a, b, c]);
        if let (Some(out), Some(src)) = (normals.as_mut(), mesh.face_normals.as_ref()) {
            out.push(src[f]);
        }
    }

    let collapsed_faces = mesh.faces.len() - faces.len();
    debug!(
        merged,
        collapsed_faces,
        vertices = vertices.len(),
        "welded vertices"
    );

    let mut welded = IndexedMesh::from_parts(vertices, faces);
    welded.face_normals = normals;

    Ok(WeldOutcome {
        mesh: welded,
        merged,
        collapsed_faces,
    })
}

#[allow(clippy::cast_possible_truncation)]
fn pos_to_cell(pos: &Point3<f64>, cell_size: f64) -> (i64, i64, i64) {
    (
        (pos.x / cell_size).floor() as i64,
        (pos.y / cell_size).floor() as i64,
        (pos.z / cell_size).floor() as i64,
    )
}
