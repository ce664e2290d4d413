//! Vertex, edge and face adjacency for a triangle list.
//!
//! The graph is built once per face list and must be rebuilt whenever the
//! faces change. It also carries the exterior-vertex classification: a vertex
//! whose incident-face count differs from its incident-edge count sits on an
//! open boundary.

use hashbrown::HashMap;
use mesh_types::IndexedMesh;
use tracing::debug;

use crate::error::TopologyResult;

/// Adjacency information for a mesh.
///
/// Provides lookups for:
/// - Vertices sharing an edge with a vertex (sorted, deduplicated)
/// - Faces touching a vertex
/// - Faces adjacent to an edge
/// - Exterior (boundary) vertices
#[derive(Debug, Clone)]
pub struct TopologyGraph {
    /// Sorted neighbor list per vertex.
    neighbors: Vec<Vec<u32>>,
    /// Incident face indices per vertex, ascending.
    vertex_faces: Vec<Vec<usize>>,
    /// Maps edge (v0, v1) to list of face indices. v0 < v1.
    edge_faces: HashMap<(u32, u32), Vec<usize>>,
}

impl TopologyGraph {
    /// Build adjacency information from a list of faces.
    ///
    /// `vertex_count` sizes the per-vertex tables; it is grown to cover any
    /// larger index found in `faces`, so unvalidated input never panics.
    /// Repeated indices inside a face are counted once.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_topology::TopologyGraph;
    ///
    /// let faces = vec![[0, 1, 2], [1, 3, 2]];
    /// let graph = TopologyGraph::build(&faces, 4);
    ///
    /// assert_eq!(graph.neighbors(1), &[0, 2, 3]);
    /// assert_eq!(graph.boundary_edge_count(), 4);
    /// ```
    #[must_use]
    pub fn build(faces: &[[u32; 3]], vertex_count: usize) -> Self {
        let max_index = faces
            .iter()
            .flat_map(|f| f.iter())
            .map(|&v| v as usize + 1)
            .max()
            .unwrap_or(0);
        let n = vertex_count.max(max_index);

        let mut neighbors: Vec<Vec<u32>> = vec![Vec::new(); n];
        let mut vertex_faces: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut edge_faces: HashMap<(u32, u32), Vec<usize>> = HashMap::new();

        for (face_idx, face) in faces.iter().enumerate() {
            // A corner repeated within one face touches that face once
            for (i, &v) in face.iter().enumerate() {
                if !face[..i].contains(&v) {
                    vertex_faces[v as usize].push(face_idx);
                }
            }

            let mut seen: [(u32, u32); 3] = [(u32::MAX, u32::MAX); 3];
            for (k, (a, b)) in [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])]
                .into_iter()
                .enumerate()
            {
                if a == b {
                    continue;
                }
                let edge = normalize_edge(a, b);
                if seen[..k].contains(&edge) {
                    continue;
                }
                seen[k] = edge;

                edge_faces.entry(edge).or_default().push(face_idx);
                neighbors[a as usize].push(b);
                neighbors[b as usize].push(a);
            }
        }

        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }

        debug!(
            vertices = n,
            faces = faces.len(),
            edges = edge_faces.len(),
            "built topology graph"
        );

        Self {
            neighbors,
            vertex_faces,
            edge_faces,
        }
    }

    /// Validate a mesh and build its graph.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::Mesh`](crate::TopologyError::Mesh) if a face
    /// references an out-of-range vertex.
    pub fn from_mesh(mesh: &IndexedMesh) -> TopologyResult<Self> {
        mesh.validate()?;
        Ok(Self::build(&mesh.faces, mesh.vertices.len()))
    }

    /// Number of vertex slots in the graph.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Vertices sharing an edge with `v`, ascending.
    #[must_use]
    pub fn neighbors(&self, v: u32) -> &[u32] {
        self.neighbors.get(v as usize).map_or(&[], Vec::as_slice)
    }

    /// Faces touching `v`, ascending.
    #[must_use]
    pub fn faces_for_vertex(&self, v: u32) -> &[usize] {
        self.vertex_faces.get(v as usize).map_or(&[], Vec::as_slice)
    }

    /// Faces adjacent to an edge, in either direction.
    ///
    /// Returns `None` if the edge doesn't exist in the mesh.
    #[must_use]
    pub fn faces_for_edge(&self, v0: u32, v1: u32) -> Option<&[usize]> {
        self.edge_faces
            .get(&normalize_edge(v0, v1))
            .map(Vec::as_slice)
    }

    /// Number of faces touching `v`.
    #[must_use]
    pub fn incident_face_count(&self, v: u32) -> usize {
        self.faces_for_vertex(v).len()
    }

    /// Number of edges touching `v`.
    #[must_use]
    pub fn incident_edge_count(&self, v: u32) -> usize {
        self.neighbors(v).len()
    }

    /// Whether `v` lies on an open boundary.
    ///
    /// A closed fan of `k` triangles around a vertex has exactly `k` edges;
    /// any mismatch marks the vertex as exterior. Unreferenced vertices are
    /// not exterior.
    #[must_use]
    pub fn is_exterior(&self, v: u32) -> bool {
        self.incident_face_count(v) != self.incident_edge_count(v)
    }

    /// Exterior flag for every vertex.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn exterior_vertices(&self) -> Vec<bool> {
        (0..self.vertex_count() as u32)
            .map(|v| self.is_exterior(v))
            .collect()
    }

    /// Indices of exterior vertices, ascending.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn exterior_indices(&self) -> Vec<u32> {
        (0..self.vertex_count() as u32)
            .filter(|&v| self.is_exterior(v))
            .collect()
    }

    /// Iterate over all undirected edges `(min, max)` in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.neighbors.iter().enumerate().flat_map(|(v, list)| {
            #[allow(clippy::cast_possible_truncation)]
            let v = v as u32;
            list.iter().filter(move |&&n| n > v).map(move |&n| (v, n))
        })
    }

    /// Get the total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_faces.len()
    }

    /// Count the edges with exactly one adjacent face.
    #[must_use]
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_faces
            .values()
            .filter(|faces| faces.len() == 1)
            .count()
    }

    /// Count the edges with more than two adjacent faces.
    #[must_use]
    pub fn non_manifold_edge_count(&self) -> usize {
        self.edge_faces
            .values()
            .filter(|faces| faces.len() > 2)
            .count()
    }

    /// Check if all edges have at most two adjacent faces.
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.edge_faces.values().all(|faces| faces.len() <= 2)
    }

    /// Check if the mesh has no boundary edges.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.edge_faces.values().all(|faces| faces.len() >= 2)
    }
}

/// Normalize edge direction so v0 < v1.
#[inline]
pub(crate) fn normalize_edge(v0: u32, v1: u32) -> (u32, u32) {
    if v0 < v1 { (v0, v1) } else { (v1, v0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::{Vertex, unit_cube};

    fn two_triangles_sharing_edge() -> Vec<[u32; 3]> {
        vec![[0, 1, 2], [1, 3, 2]]
    }

    #[test]
    fn build_single_triangle() {
        let graph = TopologyGraph::build(&[[0, 1, 2]], 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.boundary_edge_count(), 3);
        assert!(!graph.is_watertight());
    }

    #[test]
    fn faces_for_edge_both_directions() {
        let graph = TopologyGraph::build(&two_triangles_sharing_edge(), 4);
        assert_eq!(graph.faces_for_edge(1, 2), Some(&[0, 1][..]));
        assert_eq!(graph.faces_for_edge(2, 1), Some(&[0, 1][..]));
        assert_eq!(graph.faces_for_edge(0, 1).map(<[usize]>::len), Some(1));
        assert!(graph.faces_for_edge(0, 3).is_none());
    }

    #[test]
    fn faces_for_vertex() {
        let graph = TopologyGraph::build(&two_triangles_sharing_edge(), 4);
        assert_eq!(graph.faces_for_vertex(2), &[0, 1]);
        assert_eq!(graph.faces_for_vertex(0), &[0]);
        assert!(graph.faces_for_vertex(99).is_empty());
    }

    #[test]
    fn non_manifold_detection() {
        let graph = TopologyGraph::build(&[[0, 1, 2], [0, 1, 3], [0, 1, 4]], 5);
        assert_eq!(graph.non_manifold_edge_count(), 1);
        assert!(!graph.is_manifold());
    }

    #[test]
    fn closed_cube_has_no_exterior_vertices() {
        let cube = unit_cube();
        let graph = TopologyGraph::from_mesh(&cube).unwrap();
        assert!(graph.is_watertight());
        assert!(graph.exterior_indices().is_empty());
        for v in 0..8 {
            assert_eq!(graph.incident_face_count(v), graph.incident_edge_count(v));
        }
    }

    #[test]
    fn flat_square_is_all_exterior() {
        let graph = TopologyGraph::build(&[[0, 1, 2], [0, 2, 3]], 4);
        assert_eq!(graph.exterior_indices(), vec![0, 1, 2, 3]);
        // Diagonal vertex 0: two faces, three edges
        assert_eq!(graph.incident_face_count(0), 2);
        assert_eq!(graph.incident_edge_count(0), 3);
    }

    #[test]
    fn unreferenced_vertex_is_interior() {
        let graph = TopologyGraph::build(&[[0, 1, 2]], 5);
        assert_eq!(graph.exterior_vertices(), vec![true, true, true, false, false]);
    }

    #[test]
    fn repeated_index_counted_once() {
        let graph = TopologyGraph::build(&[[0, 0, 1]], 2);
        assert_eq!(graph.incident_face_count(0), 1);
        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.faces_for_edge(0, 1), Some(&[0][..]));
    }

    #[test]
    fn out_of_range_faces_grow_tables() {
        let graph = TopologyGraph::build(&[[0, 1, 7]], 3);
        assert_eq!(graph.vertex_count(), 8);
    }

    #[test]
    fn from_mesh_rejects_malformed() {
        let mut mesh = unit_cube();
        mesh.faces.push([0, 1, 42]);
        assert!(TopologyGraph::from_mesh(&mesh).is_err());

        let mut mesh = mesh_types::IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        assert!(TopologyGraph::from_mesh(&mesh).is_ok());
    }

    #[test]
    fn edges_are_sorted_and_unique() {
        let graph = TopologyGraph::build(&two_triangles_sharing_edge(), 4);
        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges, vec![(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)]);
        assert_eq!(edges.len(), graph.edge_count());
    }
}
