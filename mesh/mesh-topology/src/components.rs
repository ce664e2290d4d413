//! Connected component analysis.
//!
//! Two triangles belong to the same component when they share an edge,
//! transitively. Triangles touching only at a vertex are separate.
//!
//! Component order is stable: components are numbered by their lowest face
//! index, and vertices inside a component are re-indexed in first-reference
//! order.

use mesh_types::{IndexedMesh, Vertex};
use tracing::{debug, info};

use crate::error::TopologyResult;
use crate::graph::TopologyGraph;

/// Result of connected component labeling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentAnalysis {
    /// Component id of every face.
    pub face_labels: Vec<usize>,
    /// Number of faces in each component.
    pub component_sizes: Vec<usize>,
}

impl ComponentAnalysis {
    /// Number of components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.component_sizes.len()
    }

    /// Id of the component with the most faces (lowest id on ties).
    #[must_use]
    pub fn largest_component(&self) -> Option<usize> {
        self.component_sizes
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| a.cmp(b).then(ib.cmp(ia)))
            .map(|(id, _)| id)
    }

    /// Face indices of one component, ascending.
    #[must_use]
    pub fn faces_of(&self, component: usize) -> Vec<usize> {
        self.face_labels
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == component)
            .map(|(face, _)| face)
            .collect()
    }
}

/// Disjoint-set forest over face indices.
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Label every face with its edge-connected component.
///
/// # Errors
///
/// Returns an error if the mesh is malformed.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_topology::find_connected_components;
///
/// let analysis = find_connected_components(&unit_cube()).unwrap();
/// assert_eq!(analysis.component_count(), 1);
/// ```
pub fn find_connected_components(mesh: &IndexedMesh) -> TopologyResult<ComponentAnalysis> {
    let graph = TopologyGraph::from_mesh(mesh)?;
    Ok(label_components(&graph, mesh.faces.len()))
}

/// Label faces using a prebuilt graph.
#[must_use]
pub fn label_components(graph: &TopologyGraph, face_count: usize) -> ComponentAnalysis {
    let mut sets = UnionFind::new(face_count);

    for (a, b) in graph.edges() {
        if let Some(faces) = graph.faces_for_edge(a, b) {
            for pair in faces.windows(2) {
                sets.union(pair[0], pair[1]);
            }
        }
    }

    let mut root_to_label: Vec<Option<usize>> = vec![None; face_count];
    let mut face_labels = Vec::with_capacity(face_count);
    let mut component_sizes: Vec<usize> = Vec::new();

    for face in 0..face_count {
        let root = sets.find(face);
        let label = *root_to_label[root].get_or_insert_with(|| {
            component_sizes.push(0);
            component_sizes.len() - 1
        });
        component_sizes[label] += 1;
        face_labels.push(label);
    }

    debug!(
        faces = face_count,
        components = component_sizes.len(),
        "labeled connected components"
    );

    ComponentAnalysis {
        face_labels,
        component_sizes,
    }
}

/// Split a mesh into one mesh per connected component.
///
/// Each component keeps only the vertices its faces reference, re-indexed
/// compactly. Vertex normals and supplied face normals carry over. A mesh
/// with zero faces yields zero components.
///
/// # Errors
///
/// Returns an error if the mesh is malformed.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_topology::split_into_components;
///
/// let mut two = unit_cube();
/// two.merge(&unit_cube());
///
/// let parts = split_into_components(&two).unwrap();
/// assert_eq!(parts.len(), 2);
/// assert_eq!(parts[1].vertex_count(), 8);
/// ```
pub fn split_into_components(mesh: &IndexedMesh) -> TopologyResult<Vec<IndexedMesh>> {
    let analysis = find_connected_components(mesh)?;
    let parts = extract_components(mesh, &analysis);

    info!(
        "Split mesh into {} components, face counts: {:?}",
        parts.len(),
        analysis.component_sizes
    );

    Ok(parts)
}

/// Keep only the component with the most faces.
///
/// Returns `None` for a mesh without faces.
///
/// # Errors
///
/// Returns an error if the mesh is malformed.
pub fn keep_largest_component(mesh: &IndexedMesh) -> TopologyResult<Option<IndexedMesh>> {
    let analysis = find_connected_components(mesh)?;
    let Some(largest) = analysis.largest_component() else {
        return Ok(None);
    };
    let faces = analysis.faces_of(largest);
    Ok(Some(submesh(mesh, &faces)))
}

/// Build one sub-mesh per component in label order.
fn extract_components(mesh: &IndexedMesh, analysis: &ComponentAnalysis) -> Vec<IndexedMesh> {
    let mut groups: Vec<Vec<usize>> = analysis
        .component_sizes
        .iter()
        .map(|&size| Vec::with_capacity(size))
        .collect();
    for (face, &label) in analysis.face_labels.iter().enumerate() {
        groups[label].push(face);
    }

    groups.iter().map(|faces| submesh(mesh, faces)).collect()
}

/// Copy the given faces into a new compactly indexed mesh.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn submesh(mesh: &IndexedMesh, faces: &[usize]) -> IndexedMesh {
    let mut remap: Vec<Option<u32>> = vec![None; mesh.vertices.len()];
    let mut vertices: Vec<Vertex> = Vec::new();
    let mut new_faces = Vec::with_capacity(faces.len());

    for &f in faces {
        let face = mesh.faces[f];
        let mut mapped = [0u32; 3];
        for (slot, &v) in mapped.iter_mut().zip(face.iter()) {
            *slot = *remap[v as usize].get_or_insert_with(|| {
                vertices.push(mesh.vertices[v as usize].clone());
                (vertices.len() - 1) as u32
            });
        }
        new_faces.push(mapped);
    }

    let mut part = IndexedMesh::from_parts(vertices, new_faces);
    if let Some(normals) = &mesh.face_normals {
        part.face_normals = Some(faces.iter().map(|&f| normals[f]).collect());
    }
    part
}
