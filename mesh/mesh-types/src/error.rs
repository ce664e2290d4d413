//! Error types for mesh structure validation.

use thiserror::Error;

/// Result type for mesh validation.
pub type MeshResult<T> = Result<T, MeshError>;

/// Structural problems that make a mesh unusable as algorithm input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// A face references a vertex index outside the vertex array.
    #[error("malformed mesh: face {face} references vertex {index} (mesh has {vertex_count} vertices)")]
    MalformedMesh {
        /// Index of the offending face.
        face: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// The mesh has faces but no vertices.
    #[error("malformed mesh: {face_count} faces but no vertices")]
    VerticesMissing {
        /// Number of faces in the mesh.
        face_count: usize,
    },

    /// Supplied face normals do not match the face count.
    #[error("malformed mesh: {actual} face normals for {expected} faces")]
    FaceNormalCount {
        /// Number of faces.
        expected: usize,
        /// Number of supplied normals.
        actual: usize,
    },
}
