//! Error types for spot assignment.

use mesh_types::MeshError;
use thiserror::Error;

/// Result type for assignment operations.
pub type AssignResult<T> = Result<T, AssignError>;

/// Errors that can occur while indexing points or assigning spots.
#[derive(Debug, Error)]
pub enum AssignError {
    /// Declared index capacity is zero or does not match the point count.
    #[error("invalid index capacity {capacity} for {points} points")]
    InvalidCapacity {
        /// Declared capacity.
        capacity: usize,
        /// Number of points supplied.
        points: usize,
    },

    /// Nearest-neighbor query on an index without points.
    #[error("spatial index is empty")]
    EmptyIndex,

    /// No source mesh contributes a vertex.
    #[error("no candidate meshes to assign spots to")]
    NoCandidateMeshes,

    /// A source mesh failed structural validation.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// JSON serialization failed.
    #[error("failed to serialize summary: {0}")]
    Summary(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_display() {
        let err = AssignError::InvalidCapacity {
            capacity: 0,
            points: 12,
        };
        assert_eq!(format!("{err}"), "invalid index capacity 0 for 12 points");
    }

    #[test]
    fn mesh_error_is_transparent() {
        let err: AssignError = MeshError::VerticesMissing { face_count: 1 }.into();
        assert!(matches!(err, AssignError::Mesh(_)));
        assert_eq!(format!("{err}"), "malformed mesh: 1 faces but no vertices");
    }
}
