//! Error types for curvature estimation.

use mesh_types::MeshError;
use thiserror::Error;

/// Result type alias for curvature operations.
pub type CurvatureResult<T> = Result<T, CurvatureError>;

/// Errors that can occur during curvature estimation.
#[derive(Debug, Error)]
pub enum CurvatureError {
    /// Input mesh failed structural validation.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err: CurvatureError = MeshError::FaceNormalCount {
            expected: 12,
            actual: 3,
        }
        .into();
        assert!(format!("{err}").contains("3 face normals for 12 faces"));
    }
}
