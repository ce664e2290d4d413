//! Error types for topology operations.

use mesh_types::MeshError;
use thiserror::Error;

/// Result type for topology operations.
pub type TopologyResult<T> = Result<T, TopologyError>;

/// Errors that can occur during topology analysis.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// Input mesh failed structural validation.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Hole filling failed.
    #[error("failed to fill holes: {reason}")]
    HoleFillFailed {
        /// Reason for failure.
        reason: String,
    },
}
