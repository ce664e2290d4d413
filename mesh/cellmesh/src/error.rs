//! Error types for the shell analysis pipeline.

use mesh_curvature::CurvatureError;
use mesh_topology::TopologyError;
use mesh_types::MeshError;
use thiserror::Error;

/// Result type for pipeline operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors raised by [`analyze_shells`](crate::analyze_shells).
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input mesh failed structural validation.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Splitting, tracing or hole filling failed.
    #[error(transparent)]
    Topology(#[from] TopologyError),

    /// Curvature estimation failed.
    #[error(transparent)]
    Curvature(#[from] CurvatureError),

    /// JSON serialization failed.
    #[error("failed to serialize summary: {0}")]
    Summary(#[from] serde_json::Error),
}
