//! Mesh connectivity analysis for segmented cell surfaces.
//!
//! This crate provides tools for:
//! - Vertex, edge and face adjacency ([`TopologyGraph`])
//! - Exterior (open boundary) vertex classification
//! - Boundary loop tracing with a pluggable step rule ([`BoundaryTracer`])
//! - Connected component splitting
//! - Hole filling by ear clipping
//! - Vertex welding
//! - Laplacian smoothing
//! - Contact-surface extraction ([`flatten`])
//!
//! All operations take meshes by reference and return new values.
//!
//! # Example
//!
//! ```
//! use mesh_types::unit_cube;
//! use mesh_topology::{detect_holes, split_into_components, TopologyGraph};
//!
//! let cube = unit_cube();
//!
//! let graph = TopologyGraph::from_mesh(&cube).unwrap();
//! assert!(graph.is_watertight());
//!
//! assert_eq!(detect_holes(&cube).unwrap().hole_count(), 0);
//! assert_eq!(split_into_components(&cube).unwrap().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod boundary;
pub mod components;
mod error;
mod flatten;
mod graph;
pub mod holes;
mod params;
mod smooth;
mod weld;

pub use boundary::{
    AvoidSeed, BoundaryLoop, BoundaryReport, BoundaryTracer, FewestNeighbors, MostIsolated,
    NextVertexStrategy, TraceContext, detect_holes, detect_holes_with, exterior_vertices,
};
pub use components::{
    ComponentAnalysis, find_connected_components, keep_largest_component, label_components,
    split_into_components,
};
pub use error::{TopologyError, TopologyResult};
pub use flatten::{FlattenOutcome, flatten, vertices_facing};
pub use graph::TopologyGraph;
pub use holes::{FillOutcome, fill_hole_ear_clipping, fill_holes};
pub use params::{FillParams, FlattenParams, SmoothParams, TraceParams, TraceStrategy};
pub use smooth::{SmoothOutcome, smooth_laplacian};
pub use weld::{WeldOutcome, weld_vertices};
