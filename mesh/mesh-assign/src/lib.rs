//! Assignment of point samples to the closest of several meshes.
//!
//! Detected spots (vesicles, puncta) are matched to the nearest vertex over
//! a pooled KD-tree of all candidate meshes and classified as inside or
//! outside their owner.
//!
//! - [`SpatialIndex`] - Static nearest-neighbor index
//! - [`SurfaceAssigner`] - Pooled assignment with inside/outside classification
//! - [`AssignmentReport`] - Per-spot results and per-owner tallies, with a JSON summary
//!
//! # Example
//!
//! ```
//! use mesh_assign::{assign_spots, AssignParams, SourceMesh, Spot};
//! use mesh_types::{unit_cube, Point3};
//!
//! let nucleus = unit_cube();
//! let report = assign_spots(
//!     &[SourceMesh::new("nucleus", &nucleus)],
//!     &[Spot::new("spot.000", Point3::new(1.4, 1.3, 1.2))],
//!     &AssignParams::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(report.assignments[0].tag(), "nucleus-0");
//! assert!(report.summary_json().unwrap().contains("\"out\": 1"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod assign;
mod error;
mod index;
mod params;
mod result;

pub use assign::{SourceMesh, Spot, SurfaceAssigner, assign_spots, spots_from_scene};
pub use error::{AssignError, AssignResult};
pub use index::{NearestHit, SpatialIndex};
pub use params::AssignParams;
pub use result::{Assignment, AssignmentReport, InOutCount};
