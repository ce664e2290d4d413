//! Per-vertex discrete curvature for segmented cell surfaces.
//!
//! Two estimators are provided:
//!
//! - **Angular**: mean distance between incident unit face normals and the unit
//!   vertex normal, divided by `sqrt(2)`. Flat regions read zero.
//! - **Dihedral**: sum of the angles across two-face edges around a vertex,
//!   averaged over its edges. The denominator is an explicit policy
//!   ([`DihedralDenominator`]).
//!
//! Both are pure functions of the mesh. Vertices are processed in parallel
//! with rayon, and [`estimate_batch`] runs independent meshes in parallel.
//!
//! # Example
//!
//! ```
//! use mesh_types::unit_cube;
//! use mesh_curvature::{CurvatureEstimator, CurvatureParams};
//!
//! let field = CurvatureEstimator::angular()
//!     .with_params(CurvatureParams::area_weighted())
//!     .estimate(&unit_cube())
//!     .unwrap();
//!
//! println!("max curvature: {:?}", field.max());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod angular;
mod dihedral;
mod error;
mod estimator;
mod params;
mod result;

pub use angular::angular_curvature;
pub use dihedral::dihedral_curvature;
pub use error::{CurvatureError, CurvatureResult};
pub use estimator::{CurvatureEstimator, estimate_batch};
pub use params::{CurvatureParams, DihedralDenominator};
pub use result::{CurvatureField, CurvatureKind};
