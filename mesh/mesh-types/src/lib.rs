//! Core mesh types for cellmesh.
//!
//! This crate provides the data model shared by every analysis crate:
//!
//! - [`Vertex`] - A point in 3D space with an optional normal
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices and optional face normals
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`SceneObject`] - Typed record for named host objects (meshes, point samples, empties)
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`. Microscopy
//! meshes are usually expressed in micrometers.
//!
//! # Winding
//!
//! Face winding is **counter-clockwise (CCW) when viewed from outside**.
//! Normals point outward by the right-hand rule.
//!
//! # Example
//!
//! ```
//! use mesh_types::{IndexedMesh, Vertex, Point3};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::new(Point3::new(0.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(1.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(0.5, 1.0, 0.0)));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert!(mesh.validate().is_ok());
//! assert_eq!(mesh.face_count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod mesh;
mod scene;
mod triangle;
mod vertex;

pub use error::{MeshError, MeshResult};
pub use mesh::{IndexedMesh, NormalWeighting, unit_cube};
pub use scene::{CompareOp, SceneObject, compare, point_samples_from_meshes, select_by_volume};
pub use triangle::Triangle;
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
