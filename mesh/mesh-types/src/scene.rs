//! Named scene records and volume-based selection.
//!
//! Host editors expose loosely typed objects; analysis code receives them as
//! [`SceneObject`] values instead, with a fixed set of fields per kind.

use nalgebra::Point3;

use crate::IndexedMesh;
use crate::error::MeshResult;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named object handed over by the host.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SceneObject {
    /// A triangle mesh (nucleus, vesicle, contact surface).
    Mesh {
        /// Object name.
        name: String,
        /// Geometry in world coordinates.
        mesh: IndexedMesh,
    },
    /// A point sample such as a detected spot location.
    PointSample {
        /// Object name.
        name: String,
        /// Location in world coordinates.
        position: Point3<f64>,
    },
    /// An object carrying no geometry.
    Empty {
        /// Object name.
        name: String,
    },
}

impl SceneObject {
    /// Object name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Mesh { name, .. } | Self::PointSample { name, .. } | Self::Empty { name } => name,
        }
    }

    /// The mesh, if this is a mesh object.
    #[must_use]
    pub const fn as_mesh(&self) -> Option<&IndexedMesh> {
        match self {
            Self::Mesh { mesh, .. } => Some(mesh),
            _ => None,
        }
    }

    /// The location, if this is a point sample.
    #[must_use]
    pub const fn as_point(&self) -> Option<Point3<f64>> {
        match self {
            Self::PointSample { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// Strict numeric comparison used by selection filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CompareOp {
    /// `a > b`
    GreaterThan,
    /// `a < b`
    LessThan,
}

/// Evaluate `a <op> b`. Equality never matches.
///
/// # Example
///
/// ```
/// use mesh_types::{compare, CompareOp};
///
/// assert!(compare(CompareOp::GreaterThan, 2.0, 1.0));
/// assert!(!compare(CompareOp::LessThan, 1.0, 1.0));
/// ```
#[must_use]
pub fn compare(op: CompareOp, a: f64, b: f64) -> bool {
    match op {
        CompareOp::GreaterThan => a > b,
        CompareOp::LessThan => a < b,
    }
}

/// Names of mesh objects whose enclosed volume compares strictly against `threshold`.
///
/// Non-mesh objects are ignored. Order follows the input.
///
/// # Errors
///
/// Returns an error if any mesh object is malformed; nothing is selected then.
///
/// # Example
///
/// ```
/// use mesh_types::{select_by_volume, unit_cube, CompareOp, SceneObject};
///
/// let objects = vec![
///     SceneObject::Mesh { name: "small".into(), mesh: unit_cube() },
///     SceneObject::Empty { name: "marker".into() },
/// ];
/// let small = select_by_volume(&objects, 7.0, CompareOp::LessThan).unwrap();
/// assert_eq!(small, vec!["small"]);
/// ```
pub fn select_by_volume(
    objects: &[SceneObject],
    threshold: f64,
    op: CompareOp,
) -> MeshResult<Vec<&str>> {
    let mut selected = Vec::new();
    for obj in objects {
        let SceneObject::Mesh { name, mesh } = obj else {
            continue;
        };
        mesh.validate()?;
        if compare(op, mesh.volume(), threshold) {
            selected.push(name.as_str());
        }
    }
    Ok(selected)
}

/// Turn every mesh object into a point sample at its centroid.
///
/// Samples are named `location-<mesh name>`; meshes without vertices are skipped.
#[must_use]
pub fn point_samples_from_meshes(objects: &[SceneObject]) -> Vec<SceneObject> {
    objects
        .iter()
        .filter_map(|obj| {
            let mesh = obj.as_mesh()?;
            Some(SceneObject::PointSample {
                name: format!("location-{}", obj.name()),
                position: mesh.centroid()?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MeshError, unit_cube};

    fn scaled_cube(factor: f64) -> IndexedMesh {
        let mut cube = unit_cube();
        for v in &mut cube.vertices {
            v.position.coords *= factor;
        }
        cube
    }

    fn scene() -> Vec<SceneObject> {
        vec![
            SceneObject::Mesh {
                name: "tiny".into(),
                mesh: scaled_cube(1.0),
            },
            SceneObject::Mesh {
                name: "exact".into(),
                mesh: scaled_cube(2.0),
            },
            SceneObject::Mesh {
                name: "large".into(),
                mesh: scaled_cube(4.0),
            },
            SceneObject::PointSample {
                name: "spot".into(),
                position: Point3::origin(),
            },
        ]
    }

    #[test]
    fn threshold_is_exclusive() {
        let objects = scene();
        // "exact" has volume 8.0 and matches neither side
        assert_eq!(
            select_by_volume(&objects, 8.0, CompareOp::GreaterThan).unwrap(),
            vec!["large"]
        );
        assert_eq!(
            select_by_volume(&objects, 8.0, CompareOp::LessThan).unwrap(),
            vec!["tiny"]
        );
    }

    #[test]
    fn malformed_mesh_fails_selection() {
        let mut objects = scene();
        let mut broken = unit_cube();
        broken.faces.push([0, 1, 42]);
        objects.push(SceneObject::Mesh {
            name: "broken".into(),
            mesh: broken,
        });

        let err = select_by_volume(&objects, 1.0, CompareOp::LessThan).unwrap_err();
        assert!(matches!(
            err,
            MeshError::MalformedMesh {
                face: 12,
                index: 42,
                vertex_count: 8
            }
        ));
    }

    #[test]
    fn point_samples_ignore_non_meshes() {
        let samples = point_samples_from_meshes(&scene());
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[1].name(), "location-exact");
        let p = samples[1].as_point().unwrap();
        assert!((p.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn accessors() {
        let empty = SceneObject::Empty {
            name: "axes".into(),
        };
        assert_eq!(empty.name(), "axes");
        assert!(empty.as_mesh().is_none());
        assert!(empty.as_point().is_none());
    }
}
