//! Indexed triangle mesh.

use crate::{MeshError, MeshResult, Triangle, Vertex};
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How face contributions are weighted when averaging a vertex normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NormalWeighting {
    /// Weight each incident face by its interior angle at the vertex.
    ///
    /// Independent of how a planar region is triangulated.
    #[default]
    Angle,
    /// Weight each incident face by its area.
    Area,
}

/// An indexed triangle mesh.
///
/// Vertices and faces are stored separately, with faces referencing
/// vertices by index. Face normals may be supplied by the mesh source;
/// when absent they are computed from the geometry.
///
/// Analysis algorithms never mutate a mesh; operations that change
/// topology return a new `IndexedMesh`.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    pub faces: Vec<[u32; 3]>,

    /// Per-face normals supplied by the mesh source, one per face.
    pub face_normals: Option<Vec<Vector3<f64>>>,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            face_normals: None,
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
            face_normals: None,
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            faces,
            face_normals: None,
        }
    }

    /// Create a mesh from a triangle soup of positions and faces.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, Point3};
    ///
    /// let mesh = IndexedMesh::from_positions(
    ///     &[Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
    ///     vec![[0, 1, 2]],
    /// );
    /// assert_eq!(mesh.vertex_count(), 3);
    /// ```
    #[must_use]
    pub fn from_positions(positions: &[Point3<f64>], faces: Vec<[u32; 3]>) -> Self {
        Self::from_parts(positions.iter().copied().map(Vertex::new).collect(), faces)
    }

    /// Create a mesh from raw coordinate and index data.
    ///
    /// Returns an empty mesh if either array length is not divisible by 3.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::IndexedMesh;
    ///
    /// let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    /// let indices = [0, 1, 2];
    ///
    /// let mesh = IndexedMesh::from_raw(&positions, &indices);
    /// assert_eq!(mesh.vertex_count(), 3);
    /// assert_eq!(mesh.face_count(), 1);
    /// ```
    #[must_use]
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> Self {
        if positions.len() % 3 != 0 || indices.len() % 3 != 0 {
            return Self::new();
        }

        let vertices = positions
            .chunks_exact(3)
            .map(|c| Vertex::from_coords(c[0], c[1], c[2]))
            .collect();

        let faces = indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();

        Self::from_parts(vertices, faces)
    }

    /// Attach per-face normals supplied by the mesh source.
    #[must_use]
    pub fn with_face_normals(mut self, normals: Vec<Vector3<f64>>) -> Self {
        self.face_normals = Some(normals);
        self
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// True when the mesh has no vertices or no faces.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Check structural invariants.
    ///
    /// Every face index must be in range and supplied face normals must
    /// match the face count.
    ///
    /// # Errors
    ///
    /// - [`MeshError::VerticesMissing`] if there are faces but no vertices
    /// - [`MeshError::MalformedMesh`] for the first out-of-range index
    /// - [`MeshError::FaceNormalCount`] if face normals are the wrong length
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, MeshError, Vertex};
    ///
    /// let mut mesh = IndexedMesh::new();
    /// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
    /// mesh.faces.push([0, 1, 2]);
    ///
    /// assert!(matches!(mesh.validate(), Err(MeshError::MalformedMesh { index: 1, .. })));
    /// ```
    pub fn validate(&self) -> MeshResult<()> {
        if self.vertices.is_empty() && !self.faces.is_empty() {
            return Err(MeshError::VerticesMissing {
                face_count: self.faces.len(),
            });
        }

        let vertex_count = self.vertices.len();
        for (face, indices) in self.faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::MalformedMesh {
                    face,
                    index,
                    vertex_count,
                });
            }
        }

        if let Some(normals) = &self.face_normals {
            if normals.len() != self.faces.len() {
                return Err(MeshError::FaceNormalCount {
                    expected: self.faces.len(),
                    actual: normals.len(),
                });
            }
        }

        Ok(())
    }

    /// Position of a vertex.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range; call [`validate`](Self::validate) first.
    #[inline]
    #[must_use]
    pub fn position(&self, index: u32) -> Point3<f64> {
        self.vertices[index as usize].position
    }

    /// Triangle for a face with resolved positions.
    ///
    /// Returns `None` if the face index is out of bounds.
    #[must_use]
    pub fn triangle(&self, face_index: usize) -> Option<Triangle> {
        let &[i0, i1, i2] = self.faces.get(face_index)?;
        Some(Triangle::new(
            self.vertices.get(i0 as usize)?.position,
            self.vertices.get(i1 as usize)?.position,
            self.vertices.get(i2 as usize)?.position,
        ))
    }

    /// Iterate over all triangles with resolved vertex positions.
    ///
    /// Assumes a validated mesh.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces.iter().map(|&[i0, i1, i2]| {
            Triangle::new(self.position(i0), self.position(i1), self.position(i2))
        })
    }

    /// Geometric center: the mean of all vertex positions.
    ///
    /// Returns `None` for a mesh without vertices.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::unit_cube;
    ///
    /// let c = unit_cube().centroid().unwrap();
    /// assert!((c.x - 0.5).abs() < 1e-12);
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn centroid(&self) -> Option<Point3<f64>> {
        if self.vertices.is_empty() {
            return None;
        }
        let sum = self
            .vertices
            .iter()
            .fold(Vector3::zeros(), |acc, v| acc + v.position.coords);
        Some(Point3::from(sum / self.vertices.len() as f64))
    }

    /// Unit normal of every face.
    ///
    /// Supplied face normals are used (renormalized) when present; otherwise
    /// normals are computed from the winding. Degenerate faces and zero-length
    /// supplied normals yield `None`.
    #[must_use]
    pub fn unit_face_normals(&self) -> Vec<Option<Vector3<f64>>> {
        match &self.face_normals {
            Some(normals) if normals.len() == self.faces.len() => normals
                .iter()
                .map(|n| n.try_normalize(f64::EPSILON))
                .collect(),
            _ => self.triangles().map(|tri| tri.normal()).collect(),
        }
    }

    /// Unit normal of every vertex, averaged from incident faces.
    ///
    /// Vertices without incident faces, or whose weighted sum cancels out,
    /// yield `None`.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{unit_cube, NormalWeighting};
    ///
    /// let normals = unit_cube().vertex_normals(NormalWeighting::Angle);
    /// let n0 = normals[0].unwrap();
    /// // Corner (0,0,0) points diagonally outward
    /// assert!((n0.x - n0.y).abs() < 1e-12 && n0.x < 0.0);
    /// ```
    #[must_use]
    pub fn vertex_normals(&self, weighting: NormalWeighting) -> Vec<Option<Vector3<f64>>> {
        let face_normals = self.unit_face_normals();
        let mut sums = vec![Vector3::zeros(); self.vertices.len()];

        for ((face, tri), normal) in self.faces.iter().zip(self.triangles()).zip(&face_normals) {
            let Some(normal) = normal else {
                continue;
            };
            for (corner, &v) in face.iter().enumerate() {
                let weight = match weighting {
                    NormalWeighting::Angle => tri.angle_at(corner),
                    NormalWeighting::Area => tri.area(),
                };
                sums[v as usize] += normal * weight;
            }
        }

        sums.into_iter()
            .map(|n| n.try_normalize(f64::EPSILON))
            .collect()
    }

    /// Compute the signed volume of the mesh.
    ///
    /// Uses the divergence theorem: the signed volume is the sum of signed
    /// tetrahedra volumes formed by each face and the origin. Positive for a
    /// closed mesh with outward-facing normals.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        let mut volume = 0.0;

        for &[i0, i1, i2] in &self.faces {
            let v0 = self.position(i0).coords;
            let v1 = self.position(i1).coords;
            let v2 = self.position(i2).coords;
            volume += v0.dot(&v1.cross(&v2));
        }

        volume / 6.0
    }

    /// Absolute volume of the mesh.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// Total surface area.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.triangles().map(|tri| tri.area()).sum()
    }

    /// Append another mesh, offsetting its face indices.
    ///
    /// Face normals are kept only when both meshes carry them.
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: mesh indices are u32, so vertex counts > 4B are unsupported
    pub fn merge(&mut self, other: &Self) {
        let vertex_offset = self.vertices.len() as u32;

        self.vertices.extend(other.vertices.iter().cloned());
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|f| [f[0] + vertex_offset, f[1] + vertex_offset, f[2] + vertex_offset]),
        );

        self.face_normals = match (self.face_normals.take(), &other.face_normals) {
            (Some(mut mine), Some(theirs)) => {
                mine.extend(theirs.iter().copied());
                Some(mine)
            }
            _ => None,
        };
    }
}

/// Create a unit cube mesh from (0,0,0) to (1,1,1) with outward-facing normals.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.face_count(), 12);
/// ```
#[must_use]
pub fn unit_cube() -> IndexedMesh {
    let positions = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 1.0, 1.0],
    ];

    let faces = vec![
        // Bottom (z=0)
        [0, 2, 1],
        [0, 3, 2],
        // Top (z=1)
        [4, 5, 6],
        [4, 6, 7],
        // Front (y=0)
        [0, 1, 5],
        [0, 5, 4],
        // Back (y=1)
        [3, 7, 6],
        [3, 6, 2],
        // Left (x=0)
        [0, 4, 7],
        [0, 7, 3],
        // Right (x=1)
        [1, 2, 6],
        [1, 6, 5],
    ];

    IndexedMesh::from_parts(positions.into_iter().map(Vertex::from).collect(), faces)
}
