//! Nearest-surface spot assignment.
//!
//! All source mesh vertices are pooled into one [`SpatialIndex`]; a lookup
//! table maps each indexed vertex back to its mesh. For a spot `p` with
//! closest vertex `c` on an owner with center `o`, the spot is inside iff
//! `normalize(c - o) · normalize(p - c) <= 0`.
//!
//! The test treats `c - o` as the outward normal at `c`, which holds for
//! star-shaped owners such as nuclei and vesicles. Strongly concave owners
//! can be misclassified.

use mesh_types::{IndexedMesh, Point3, SceneObject};
use tracing::{debug, info, warn};

use crate::error::{AssignError, AssignResult};
use crate::index::SpatialIndex;
use crate::params::AssignParams;
use crate::result::{Assignment, AssignmentReport};

/// A candidate owner mesh.
#[derive(Debug, Clone, Copy)]
pub struct SourceMesh<'a> {
    /// Owner name used in tags and the summary.
    pub name: &'a str,
    /// Geometry in world coordinates.
    pub mesh: &'a IndexedMesh,
    /// Reference point for the outward direction. Defaults to the vertex mean.
    pub origin: Option<Point3<f64>>,
}

impl<'a> SourceMesh<'a> {
    /// Source centered on its vertex mean.
    #[must_use]
    pub const fn new(name: &'a str, mesh: &'a IndexedMesh) -> Self {
        Self {
            name,
            mesh,
            origin: None,
        }
    }

    /// Use an explicit reference point, such as the host object location.
    #[must_use]
    pub const fn with_origin(mut self, origin: Point3<f64>) -> Self {
        self.origin = Some(origin);
        self
    }
}

/// A query point with a stable external id.
#[derive(Debug, Clone, PartialEq)]
pub struct Spot {
    /// External identifier.
    pub id: String,
    /// Location in world coordinates.
    pub position: Point3<f64>,
}

impl Spot {
    /// Create a spot.
    #[must_use]
    pub fn new(id: impl Into<String>, position: Point3<f64>) -> Self {
        Self {
            id: id.into(),
            position,
        }
    }
}

/// Spots for every point sample in `objects`, in order.
#[must_use]
pub fn spots_from_scene(objects: &[SceneObject]) -> Vec<Spot> {
    objects
        .iter()
        .filter_map(|obj| obj.as_point().map(|p| Spot::new(obj.name(), p)))
        .collect()
}

/// Assigns spots to the closest of a fixed set of meshes.
///
/// # Example
///
/// ```
/// use mesh_assign::{SourceMesh, Spot, SurfaceAssigner};
/// use mesh_types::{unit_cube, Point3};
///
/// let cube = unit_cube();
/// let assigner = SurfaceAssigner::new(&[SourceMesh::new("nucleus", &cube)]).unwrap();
///
/// let report = assigner
///     .assign(&[
///         Spot::new("a", Point3::new(0.6, 0.55, 0.45)),
///         Spot::new("b", Point3::new(-0.5, -0.4, -0.3)),
///     ])
///     .unwrap();
///
/// assert_eq!(report.count_for("nucleus").inside, 1);
/// assert_eq!(report.count_for("nucleus").outside, 1);
/// assert_eq!(report.assignments[1].tag(), "nucleus-1");
/// ```
#[derive(Debug, Clone)]
pub struct SurfaceAssigner {
    index: SpatialIndex,
    owners: Vec<usize>,
    names: Vec<String>,
    centers: Vec<Point3<f64>>,
    params: AssignParams,
}

impl SurfaceAssigner {
    /// Pool the vertices of `sources` with default parameters.
    ///
    /// # Errors
    ///
    /// See [`with_params`](Self::with_params).
    pub fn new(sources: &[SourceMesh<'_>]) -> AssignResult<Self> {
        Self::with_params(sources, AssignParams::default())
    }

    /// Pool the vertices of `sources`.
    ///
    /// # Errors
    ///
    /// Returns [`AssignError::Mesh`] if a source fails validation and
    /// [`AssignError::NoCandidateMeshes`] if no source has a vertex.
    pub fn with_params(sources: &[SourceMesh<'_>], params: AssignParams) -> AssignResult<Self> {
        let total: usize = sources.iter().map(|s| s.mesh.vertices.len()).sum();
        let mut points = Vec::with_capacity(total);
        let mut owners = Vec::with_capacity(total);
        let mut names = Vec::with_capacity(sources.len());
        let mut centers = Vec::with_capacity(sources.len());

        for (owner, source) in sources.iter().enumerate() {
            source.mesh.validate()?;
            points.extend(source.mesh.vertices.iter().map(|v| v.position));
            owners.resize(points.len(), owner);
            names.push(source.name.to_string());
            centers.push(
                source
                    .origin
                    .or_else(|| source.mesh.centroid())
                    .unwrap_or_else(Point3::origin),
            );
        }

        if points.is_empty() {
            return Err(AssignError::NoCandidateMeshes);
        }
        let index = SpatialIndex::with_capacity(&points, points.len())?;

        debug!(
            sources = sources.len(),
            vertices = points.len(),
            "pooled source vertices"
        );

        Ok(Self {
            index,
            owners,
            names,
            centers,
            params,
        })
    }

    /// Pool every mesh object in `objects`; other kinds are ignored.
    ///
    /// # Errors
    ///
    /// See [`with_params`](Self::with_params).
    pub fn from_scene(objects: &[SceneObject], params: AssignParams) -> AssignResult<Self> {
        let sources: Vec<SourceMesh<'_>> = objects
            .iter()
            .filter_map(|obj| obj.as_mesh().map(|mesh| SourceMesh::new(obj.name(), mesh)))
            .collect();
        Self::with_params(&sources, params)
    }

    /// Number of source meshes.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.names.len()
    }

    /// Number of pooled vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.index.len()
    }

    /// Parameters in use.
    #[must_use]
    pub const fn params(&self) -> &AssignParams {
        &self.params
    }

    /// Assign `spot` to its closest source.
    ///
    /// `rank` is recorded on the result and used by [`Assignment::tag`].
    /// Returns `None` if the spot is beyond `max_distance`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pooled index cannot be queried.
    pub fn assign_one(&self, spot: &Spot, rank: usize) -> AssignResult<Option<Assignment>> {
        let hit = self.index.query_nearest(&spot.position)?;
        if self.params.max_distance.is_some_and(|max| hit.distance > max) {
            return Ok(None);
        }

        let owner = self.owners[hit.id];
        let center = self.centers[owner];
        let eps = self.params.degenerate_epsilon;

        let outward = (hit.point - center).try_normalize(eps);
        let toward = (spot.position - hit.point).try_normalize(eps);
        let (inside, degenerate) = match (outward, toward) {
            (Some(v1), Some(v2)) => (v1.dot(&v2) <= 0.0, false),
            _ => {
                warn!(
                    spot = %spot.id,
                    owner = %self.names[owner],
                    "zero-length classification direction, treating spot as inside"
                );
                (true, true)
            }
        };

        Ok(Some(Assignment {
            spot_id: spot.id.clone(),
            rank,
            owner,
            owner_name: self.names[owner].clone(),
            inside,
            distance: hit.distance,
            degenerate,
        }))
    }

    /// Assign every spot; ranks follow the input order.
    ///
    /// An empty spot list gives an empty report.
    ///
    /// # Errors
    ///
    /// Returns an error if the pooled index cannot be queried.
    pub fn assign(&self, spots: &[Spot]) -> AssignResult<AssignmentReport> {
        let mut report = AssignmentReport::default();

        for (rank, spot) in spots.iter().enumerate() {
            match self.assign_one(spot, rank)? {
                Some(assignment) => report.push(assignment),
                None => report.unassigned.push(spot.id.clone()),
            }
        }

        info!(
            spots = spots.len(),
            inside = report.inside_count(),
            outside = report.outside_count(),
            unassigned = report.unassigned.len(),
            degenerate = report.degenerate_count(),
            "assigned spots"
        );

        Ok(report)
    }
}

/// Build a [`SurfaceAssigner`] over `sources` and assign `spots`.
///
/// # Errors
///
/// See [`SurfaceAssigner::with_params`].
pub fn assign_spots(
    sources: &[SourceMesh<'_>],
    spots: &[Spot],
    params: &AssignParams,
) -> AssignResult<AssignmentReport> {
    SurfaceAssigner::with_params(sources, params.clone())?.assign(spots)
}
