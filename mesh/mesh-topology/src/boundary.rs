//! Boundary loop (hole) tracing over exterior vertices.
//!
//! Exterior vertices are partitioned into ordered walks. Each unused exterior
//! vertex, in ascending index order, seeds a walk; the walk repeatedly steps to
//! an exterior neighbor that is not yet part of the current walk, chosen by a
//! [`NextVertexStrategy`]. Vertices of a finished walk are marked used and are
//! never chosen as seeds again, though later walks may still pass through them.
//!
//! The greedy walk has no global optimality guarantee: on branching,
//! non-manifold or figure-eight boundaries loops may be split or merged.
//!
//! # Example
//!
//! ```
//! use mesh_types::IndexedMesh;
//! use mesh_topology::BoundaryTracer;
//!
//! // Flat open square
//! let mesh = IndexedMesh::from_raw(
//!     &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
//!     &[0, 1, 2, 0, 2, 3],
//! );
//!
//! let report = BoundaryTracer::new().trace_mesh(&mesh).unwrap();
//! assert_eq!(report.hole_count(), 1);
//! assert_eq!(report.loops[0].vertices, vec![0, 1, 2, 3]);
//! ```

use mesh_types::IndexedMesh;
use tracing::{debug, info, warn};

use crate::error::TopologyResult;
use crate::graph::TopologyGraph;
use crate::params::{TraceParams, TraceStrategy};

/// An ordered walk of exterior vertices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryLoop {
    /// Ordered list of vertex indices forming the walk.
    pub vertices: Vec<u32>,
    /// Whether the last vertex shares an edge with the first.
    pub closed: bool,
}

impl BoundaryLoop {
    /// Number of edges (and vertices) in the loop.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.vertices.len()
    }

    /// Check if this loop can bound a polygon.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= 3
    }

    /// A lone exterior vertex with no walkable neighbor.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() == 1
    }
}

/// All loops found in one mesh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundaryReport {
    /// Loops in seed order.
    pub loops: Vec<BoundaryLoop>,
    /// Number of exterior vertices in the mesh.
    pub exterior_count: usize,
}

impl BoundaryReport {
    /// Number of loops, degenerate ones included.
    #[must_use]
    pub fn hole_count(&self) -> usize {
        self.loops.len()
    }

    /// Number of single-vertex loops.
    #[must_use]
    pub fn degenerate_count(&self) -> usize {
        self.loops.iter().filter(|l| l.is_degenerate()).count()
    }

    /// Loops whose ends are joined by an edge.
    pub fn closed_loops(&self) -> impl Iterator<Item = &BoundaryLoop> {
        self.loops.iter().filter(|l| l.closed)
    }

    /// Plain vertex index lists, suitable for serialization.
    #[must_use]
    pub fn to_index_lists(&self) -> Vec<Vec<u32>> {
        self.loops.iter().map(|l| l.vertices.clone()).collect()
    }
}

/// Read-only view of the walk state handed to a [`NextVertexStrategy`].
#[derive(Debug, Clone, Copy)]
pub struct TraceContext<'a> {
    graph: &'a TopologyGraph,
    seed: u32,
    exterior: &'a [bool],
    used: &'a [bool],
    in_loop: &'a [bool],
}

impl<'a> TraceContext<'a> {
    /// The adjacency graph being walked.
    #[must_use]
    pub const fn graph(&self) -> &'a TopologyGraph {
        self.graph
    }

    /// First vertex of the loop being walked.
    #[must_use]
    pub const fn seed(&self) -> u32 {
        self.seed
    }

    /// Whether `v` shares an edge with the seed.
    #[must_use]
    pub fn touches_seed(&self, v: u32) -> bool {
        self.graph.neighbors(v).binary_search(&self.seed).is_ok()
    }

    /// Whether `v` is an exterior vertex.
    #[must_use]
    pub fn is_exterior(&self, v: u32) -> bool {
        self.exterior.get(v as usize).copied().unwrap_or(false)
    }

    /// Whether `v` belongs to a previously finished loop.
    #[must_use]
    pub fn is_used(&self, v: u32) -> bool {
        self.used.get(v as usize).copied().unwrap_or(false)
    }

    /// Whether `v` is already part of the loop being walked.
    #[must_use]
    pub fn in_current_loop(&self, v: u32) -> bool {
        self.in_loop.get(v as usize).copied().unwrap_or(false)
    }

    /// Exterior neighbors of `v` that are neither used nor in the current loop.
    #[must_use]
    pub fn remaining_exterior_neighbors(&self, v: u32) -> usize {
        self.graph
            .neighbors(v)
            .iter()
            .filter(|&&n| self.is_exterior(n) && !self.is_used(n) && !self.in_current_loop(n))
            .count()
    }
}

/// Chooses the next vertex of a boundary walk.
pub trait NextVertexStrategy {
    /// Pick one of `candidates` (non-empty, ascending), or `None` to stop the walk.
    fn next_vertex(&self, candidates: &[u32], ctx: &TraceContext<'_>) -> Option<u32>;
}

/// Step to the candidate with the fewest remaining exterior neighbors.
///
/// Dead-end branches are closed before ambiguous junctions. Ties go to the
/// smallest vertex index.
#[derive(Debug, Clone, Copy, Default)]
pub struct MostIsolated;

impl NextVertexStrategy for MostIsolated {
    fn next_vertex(&self, candidates: &[u32], ctx: &TraceContext<'_>) -> Option<u32> {
        candidates
            .iter()
            .copied()
            .min_by_key(|&v| (ctx.remaining_exterior_neighbors(v), v))
    }
}

/// [`MostIsolated`], but ties prefer vertices that do not touch the seed.
///
/// The step back next to the seed is postponed, so rims whose corners sit
/// between two equally isolated neighbors still close.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvoidSeed;

impl NextVertexStrategy for AvoidSeed {
    fn next_vertex(&self, candidates: &[u32], ctx: &TraceContext<'_>) -> Option<u32> {
        candidates
            .iter()
            .copied()
            .min_by_key(|&v| (ctx.remaining_exterior_neighbors(v), ctx.touches_seed(v), v))
    }
}

/// Step to the candidate with the fewest graph neighbors overall.
///
/// Ties go to the smallest vertex index.
#[derive(Debug, Clone, Copy, Default)]
pub struct FewestNeighbors;

impl NextVertexStrategy for FewestNeighbors {
    fn next_vertex(&self, candidates: &[u32], ctx: &TraceContext<'_>) -> Option<u32> {
        candidates
            .iter()
            .copied()
            .min_by_key(|&v| (ctx.graph().neighbors(v).len(), v))
    }
}

/// Traces boundary loops with a pluggable step strategy.
#[derive(Debug, Clone, Default)]
pub struct BoundaryTracer<S = MostIsolated> {
    strategy: S,
}

impl BoundaryTracer<MostIsolated> {
    /// Tracer using the [`MostIsolated`] rule.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            strategy: MostIsolated,
        }
    }
}

impl<S: NextVertexStrategy> BoundaryTracer<S> {
    /// Tracer using a custom strategy.
    #[must_use]
    pub const fn with_strategy(strategy: S) -> Self {
        Self { strategy }
    }

    /// Validate a mesh, build its graph and trace its loops.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh is malformed.
    pub fn trace_mesh(&self, mesh: &IndexedMesh) -> TopologyResult<BoundaryReport> {
        let graph = TopologyGraph::from_mesh(mesh)?;
        Ok(self.trace(&graph))
    }

    /// Trace loops over a prebuilt graph.
    #[must_use]
    pub fn trace(&self, graph: &TopologyGraph) -> BoundaryReport {
        let exterior = graph.exterior_vertices();
        let seeds = graph.exterior_indices();
        let n = graph.vertex_count();

        debug!("Found {} exterior vertices", seeds.len());

        let mut used = vec![false; n];
        let mut in_loop = vec![false; n];
        let mut loops = Vec::new();

        for &seed in &seeds {
            if used[seed as usize] {
                continue;
            }

            let mut walk = vec![seed];
            in_loop[seed as usize] = true;
            let mut current = seed;

            loop {
                let candidates: Vec<u32> = graph
                    .neighbors(current)
                    .iter()
                    .copied()
                    .filter(|&v| exterior[v as usize] && !in_loop[v as usize])
                    .collect();
                if candidates.is_empty() {
                    break;
                }

                let ctx = TraceContext {
                    graph,
                    seed,
                    exterior: &exterior,
                    used: &used,
                    in_loop: &in_loop,
                };
                let Some(next) = self.strategy.next_vertex(&candidates, &ctx) else {
                    break;
                };
                if !candidates.contains(&next) {
                    warn!(
                        "Strategy picked vertex {} outside the {} candidates of {}",
                        next,
                        candidates.len(),
                        current
                    );
                    break;
                }

                walk.push(next);
                in_loop[next as usize] = true;
                current = next;
            }

            let closed = walk.len() >= 3 && graph.neighbors(current).contains(&seed);
            if walk.len() == 1 {
                warn!("Exterior vertex {} has no walkable neighbor", seed);
            } else if !closed {
                warn!("Boundary walk starting at vertex {} is not closed", seed);
            }

            for &v in &walk {
                used[v as usize] = true;
                in_loop[v as usize] = false;
            }
            loops.push(BoundaryLoop {
                vertices: walk,
                closed,
            });
        }

        let report = BoundaryReport {
            loops,
            exterior_count: seeds.len(),
        };

        info!(
            "Detected {} boundary loops ({} degenerate), sizes: {:?}",
            report.hole_count(),
            report.degenerate_count(),
            report
                .loops
                .iter()
                .map(BoundaryLoop::edge_count)
                .collect::<Vec<_>>()
        );

        report
    }
}

/// Exterior flag for every vertex of a mesh.
///
/// # Errors
///
/// Returns an error if the mesh is malformed.
pub fn exterior_vertices(mesh: &IndexedMesh) -> TopologyResult<Vec<bool>> {
    Ok(TopologyGraph::from_mesh(mesh)?.exterior_vertices())
}

/// Trace boundary loops with the default [`MostIsolated`] rule.
///
/// # Errors
///
/// Returns an error if the mesh is malformed.
pub fn detect_holes(mesh: &IndexedMesh) -> TopologyResult<BoundaryReport> {
    BoundaryTracer::new().trace_mesh(mesh)
}

/// Trace boundary loops using the rule named in `params`.
///
/// # Errors
///
/// Returns an error if the mesh is malformed.
pub fn detect_holes_with(mesh: &IndexedMesh, params: &TraceParams) -> TopologyResult<BoundaryReport> {
    let graph = TopologyGraph::from_mesh(mesh)?;
    Ok(trace_graph(&graph, params))
}

pub(crate) fn trace_graph(graph: &TopologyGraph, params: &TraceParams) -> BoundaryReport {
    match params.strategy {
        TraceStrategy::MostIsolated => BoundaryTracer::new().trace(graph),
        TraceStrategy::FewestNeighbors => BoundaryTracer::with_strategy(FewestNeighbors).trace(graph),
        TraceStrategy::AvoidSeed => BoundaryTracer::with_strategy(AvoidSeed).trace(graph),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::unit_cube;

    fn open_box_mesh() -> IndexedMesh {
        // Unit box missing its top face (square hole at z=1)
        let mut mesh = unit_cube();
        mesh.faces.retain(|f| *f != [4, 5, 6] && *f != [4, 6, 7]);
        mesh
    }

    fn flat_square() -> IndexedMesh {
        IndexedMesh::from_raw(
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
            &[0, 1, 2, 0, 2, 3],
        )
    }

    /// 3x3 vertex grid, 8 triangles; centre vertex 4 is interior.
    fn grid_patch() -> IndexedMesh {
        let mut positions = Vec::new();
        for y in 0..3 {
            for x in 0..3 {
                positions.extend([f64::from(x), f64::from(y), 0.0]);
            }
        }
        let mut indices = Vec::new();
        for y in 0..2u32 {
            for x in 0..2u32 {
                let a = y * 3 + x;
                indices.extend([a, a + 1, a + 4, a, a + 4, a + 3]);
            }
        }
        IndexedMesh::from_raw(&positions, &indices)
    }

    #[test]
    fn closed_cube_has_no_loops() {
        let report = detect_holes(&unit_cube()).unwrap();
        assert_eq!(report.hole_count(), 0);
        assert_eq!(report.exterior_count, 0);
    }

    #[test]
    fn flat_square_is_one_loop() {
        let report = detect_holes(&flat_square()).unwrap();
        assert_eq!(report.hole_count(), 1);
        assert_eq!(report.loops[0].vertices, vec![0, 1, 2, 3]);
        assert!(report.loops[0].closed);
        assert_eq!(report.degenerate_count(), 0);
    }

    #[test]
    fn open_box_rim() {
        let mesh = open_box_mesh();
        assert_eq!(
            exterior_vertices(&mesh).unwrap(),
            vec![false, false, false, false, true, true, true, true]
        );

        let report = detect_holes(&mesh).unwrap();
        assert_eq!(report.hole_count(), 1);
        assert_eq!(report.loops[0].vertices, vec![4, 5, 6, 7]);
        assert!(report.loops[0].closed);
    }

    #[test]
    fn grid_perimeter_excludes_centre() {
        let report = detect_holes(&grid_patch()).unwrap();
        assert_eq!(report.exterior_count, 8);
        assert_eq!(report.hole_count(), 1);
        let walk = &report.loops[0].vertices;
        assert_eq!(walk.len(), 8);
        assert!(!walk.contains(&4));
    }

    #[test]
    fn two_separate_holes() {
        let mut mesh = flat_square();
        let mut other = flat_square();
        for v in &mut other.vertices {
            v.position.x += 10.0;
        }
        mesh.merge(&other);

        let report = detect_holes(&mesh).unwrap();
        assert_eq!(report.to_index_lists(), vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7]]);
        assert_eq!(report.closed_loops().count(), 2);
    }

    /// Reports every candidate as a dead end.
    struct Refuse;

    impl NextVertexStrategy for Refuse {
        fn next_vertex(&self, _: &[u32], _: &TraceContext<'_>) -> Option<u32> {
            None
        }
    }

    #[test]
    fn refusing_strategy_yields_degenerate_loops() {
        let graph = TopologyGraph::from_mesh(&flat_square()).unwrap();
        let report = BoundaryTracer::with_strategy(Refuse).trace(&graph);
        assert_eq!(report.hole_count(), 4);
        assert_eq!(report.degenerate_count(), 4);
        assert!(report.loops.iter().all(|l| !l.closed));
    }

    /// Always proposes a vertex that is not a candidate.
    struct Rogue;

    impl NextVertexStrategy for Rogue {
        fn next_vertex(&self, _: &[u32], _: &TraceContext<'_>) -> Option<u32> {
            Some(u32::MAX)
        }
    }

    #[test]
    fn out_of_candidate_choice_stops_walk() {
        let graph = TopologyGraph::from_mesh(&flat_square()).unwrap();
        let report = BoundaryTracer::with_strategy(Rogue).trace(&graph);
        assert!(report.loops.iter().all(BoundaryLoop::is_degenerate));
    }

    #[test]
    fn grid_walk_order() {
        // At vertex 7 both 3 and 6 have one remaining neighbor; the smaller
        // index wins and the walk strands at corner 6.
        let graph = TopologyGraph::from_mesh(&grid_patch()).unwrap();
        let report = BoundaryTracer::new().trace(&graph);
        assert_eq!(report.hole_count(), 1);
        assert_eq!(report.loops[0].vertices, vec![0, 1, 2, 5, 8, 7, 3, 6]);
        assert!(!report.loops[0].closed);
    }

    #[test]
    fn avoid_seed_closes_grid_rim() {
        let graph = TopologyGraph::from_mesh(&grid_patch()).unwrap();
        let report = BoundaryTracer::with_strategy(AvoidSeed).trace(&graph);
        assert_eq!(report.hole_count(), 1);
        assert_eq!(report.loops[0].vertices, vec![0, 1, 2, 5, 8, 7, 6, 3]);
        assert!(report.loops[0].closed);

        let params = TraceParams::default().with_strategy(TraceStrategy::AvoidSeed);
        let report = detect_holes_with(&grid_patch(), &params).unwrap();
        assert_eq!(report.closed_loops().count(), 1);
    }

    #[test]
    fn avoid_seed_matches_default_on_simple_rims() {
        let tracer = BoundaryTracer::with_strategy(AvoidSeed);
        let square = tracer.trace_mesh(&flat_square()).unwrap();
        assert_eq!(square.to_index_lists(), vec![vec![0, 1, 2, 3]]);
        let open_box = tracer.trace_mesh(&open_box_mesh()).unwrap();
        assert_eq!(open_box.to_index_lists(), vec![vec![4, 5, 6, 7]]);
    }

    #[test]
    fn degree_strategy_traces_grid() {
        let graph = TopologyGraph::from_mesh(&grid_patch()).unwrap();
        let report = BoundaryTracer::with_strategy(FewestNeighbors).trace(&graph);
        assert_eq!(report.hole_count(), 1);
        assert_eq!(report.loops[0].vertices, vec![0, 1, 2, 5, 8, 7, 6, 3]);
        assert!(report.loops[0].closed);
    }

    #[test]
    fn context_exposes_walk_state() {
        struct Inspect;

        impl NextVertexStrategy for Inspect {
            fn next_vertex(&self, candidates: &[u32], ctx: &TraceContext<'_>) -> Option<u32> {
                assert!(ctx.in_current_loop(ctx.seed()));
                assert!(candidates.iter().all(|&c| ctx.is_exterior(c)));
                assert!(candidates.iter().all(|&c| !ctx.in_current_loop(c)));
                candidates.first().copied()
            }
        }

        let graph = TopologyGraph::from_mesh(&grid_patch()).unwrap();
        let report = BoundaryTracer::with_strategy(Inspect).trace(&graph);
        assert!(!report.loops.is_empty());
    }

    #[test]
    fn params_select_strategy() {
        let params = TraceParams::default().with_strategy(TraceStrategy::FewestNeighbors);
        let report = detect_holes_with(&open_box_mesh(), &params).unwrap();
        assert_eq!(report.to_index_lists(), vec![vec![4, 5, 6, 7]]);
    }

    #[test]
    fn malformed_mesh_is_rejected() {
        let mut mesh = flat_square();
        mesh.faces.push([0, 1, 10]);
        assert!(detect_holes(&mesh).is_err());
    }

    #[test]
    fn loop_validity() {
        let valid = BoundaryLoop {
            vertices: vec![0, 1, 2],
            closed: true,
        };
        assert!(valid.is_valid());
        assert_eq!(valid.edge_count(), 3);

        let single = BoundaryLoop {
            vertices: vec![7],
            closed: false,
        };
        assert!(!single.is_valid());
        assert!(single.is_degenerate());
    }
}
