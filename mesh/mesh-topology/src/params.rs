//! Configuration for the topology operations.

/// Built-in rules for choosing the next vertex of a boundary walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TraceStrategy {
    /// [`MostIsolated`](crate::MostIsolated).
    #[default]
    MostIsolated,
    /// [`FewestNeighbors`](crate::FewestNeighbors).
    FewestNeighbors,
    /// [`AvoidSeed`](crate::AvoidSeed).
    AvoidSeed,
}

/// Parameters for boundary tracing.
///
/// # Example
///
/// ```
/// use mesh_topology::{TraceParams, TraceStrategy};
///
/// let params = TraceParams::default().with_strategy(TraceStrategy::FewestNeighbors);
/// assert_eq!(params.strategy, TraceStrategy::FewestNeighbors);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceParams {
    /// Step rule for the walk.
    ///
    /// Default: [`TraceStrategy::MostIsolated`]
    pub strategy: TraceStrategy,
}

impl TraceParams {
    /// Set the step rule.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: TraceStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Parameters for hole filling.
///
/// # Example
///
/// ```
/// use mesh_topology::FillParams;
///
/// let params = FillParams::default().with_max_hole_edges(64);
/// assert_eq!(params.max_hole_edges, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillParams {
    /// Loops with more edges than this are left open.
    ///
    /// Default: `1000`
    pub max_hole_edges: usize,

    /// How loops are traced before filling.
    pub trace: TraceParams,
}

impl Default for FillParams {
    fn default() -> Self {
        Self {
            max_hole_edges: 1000,
            trace: TraceParams {
                strategy: TraceStrategy::MostIsolated,
            },
        }
    }
}

impl FillParams {
    /// Only close small punctures left by segmentation, up to 32 edges.
    #[must_use]
    pub fn small_holes() -> Self {
        Self {
            max_hole_edges: 32,
            ..Default::default()
        }
    }

    /// Set the largest loop that will be filled.
    #[must_use]
    pub const fn with_max_hole_edges(mut self, max_hole_edges: usize) -> Self {
        self.max_hole_edges = max_hole_edges;
        self
    }

    /// Set the tracing parameters.
    #[must_use]
    pub const fn with_trace(mut self, trace: TraceParams) -> Self {
        self.trace = trace;
        self
    }
}

/// Parameters for Laplacian smoothing.
///
/// # Example
///
/// ```
/// use mesh_topology::SmoothParams;
///
/// let params = SmoothParams::default().with_iterations(10).preserving_boundary();
/// assert_eq!(params.iterations, 10);
/// assert!(params.preserve_boundary);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothParams {
    /// Number of passes.
    ///
    /// Default: `5`
    pub iterations: u32,

    /// Fraction of the way each vertex moves toward its neighbor centroid per pass.
    ///
    /// Default: `0.5`
    pub lambda: f64,

    /// Keep exterior vertices fixed so open rims do not pull inward.
    ///
    /// Default: `false`
    pub preserve_boundary: bool,
}

impl Default for SmoothParams {
    fn default() -> Self {
        Self {
            iterations: 5,
            lambda: 0.5,
            preserve_boundary: false,
        }
    }
}

impl SmoothParams {
    /// Set the number of passes.
    #[must_use]
    pub const fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the step factor.
    #[must_use]
    pub const fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    /// Keep exterior vertices in place.
    #[must_use]
    pub const fn preserving_boundary(mut self) -> Self {
        self.preserve_boundary = true;
        self
    }
}

/// Parameters for contact-surface extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlattenParams {
    /// Minimum cosine between a vertex normal and the direction to the
    /// reference point for the vertex to count as facing it.
    ///
    /// Default: `1e-6`
    pub facing_threshold: f64,

    /// Distance the reference point is pushed along the mean normal when no
    /// vertex faces the centroid.
    ///
    /// Default: `0.2`
    pub nudge: f64,
}

impl Default for FlattenParams {
    fn default() -> Self {
        Self {
            facing_threshold: 1e-6,
            nudge: 0.2,
        }
    }
}

impl FlattenParams {
    /// Set the facing threshold.
    #[must_use]
    pub const fn with_facing_threshold(mut self, threshold: f64) -> Self {
        self.facing_threshold = threshold;
        self
    }

    /// Set the fallback nudge distance. Zero disables the fallback.
    #[must_use]
    pub const fn with_nudge(mut self, nudge: f64) -> Self {
        self.nudge = nudge;
        self
    }
}
