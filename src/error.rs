use crate::delaunay_core::{FixedEdgeHandle, FixedTriangleHandle};
use crate::VertexId;

/// The error type used for rejected vertex coordinates.
///
/// Vertices can be checked for validity by using [crate::validate_vertex].
#[derive(Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Debug, Hash, thiserror::Error)]
pub enum InsertionError {
    /// A coordinate value was too small.
    ///
    /// The absolute value of any inserted vertex coordinate must either be zero or
    /// greater than or equal to [crate::MIN_ALLOWED_VALUE].
    #[error("coordinate too small")]
    TooSmall,

    /// A coordinate value was too large.
    ///
    /// The absolute value of any inserted vertex coordinate must be less than or equal to
    /// [crate::MAX_ALLOWED_VALUE].
    #[error("coordinate too large")]
    TooLarge,

    /// A coordinate value was NaN.
    #[error("coordinate is NaN")]
    NAN,
}

/// Every way a triangulation run or a topology operation can fail.
///
/// All failures are terminal for the current run, nothing is retried.
#[derive(Copy, Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum TriangulationError {
    /// An input vertex has a coordinate that cannot be processed.
    #[error("vertex {vertex:?} rejected: {source}")]
    InvalidCoordinate {
        /// The rejected vertex
        vertex: VertexId,
        /// Why it was rejected
        source: InsertionError,
    },

    /// Three edges that do not pairwise share exactly one vertex were used to build a triangle.
    #[error("edges {0:?} do not form a triangle")]
    InvalidTopology([FixedEdgeHandle; 3]),

    /// An edge would become adjacent to a third triangle.
    #[error("edge {0:?} already has two adjacent triangles")]
    TooManyNeighbors(FixedEdgeHandle),

    /// A circumcircle dependent operation was invoked on a triangle with collinear vertices.
    #[error("triangle has collinear vertices and no circumcircle")]
    DegenerateTriangle,

    /// A triangle was queried for an edge it does not contain.
    #[error("edge {edge:?} is not part of triangle {triangle:?}")]
    EdgeNotInTriangle {
        /// The queried edge
        edge: FixedEdgeHandle,
        /// The queried triangle
        triangle: FixedTriangleHandle,
    },

    /// The point locator could not find a triangle for an inserted vertex.
    #[error("no triangle found for vertex {0:?}")]
    LocationFailed(VertexId),

    /// An edge that should separate two triangles has only one.
    #[error("edge {0:?} is missing its second adjacent triangle")]
    MissingNeighbor(FixedEdgeHandle),

    /// The boundary of a Watson cavity could not be stitched into a closed contour.
    #[error("cavity boundary of vertex {0:?} does not form a closed contour")]
    NoClosedContour(VertexId),
}
