use smallvec::SmallVec;

use super::math;
use super::{FixedEdgeHandle, FixedTriangleHandle, FixedVertexHandle, LineSideInfo};
use crate::{BoundingRect, Point2, TriangulationError};

/// Implicit line equation `a * x + b * y + c = 0` of an edge.
///
/// The equation is normalized such that `a² + b² = 1`, evaluating it yields the signed
/// distance of a point to the line.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct LineEquation {
    /// Coefficient of `x`
    pub a: f64,
    /// Coefficient of `y`
    pub b: f64,
    /// Constant term
    pub c: f64,
}

impl LineEquation {
    /// The line through `from` and `to`, positive on its right side.
    pub fn through(from: Point2<f64>, to: Point2<f64>) -> Self {
        let a = from.y - to.y;
        let b = to.x - from.x;
        let length = (a * a + b * b).sqrt();
        let (a, b) = if length > 0.0 {
            (a / length, b / length)
        } else {
            (a, b)
        };
        let c = -(a * from.x + b * from.y);
        LineEquation { a, b, c }
    }

    /// Signed distance of `point` to this line. Positive values lie left of the line.
    pub fn signed_distance(&self, point: Point2<f64>) -> f64 {
        self.a * point.x + self.b * point.y + self.c
    }

    fn reversed(self) -> Self {
        LineEquation {
            a: -self.a,
            b: -self.b,
            c: -self.c,
        }
    }
}

/// An edge of the [Mesh](super::Mesh) (winged-edge segment).
///
/// An edge is undirected but its two vertices are ordered (`from`, `to`). It references
/// up to two adjacent triangles.
#[derive(Clone, Debug)]
pub struct EdgeEntry {
    from: FixedVertexHandle,
    to: FixedVertexHandle,
    positions: [Point2<f64>; 2],
    line: LineEquation,
    boundary: bool,
    neighbors: SmallVec<[FixedTriangleHandle; 2]>,
    removed: bool,
}

impl EdgeEntry {
    pub(super) fn new(
        from: (FixedVertexHandle, Point2<f64>),
        to: (FixedVertexHandle, Point2<f64>),
        boundary: bool,
    ) -> Self {
        EdgeEntry {
            from: from.0,
            to: to.0,
            positions: [from.1, to.1],
            line: LineEquation::through(from.1, to.1),
            boundary,
            neighbors: SmallVec::new(),
            removed: false,
        }
    }

    /// The first endpoint.
    pub fn from(&self) -> FixedVertexHandle {
        self.from
    }

    /// The second endpoint.
    pub fn to(&self) -> FixedVertexHandle {
        self.to
    }

    /// Both endpoints, `from` first.
    pub fn vertices(&self) -> [FixedVertexHandle; 2] {
        [self.from, self.to]
    }

    /// Positions of both endpoints, `from` first.
    pub fn positions(&self) -> [Point2<f64>; 2] {
        self.positions
    }

    /// The normalized line equation through both endpoints.
    pub fn line(&self) -> LineEquation {
        self.line
    }

    /// Returns `true` if `vertex` is one of the endpoints.
    pub fn has_vertex(&self, vertex: FixedVertexHandle) -> bool {
        self.from == vertex || self.to == vertex
    }

    /// Returns the endpoint that is not `vertex`, or `None` if `vertex` is no endpoint.
    pub fn other_vertex(&self, vertex: FixedVertexHandle) -> Option<FixedVertexHandle> {
        if self.from == vertex {
            Some(self.to)
        } else if self.to == vertex {
            Some(self.from)
        } else {
            None
        }
    }

    /// Returns the endpoint both edges have in common.
    pub fn shared_vertex(&self, other: &EdgeEntry) -> Option<FixedVertexHandle> {
        if other.has_vertex(self.from) {
            Some(self.from)
        } else if other.has_vertex(self.to) {
            Some(self.to)
        } else {
            None
        }
    }

    /// Returns `true` if both edges share at least one endpoint.
    pub fn connects_with(&self, other: &EdgeEntry) -> bool {
        self.shared_vertex(other).is_some()
    }

    /// Swaps the order of this edge's endpoints.
    pub fn flip_vertices(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
        self.positions.swap(0, 1);
        self.line = self.line.reversed();
    }

    /// Returns `true` for sides of the super-triangle (and their sub-segments) and for any
    /// edge that has fewer than two adjacent triangles.
    pub fn is_boundary(&self) -> bool {
        self.boundary || self.neighbors.len() < 2
    }

    /// Returns `true` if this edge was explicitly marked as an outer boundary edge.
    pub fn is_outer_boundary(&self) -> bool {
        self.boundary
    }

    /// Returns `true` once the edge was removed from the mesh.
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// The (at most two) triangles adjacent to this edge.
    pub fn neighbors(&self) -> &[FixedTriangleHandle] {
        &self.neighbors
    }

    /// Returns the adjacent triangle that is not `triangle`.
    pub fn other_neighbor(&self, triangle: FixedTriangleHandle) -> Option<FixedTriangleHandle> {
        self.neighbors.iter().copied().find(|t| *t != triangle)
    }

    pub(super) fn add_neighbor(
        &mut self,
        self_handle: FixedEdgeHandle,
        triangle: FixedTriangleHandle,
    ) -> Result<(), TriangulationError> {
        if self.neighbors.contains(&triangle) {
            return Ok(());
        }
        if self.neighbors.len() >= 2 {
            return Err(TriangulationError::TooManyNeighbors(self_handle));
        }
        self.neighbors.push(triangle);
        Ok(())
    }

    pub(super) fn remove_neighbor(&mut self, triangle: FixedTriangleHandle) {
        self.neighbors.retain(|t| *t != triangle);
    }

    pub(super) fn mark_removed(&mut self) {
        self.removed = true;
    }

    /// Exact orientation of `position` relative to the directed line `from -> to`.
    pub fn side_query(&self, position: Point2<f64>) -> LineSideInfo {
        math::side_query(self.positions[0], self.positions[1], position)
    }

    /// Returns `true` if both positions lie strictly on the same side of this edge's line.
    pub fn is_on_the_same_side(&self, p1: Point2<f64>, p2: Point2<f64>) -> bool {
        self.side_query(p1).is_on_same_side_as(self.side_query(p2))
    }

    /// Returns `true` if `position` is closer than `epsilon` to this edge's line and lies
    /// within the edge's bounding box (grown by `epsilon`).
    pub fn is_on_edge(&self, position: Point2<f64>, epsilon: f64) -> bool {
        if self.line.signed_distance(position).abs() >= epsilon {
            return false;
        }
        let rect = BoundingRect::from_corners(self.positions[0], self.positions[1]);
        let grown = BoundingRect::from_corners(
            rect.lower().sub(Point2::new(epsilon, epsilon)),
            rect.upper().add(Point2::new(epsilon, epsilon)),
        );
        grown.contains_point(position)
    }
}
