use super::math;
use super::{FixedEdgeHandle, FixedTriangleHandle, FixedVertexHandle};
use crate::locate::LocatorHandle;
use crate::{BoundingRect, Point2, TriangulationError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The circle passing through a triangle's three vertices.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Circumcircle {
    center: Point2<f64>,
    radius_2: f64,
}

impl Circumcircle {
    /// Calculates the circumcircle of three positions. Returns `None` if they are collinear.
    pub fn from_positions(positions: [Point2<f64>; 3]) -> Option<Self> {
        math::circumcenter(positions).map(|(center, radius_2)| Circumcircle { center, radius_2 })
    }

    /// The circle's center.
    pub fn center(&self) -> Point2<f64> {
        self.center
    }

    /// The circle's radius.
    pub fn radius(&self) -> f64 {
        self.radius_2.sqrt()
    }

    /// The squared radius.
    pub fn radius_2(&self) -> f64 {
        self.radius_2
    }

    /// Non-strict containment: points on the circle count as contained.
    pub fn contains(&self, position: Point2<f64>) -> bool {
        self.center.distance_2(position) <= self.radius_2
    }

    /// The smallest axis aligned rectangle containing the circle.
    pub fn bounding_rect(&self) -> BoundingRect {
        BoundingRect::from_circle(self.center, self.radius())
    }
}

/// A triangle of the [Mesh](super::Mesh).
///
/// Consists of three edges and the three vertices pairwise shared by them. Vertices are
/// stored in counterclockwise order, `edges()[i]` is the edge opposite of `vertices()[i]`.
///
/// The circumcircle and the bounding box are derived once at construction. Triangles with
/// collinear vertices have no circumcircle; they can be created but any circumcircle
/// dependent operation on them fails with [TriangulationError::DegenerateTriangle].
#[derive(Clone, Debug)]
pub struct TriangleEntry {
    handle: FixedTriangleHandle,
    vertices: [FixedVertexHandle; 3],
    positions: [Point2<f64>; 3],
    edges: [FixedEdgeHandle; 3],
    circumcircle: Option<Circumcircle>,
    bounding_rect: BoundingRect,
    locator_handle: LocatorHandle,
    removed: bool,
}

impl TriangleEntry {
    pub(super) fn new(
        handle: FixedTriangleHandle,
        vertices: [(FixedVertexHandle, Point2<f64>); 3],
        edges: [FixedEdgeHandle; 3],
    ) -> Self {
        let positions = [vertices[0].1, vertices[1].1, vertices[2].1];
        TriangleEntry {
            handle,
            vertices: [vertices[0].0, vertices[1].0, vertices[2].0],
            positions,
            edges,
            circumcircle: Circumcircle::from_positions(positions),
            bounding_rect: BoundingRect::from_points(positions),
            locator_handle: LocatorHandle::None,
            removed: false,
        }
    }

    /// This triangle's own handle.
    pub fn handle(&self) -> FixedTriangleHandle {
        self.handle
    }

    /// The vertices in counterclockwise order.
    pub fn vertices(&self) -> [FixedVertexHandle; 3] {
        self.vertices
    }

    /// Positions of the vertices in counterclockwise order.
    pub fn positions(&self) -> [Point2<f64>; 3] {
        self.positions
    }

    /// The edges, `edges()[i]` lies opposite of `vertices()[i]`.
    pub fn edges(&self) -> [FixedEdgeHandle; 3] {
        self.edges
    }

    /// Returns `true` once the triangle was removed from the mesh.
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Returns `true` if the vertices are collinear.
    pub fn is_degenerate(&self) -> bool {
        self.circumcircle.is_none()
    }

    /// The circumcircle, `None` for degenerate triangles.
    pub fn circumcircle(&self) -> Option<Circumcircle> {
        self.circumcircle
    }

    /// Fails with [TriangulationError::DegenerateTriangle] for degenerate triangles.
    pub fn circumcenter(&self) -> Result<Point2<f64>, TriangulationError> {
        self.circumcircle
            .map(|circle| circle.center())
            .ok_or(TriangulationError::DegenerateTriangle)
    }

    /// Bounding box of the three vertices.
    pub fn bounding_rect(&self) -> BoundingRect {
        self.bounding_rect
    }

    /// Returns the annotation written by the active point locator.
    ///
    /// The annotation of a removed triangle stays readable until the locator processed the
    /// removal.
    pub fn locator_handle(&self) -> LocatorHandle {
        self.locator_handle
    }

    pub(crate) fn set_locator_handle(&mut self, handle: LocatorHandle) {
        self.locator_handle = handle;
    }

    pub(crate) fn take_locator_handle(&mut self) -> LocatorHandle {
        std::mem::take(&mut self.locator_handle)
    }

    pub(super) fn mark_removed(&mut self) {
        self.removed = true;
    }

    /// Returns `true` if `vertex` is a corner of this triangle.
    pub fn has_vertex(&self, vertex: FixedVertexHandle) -> bool {
        self.vertices.contains(&vertex)
    }

    /// Returns `true` if `edge` is a side of this triangle.
    pub fn has_edge(&self, edge: FixedEdgeHandle) -> bool {
        self.edges.contains(&edge)
    }

    /// Non-strict circumcircle test: `distance² <= radius²`.
    pub fn is_point_in_circumcircle(&self, position: Point2<f64>) -> Result<bool, TriangulationError> {
        self.circumcircle
            .map(|circle| circle.contains(position))
            .ok_or(TriangulationError::DegenerateTriangle)
    }

    /// Returns `true` if `position` lies inside this triangle or on its border.
    ///
    /// Points clearly outside of the circumcircle are rejected without orientation tests.
    pub fn is_point_inside(&self, position: Point2<f64>) -> bool {
        if let Some(circle) = self.circumcircle {
            // Slack for rounding errors of the cached circle
            if circle.center().distance_2(position) > circle.radius_2() * (1.0 + 1e-9) {
                return false;
            }
        }
        (0..3).all(|i| {
            let from = self.positions[(i + 1) % 3];
            let to = self.positions[(i + 2) % 3];
            let opposite = math::side_query(from, to, self.positions[i]);
            let query = math::side_query(from, to, position);
            query.is_on_line() || query == opposite
        })
    }

    /// Exact closed containment test.
    pub fn contains(&self, position: Point2<f64>) -> bool {
        math::is_in_closed_triangle(self.positions, position)
    }

    /// Returns the vertex that is not part of `edge`.
    pub fn opposing_vertex(
        &self,
        edge: FixedEdgeHandle,
    ) -> Result<FixedVertexHandle, TriangulationError> {
        self.edges
            .iter()
            .position(|e| *e == edge)
            .map(|index| self.vertices[index])
            .ok_or(TriangulationError::EdgeNotInTriangle {
                edge,
                triangle: self.handle,
            })
    }

    /// Returns the edge that does not contain `vertex`.
    pub fn edge_opposite(&self, vertex: FixedVertexHandle) -> Option<FixedEdgeHandle> {
        self.vertices
            .iter()
            .position(|v| *v == vertex)
            .map(|index| self.edges[index])
    }

    /// Returns an edge adjacent to `vertex` that is not `exclude`.
    pub fn adjacent_edge_by_vertex(
        &self,
        vertex: FixedVertexHandle,
        exclude: FixedEdgeHandle,
    ) -> Option<FixedEdgeHandle> {
        let index = self.vertices.iter().position(|v| *v == vertex)?;
        (0..3)
            .filter(|i| *i != index)
            .map(|i| self.edges[i])
            .find(|e| *e != exclude)
    }

    /// Position of `vertex`, `None` if it is not a vertex of this triangle.
    pub fn position_of(&self, vertex: FixedVertexHandle) -> Option<Point2<f64>> {
        self.vertices
            .iter()
            .position(|v| *v == vertex)
            .map(|index| self.positions[index])
    }
}
