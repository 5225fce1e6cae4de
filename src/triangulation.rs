use crate::delaunay_core::{math, Circumcircle};
use crate::{BoundingRect, Point2, Vertex, VertexId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle of a finished triangulation.
///
/// Refers to the vertices passed to [DelaunayManager::init](crate::DelaunayManager::init),
/// identities included. Vertices are ordered counterclockwise.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    vertices: [Vertex; 3],
}

impl Triangle {
    pub(crate) fn new(vertices: [Vertex; 3]) -> Self {
        Triangle { vertices }
    }

    /// The vertices in counterclockwise order.
    pub fn vertices(&self) -> [Vertex; 3] {
        self.vertices
    }

    /// Positions of the vertices in counterclockwise order.
    pub fn positions(&self) -> [Point2<f64>; 3] {
        self.vertices.map(|v| v.position())
    }

    /// Returns the triangle's edges as vertex pairs, following the counterclockwise order.
    pub fn edges(&self) -> [(Vertex, Vertex); 3] {
        let [v0, v1, v2] = self.vertices;
        [(v0, v1), (v1, v2), (v2, v0)]
    }

    /// Returns `true` if one of the vertices has the given id.
    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.iter().any(|v| v.id() == id)
    }

    /// The circumcircle, `None` if the vertices are collinear.
    pub fn circumcircle(&self) -> Option<Circumcircle> {
        Circumcircle::from_positions(self.positions())
    }

    /// Bounding box of the three vertices.
    pub fn bounding_rect(&self) -> BoundingRect {
        BoundingRect::from_points(self.positions())
    }

    /// The triangle's area.
    pub fn area(&self) -> f64 {
        math::triangle_area(self.positions())
    }
}
