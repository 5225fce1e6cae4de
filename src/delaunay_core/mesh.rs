use super::{
    EdgeEntry, FixedEdgeHandle, FixedTriangleHandle, FixedVertexHandle, TriangleEntry,
};
use super::math;
use crate::locate::{LocatorHandle, LocatorSlots};
use crate::{Point2, TriangulationError, Vertex, VertexId};

#[derive(Clone, Copy, Debug)]
pub(super) struct VertexEntry {
    vertex: Vertex,
    /// Index into [math::SUPER_CORNER_DIRECTIONS], only set for super-triangle corners
    corner: Option<usize>,
}

/// The region bounded by a triangle's circumcircle.
///
/// Super-triangle corners lie infinitely far away, which turns the circumcircle of any triangle
/// touching them into a half plane.
#[derive(Clone, Copy, Debug)]
enum Circumregion {
    Circle([Point2<f64>; 3]),
    /// Bounded by the real edge `from -> to`, the corner lies to its left
    BeyondEdge {
        from: Point2<f64>,
        to: Point2<f64>,
        corner: usize,
    },
    BeyondVertex {
        vertex: Point2<f64>,
        corners: [usize; 2],
    },
    Everything,
}

/// Arena of vertices, edges and triangles forming a winged-edge graph.
///
/// Edges store the handles of their (at most two) adjacent triangles, triangles store the
/// handles of their three edges. Removing a triangle clears its back-references on its edges
/// and marks its slot as removed; slots are never reused during a run, hence a handle can
/// never refer to a different element than the one it was created for.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    vertices: Vec<VertexEntry>,
    edges: Vec<EdgeEntry>,
    triangles: Vec<TriangleEntry>,
    num_active_triangles: usize,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty mesh with room for the elements created by `num_vertices` insertions.
    pub fn with_capacity(num_vertices: usize) -> Self {
        // Every insertion creates at most 4 triangles and 5 edges
        Mesh {
            vertices: Vec::with_capacity(num_vertices),
            edges: Vec::with_capacity(num_vertices * 5),
            triangles: Vec::with_capacity(num_vertices * 4),
            num_active_triangles: 0,
        }
    }

    /// Number of vertices, super-triangle corners included.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles that have not been removed.
    pub fn num_triangles(&self) -> usize {
        self.num_active_triangles
    }

    /// Adds an input vertex. The vertex is not connected to anything yet.
    pub fn add_vertex(&mut self, vertex: Vertex) -> FixedVertexHandle {
        self.push_vertex(VertexEntry {
            vertex,
            corner: None,
        })
    }

    /// Adds the super-triangle corner with the given index into
    /// [SUPER_CORNER_DIRECTIONS](math::SUPER_CORNER_DIRECTIONS).
    pub fn add_super_corner(&mut self, corner: usize, position: Point2<f64>) -> FixedVertexHandle {
        debug_assert!(corner < math::SUPER_CORNER_DIRECTIONS.len());
        self.push_vertex(VertexEntry {
            vertex: Vertex::with_id(VertexId::synthetic(corner), position),
            corner: Some(corner),
        })
    }

    fn push_vertex(&mut self, entry: VertexEntry) -> FixedVertexHandle {
        let handle = FixedVertexHandle::new(self.vertices.len());
        self.vertices.push(entry);
        handle
    }

    /// Returns the vertex behind `handle`.
    pub fn vertex(&self, handle: FixedVertexHandle) -> &Vertex {
        &self.vertices[handle.index()].vertex
    }

    /// Shorthand for the position of [Mesh::vertex].
    pub fn vertex_position(&self, handle: FixedVertexHandle) -> Point2<f64> {
        self.vertices[handle.index()].vertex.position()
    }

    /// Returns `true` for the corners of the super-triangle.
    pub fn is_synthetic(&self, handle: FixedVertexHandle) -> bool {
        self.super_corner(handle).is_some()
    }

    /// Returns the corner index of a super-triangle corner, `None` for input vertices.
    pub fn super_corner(&self, handle: FixedVertexHandle) -> Option<usize> {
        self.vertices[handle.index()].corner
    }

    fn circumregion(&self, triangle: FixedTriangleHandle) -> Circumregion {
        let entry = self.triangle(triangle);
        let positions = entry.positions();
        let corners = entry.vertices().map(|vertex| self.super_corner(vertex));
        let Some(start) =
            (0..3).find(|i| corners[*i].is_none() && corners[(i + 2) % 3].is_some())
        else {
            return if corners[0].is_some() {
                Circumregion::Everything
            } else {
                Circumregion::Circle(positions)
            };
        };

        // Rotated such that the ccw order starts with a real vertex and ends with a corner
        let second = (start + 1) % 3;
        let third = (start + 2) % 3;
        match (corners[second], corners[third]) {
            (None, Some(corner)) => Circumregion::BeyondEdge {
                from: positions[start],
                to: positions[second],
                corner,
            },
            (Some(first), Some(last)) => Circumregion::BeyondVertex {
                vertex: positions[start],
                corners: [first, last],
            },
            _ => Circumregion::Circle(positions),
        }
    }

    /// Returns `true` if `position` lies strictly inside the circumcircle of `triangle`.
    ///
    /// Super-triangle corners count as infinitely far away in the direction given by
    /// [SUPER_CORNER_DIRECTIONS](math::SUPER_CORNER_DIRECTIONS). The circumcircle of a
    /// triangle with one corner becomes the open half plane beyond its real edge. With two
    /// corners, it becomes the half plane beyond the real vertex that faces the super edge
    /// between them. Hence a corner never wins against an input vertex, no matter how far
    /// the circumcircle of a nearly flat triangle reaches.
    pub fn circumcircle_contains(
        &self,
        triangle: FixedTriangleHandle,
        position: Point2<f64>,
    ) -> bool {
        match self.circumregion(triangle) {
            Circumregion::Circle([p0, p1, p2]) => {
                math::contained_in_circumference(p0, p1, p2, position)
            }
            Circumregion::BeyondEdge { from, to, .. } => {
                math::circumcircle_contains_with_corner(from, to, position)
            }
            Circumregion::BeyondVertex { vertex, corners } => {
                math::circumcircle_contains_with_two_corners(vertex, corners, position)
            }
            Circumregion::Everything => true,
        }
    }

    /// Like [Mesh::circumcircle_contains], for a vertex that may be a super-triangle corner.
    ///
    /// A corner lies outside of every circumcircle through input vertices only.
    pub fn circumcircle_contains_vertex(
        &self,
        triangle: FixedTriangleHandle,
        vertex: FixedVertexHandle,
    ) -> bool {
        let Some(query_corner) = self.super_corner(vertex) else {
            return self.circumcircle_contains(triangle, self.vertex_position(vertex));
        };
        match self.circumregion(triangle) {
            Circumregion::BeyondEdge { from, to, corner } => {
                math::corner_in_circumcircle(from, to, corner, query_corner)
            }
            _ => false,
        }
    }

    /// Adds an edge without adjacent triangles.
    ///
    /// `boundary` marks sides of the super-triangle, see [EdgeEntry::is_outer_boundary].
    pub fn add_edge(
        &mut self,
        from: FixedVertexHandle,
        to: FixedVertexHandle,
        boundary: bool,
    ) -> FixedEdgeHandle {
        let handle = FixedEdgeHandle::new(self.edges.len());
        let entry = EdgeEntry::new(
            (from, self.vertex_position(from)),
            (to, self.vertex_position(to)),
            boundary,
        );
        self.edges.push(entry);
        handle
    }

    /// Returns an edge, removed or not.
    pub fn edge(&self, handle: FixedEdgeHandle) -> &EdgeEntry {
        &self.edges[handle.index()]
    }

    /// Swaps the endpoint order of an edge.
    pub fn flip_edge_vertices(&mut self, handle: FixedEdgeHandle) {
        self.edges[handle.index()].flip_vertices();
    }

    /// Marks an edge without adjacent triangles as removed.
    pub fn remove_edge(&mut self, handle: FixedEdgeHandle) {
        let edge = &mut self.edges[handle.index()];
        debug_assert!(edge.neighbors().is_empty(), "Removed edge is still in use");
        edge.mark_removed();
    }

    /// Returns a triangle, removed or not.
    pub fn triangle(&self, handle: FixedTriangleHandle) -> &TriangleEntry {
        &self.triangles[handle.index()]
    }

    /// Iterates over all triangles that have not been removed.
    pub fn triangles(&self) -> impl Iterator<Item = &TriangleEntry> + '_ {
        self.triangles.iter().filter(|t| !t.is_removed())
    }

    /// Returns the triangle on the other side of `edge`, as seen from `triangle`.
    pub fn neighbor_across(
        &self,
        triangle: FixedTriangleHandle,
        edge: FixedEdgeHandle,
    ) -> Option<FixedTriangleHandle> {
        self.edge(edge).other_neighbor(triangle)
    }

    /// Creates a triangle from three edges and registers it on all of them.
    ///
    /// Fails with [TriangulationError::InvalidTopology] unless every pair of edges shares
    /// exactly one vertex and the three shared vertices are distinct. Fails with
    /// [TriangulationError::TooManyNeighbors] if any edge already has two triangles.
    /// The mesh is left unchanged on failure.
    pub fn create_triangle(
        &mut self,
        e0: FixedEdgeHandle,
        e1: FixedEdgeHandle,
        e2: FixedEdgeHandle,
    ) -> Result<FixedTriangleHandle, TriangulationError> {
        let invalid = TriangulationError::InvalidTopology([e0, e1, e2]);
        let entries = [self.edge(e0), self.edge(e1), self.edge(e2)];
        if entries.iter().any(|e| e.is_removed()) {
            return Err(invalid);
        }

        let shares_one = |a: &EdgeEntry, b: &EdgeEntry| {
            a.vertices().iter().filter(|v| b.has_vertex(**v)).count() == 1
        };
        if !(shares_one(entries[0], entries[1])
            && shares_one(entries[1], entries[2])
            && shares_one(entries[2], entries[0]))
        {
            return Err(invalid);
        }

        // Vertex i is the one opposite of edge i
        let (v0, v1, v2) = match (
            entries[1].shared_vertex(entries[2]),
            entries[2].shared_vertex(entries[0]),
            entries[0].shared_vertex(entries[1]),
        ) {
            (Some(v0), Some(v1), Some(v2)) => (v0, v1, v2),
            _ => return Err(invalid),
        };
        if v0 == v1 || v1 == v2 || v2 == v0 {
            return Err(invalid);
        }

        for (edge, handle) in entries.iter().zip([e0, e1, e2]) {
            if edge.neighbors().len() >= 2 {
                return Err(TriangulationError::TooManyNeighbors(handle));
            }
        }

        let mut vertices = [
            (v0, self.vertex_position(v0)),
            (v1, self.vertex_position(v1)),
            (v2, self.vertex_position(v2)),
        ];
        let mut edges = [e0, e1, e2];
        if math::side_query(vertices[0].1, vertices[1].1, vertices[2].1).is_on_right_side() {
            vertices.swap(1, 2);
            edges.swap(1, 2);
        }

        let handle = FixedTriangleHandle::new(self.triangles.len());
        for edge in edges {
            self.edges[edge.index()].add_neighbor(edge, handle)?;
        }
        self.triangles.push(TriangleEntry::new(handle, vertices, edges));
        self.num_active_triangles += 1;
        Ok(handle)
    }

    /// Detaches a triangle from its edges and marks it as removed.
    ///
    /// Removing a triangle twice has no effect.
    pub fn remove_triangle(&mut self, handle: FixedTriangleHandle) {
        let triangle = &mut self.triangles[handle.index()];
        if triangle.is_removed() {
            return;
        }
        triangle.mark_removed();
        let edges = triangle.edges();
        for edge in edges {
            self.edges[edge.index()].remove_neighbor(handle);
        }
        self.num_active_triangles -= 1;
    }

    pub(crate) fn set_locator_handle(&mut self, handle: FixedTriangleHandle, value: LocatorHandle) {
        self.triangles[handle.index()].set_locator_handle(value);
    }

    pub(crate) fn take_locator_handle(&mut self, handle: FixedTriangleHandle) -> LocatorHandle {
        self.triangles[handle.index()].take_locator_handle()
    }

    /// Returns the restricted view handed to point locators.
    pub fn locator_slots(&mut self) -> LocatorSlots<'_> {
        LocatorSlots::new(self)
    }

    #[cfg(test)]
    pub(crate) fn sanity_check(&self) {
        let mut active = 0;
        for triangle in self.triangles() {
            active += 1;
            let [p0, p1, p2] = triangle.positions();
            assert!(math::side_query(p0, p1, p2).is_on_left_side_or_on_line());
            for (index, edge_handle) in triangle.edges().iter().enumerate() {
                let edge = self.edge(*edge_handle);
                assert!(!edge.is_removed());
                assert!(edge.neighbors().contains(&triangle.handle()));
                assert!(!edge.has_vertex(triangle.vertices()[index]));
            }
        }
        assert_eq!(active, self.num_triangles());

        for edge in self.edges.iter().filter(|e| !e.is_removed()) {
            assert!(edge.neighbors().len() <= 2);
            for neighbor in edge.neighbors() {
                assert!(!self.triangle(*neighbor).is_removed());
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::Mesh;
    use crate::delaunay_core::FixedVertexHandle;
    use crate::{Point2, TriangulationError, Vertex};

    fn mesh_with_vertices(positions: &[(f64, f64)]) -> (Mesh, Vec<FixedVertexHandle>) {
        let mut mesh = Mesh::new();
        let handles = positions
            .iter()
            .map(|(x, y)| mesh.add_vertex(Vertex::new(*x, *y)))
            .collect();
        (mesh, handles)
    }

    #[test]
    fn test_create_triangle() -> Result<(), TriangulationError> {
        let (mut mesh, v) = mesh_with_vertices(&[(0.0, 0.0), (0.0, 1.0), (1.0, 0.0)]);
        let e0 = mesh.add_edge(v[0], v[1], true);
        let e1 = mesh.add_edge(v[1], v[2], true);
        let e2 = mesh.add_edge(v[2], v[0], true);
        let t = mesh.create_triangle(e0, e1, e2)?;

        let triangle = mesh.triangle(t);
        // Given order is clockwise, stored order must be ccw
        let [p0, p1, p2] = triangle.positions();
        assert!(crate::side_query(p0, p1, p2).is_on_left_side());
        for (index, edge) in triangle.edges().iter().enumerate() {
            assert_eq!(triangle.opposing_vertex(*edge)?, triangle.vertices()[index]);
        }
        assert_eq!(mesh.num_triangles(), 1);
        mesh.sanity_check();
        Ok(())
    }

    #[test]
    fn test_invalid_topology() {
        let (mut mesh, v) =
            mesh_with_vertices(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        let e0 = mesh.add_edge(v[0], v[1], false);
        let e1 = mesh.add_edge(v[1], v[2], false);
        let e2 = mesh.add_edge(v[2], v[3], false);
        assert_eq!(
            mesh.create_triangle(e0, e1, e2),
            Err(TriangulationError::InvalidTopology([e0, e1, e2]))
        );

        // Three edges meeting in a single vertex
        let s1 = mesh.add_edge(v[0], v[2], false);
        let s2 = mesh.add_edge(v[0], v[3], false);
        assert!(matches!(
            mesh.create_triangle(e0, s1, s2),
            Err(TriangulationError::InvalidTopology(_))
        ));

        // The same edge twice
        assert!(mesh.create_triangle(e0, e0, e1).is_err());
        assert_eq!(mesh.num_triangles(), 0);
        for edge in [e0, e1, e2, s1, s2] {
            assert!(mesh.edge(edge).neighbors().is_empty());
        }
    }

    #[test]
    fn test_too_many_neighbors() -> Result<(), TriangulationError> {
        let (mut mesh, v) = mesh_with_vertices(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (1.0, 1.0),
            (1.0, -1.0),
            (1.0, 3.0),
        ]);
        let shared = mesh.add_edge(v[0], v[1], false);
        let mut third_vertex_edges = Vec::new();
        for third in [v[2], v[3], v[4]] {
            let a = mesh.add_edge(v[1], third, false);
            let b = mesh.add_edge(third, v[0], false);
            third_vertex_edges.push((a, b));
        }
        let (a, b) = third_vertex_edges[0];
        mesh.create_triangle(shared, a, b)?;
        let (a, b) = third_vertex_edges[1];
        mesh.create_triangle(shared, a, b)?;
        let (a, b) = third_vertex_edges[2];
        assert_eq!(
            mesh.create_triangle(shared, a, b),
            Err(TriangulationError::TooManyNeighbors(shared))
        );
        // The failed creation must not leave dangling references
        assert!(mesh.edge(a).neighbors().is_empty());
        assert!(mesh.edge(b).neighbors().is_empty());
        mesh.sanity_check();
        Ok(())
    }

    #[test]
    fn test_remove_triangle_is_idempotent() -> Result<(), TriangulationError> {
        let (mut mesh, v) = mesh_with_vertices(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        let e0 = mesh.add_edge(v[0], v[1], false);
        let e1 = mesh.add_edge(v[1], v[2], false);
        let e2 = mesh.add_edge(v[2], v[0], false);
        let t = mesh.create_triangle(e0, e1, e2)?;
        mesh.remove_triangle(t);
        mesh.remove_triangle(t);
        assert!(mesh.triangle(t).is_removed());
        assert_eq!(mesh.num_triangles(), 0);
        assert_eq!(mesh.triangles().count(), 0);
        for edge in [e0, e1, e2] {
            assert!(mesh.edge(edge).neighbors().is_empty());
        }
        // Edges can be reused for a new triangle
        let t2 = mesh.create_triangle(e2, e0, e1)?;
        assert_ne!(t, t2);
        mesh.sanity_check();
        Ok(())
    }

    #[test]
    fn test_degenerate_triangle() -> Result<(), TriangulationError> {
        let (mut mesh, v) = mesh_with_vertices(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        let e0 = mesh.add_edge(v[0], v[1], false);
        let e1 = mesh.add_edge(v[1], v[2], false);
        let e2 = mesh.add_edge(v[2], v[0], false);
        let t = mesh.create_triangle(e0, e1, e2)?;
        let triangle = mesh.triangle(t);
        assert!(triangle.is_degenerate());
        assert_eq!(
            triangle.is_point_in_circumcircle(Point2::new(0.0, 0.0)),
            Err(TriangulationError::DegenerateTriangle)
        );
        assert_eq!(
            triangle.circumcenter(),
            Err(TriangulationError::DegenerateTriangle)
        );
        Ok(())
    }

    #[test]
    fn test_triangle_queries() -> Result<(), TriangulationError> {
        let (mut mesh, v) = mesh_with_vertices(&[(0.0, 0.0), (2.0, 0.0), (0.0, 2.0), (5.0, 5.0)]);
        let e0 = mesh.add_edge(v[0], v[1], false);
        let e1 = mesh.add_edge(v[1], v[2], false);
        let e2 = mesh.add_edge(v[2], v[0], false);
        let unrelated = mesh.add_edge(v[2], v[3], false);
        let t = mesh.create_triangle(e0, e1, e2)?;
        let triangle = mesh.triangle(t);

        assert_eq!(triangle.circumcenter()?, Point2::new(1.0, 1.0));
        assert!(triangle.is_point_in_circumcircle(Point2::new(2.0, 2.0))?);
        assert!(triangle.is_point_in_circumcircle(Point2::new(1.5, 1.5))?);
        assert!(!triangle.is_point_in_circumcircle(Point2::new(2.1, 2.1))?);

        assert!(triangle.is_point_inside(Point2::new(0.5, 0.5)));
        assert!(triangle.is_point_inside(Point2::new(1.0, 0.0)));
        assert!(triangle.is_point_inside(Point2::new(0.0, 0.0)));
        assert!(!triangle.is_point_inside(Point2::new(1.5, 1.5)));
        assert!(!triangle.is_point_inside(Point2::new(5.0, 5.0)));

        assert_eq!(triangle.opposing_vertex(e0)?, v[2]);
        assert_eq!(
            triangle.opposing_vertex(unrelated),
            Err(TriangulationError::EdgeNotInTriangle {
                edge: unrelated,
                triangle: t
            })
        );
        assert_eq!(triangle.edge_opposite(v[0]), Some(e1));
        assert_eq!(triangle.adjacent_edge_by_vertex(v[0], e0), Some(e2));
        assert_eq!(triangle.adjacent_edge_by_vertex(v[0], e2), Some(e0));
        assert_eq!(triangle.adjacent_edge_by_vertex(v[3], e0), None);
        assert_eq!(mesh.neighbor_across(t, e0), None);
        Ok(())
    }

    #[test]
    fn test_circumcircle_with_super_corners() -> Result<(), TriangulationError> {
        let (mut mesh, v) = mesh_with_vertices(&[(0.0, 0.0), (1.0, 0.0)]);
        let corners: Vec<_> = [(-40.0, -30.0), (40.0, -30.0), (0.0, 50.0)]
            .iter()
            .enumerate()
            .map(|(index, (x, y))| mesh.add_super_corner(index, Point2::new(*x, *y)))
            .collect();
        assert!(mesh.is_synthetic(corners[2]));
        assert_eq!(mesh.super_corner(corners[1]), Some(1));
        assert_eq!(mesh.super_corner(v[0]), None);

        // One corner: everything below the real edge
        let e0 = mesh.add_edge(v[0], v[1], false);
        let e1 = mesh.add_edge(v[1], corners[0], false);
        let e2 = mesh.add_edge(corners[0], v[0], false);
        let below = mesh.create_triangle(e0, e1, e2)?;
        let far_away = Point2::new(50.0, -1.0);
        assert!(mesh.circumcircle_contains(below, far_away));
        let [p0, p1, p2] = mesh.triangle(below).positions();
        assert!(!crate::contained_in_circumference(p0, p1, p2, far_away));
        assert!(mesh.circumcircle_contains(below, Point2::new(0.5, 0.0)));
        assert!(!mesh.circumcircle_contains(below, Point2::new(0.5, 1.0e-7)));
        assert!(!mesh.circumcircle_contains_vertex(below, corners[1]));
        assert!(!mesh.circumcircle_contains_vertex(below, corners[2]));

        // Two corners: everything below the real vertex
        let e3 = mesh.add_edge(corners[0], corners[1], true);
        let e4 = mesh.add_edge(corners[1], v[0], false);
        let lower = mesh.create_triangle(e2, e3, e4)?;
        assert!(mesh.circumcircle_contains(lower, Point2::new(-30.0, -0.5)));
        assert!(!mesh.circumcircle_contains(lower, Point2::new(3.0, 0.5)));
        assert!(!mesh.circumcircle_contains_vertex(lower, corners[2]));

        // Real triangles never contain a corner
        let top = mesh.add_vertex(Vertex::new(0.5, 1.0e-7));
        let e5 = mesh.add_edge(v[1], top, false);
        let e6 = mesh.add_edge(top, v[0], false);
        let flat = mesh.create_triangle(e0, e5, e6)?;
        let [p0, p1, p2] = mesh.triangle(flat).positions();
        let corner_position = mesh.vertex_position(corners[0]);
        assert!(crate::contained_in_circumference(p0, p1, p2, corner_position));
        assert!(!mesh.circumcircle_contains_vertex(flat, corners[0]));
        assert!(!mesh.circumcircle_contains(flat, Point2::new(0.5, 1.0)));
        mesh.sanity_check();
        Ok(())
    }
}
