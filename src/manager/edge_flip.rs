use smallvec::SmallVec;

use super::{triangulate, validate_input, DelaunayManager};
use crate::delaunay_core::{math, FixedEdgeHandle, FixedTriangleHandle, FixedVertexHandle, Mesh};
use crate::locate::{PointLocator, WalkLocator};
use crate::{Point2, Triangle, TriangulationConfig, TriangulationError, Vertex};

type LegalizationStack = SmallVec<[(FixedTriangleHandle, FixedEdgeHandle); 16]>;

/// Where a new vertex lies within the triangle that contains it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum VertexPlacement {
    /// On the given edge of the triangle.
    OnEdge(FixedEdgeHandle),
    /// Strictly inside of the triangle.
    Interior,
}

/// Triangulates by splitting triangles and legalizing edges with flips.
///
/// Each vertex splits the triangle containing it into three triangles, or, if it lies on an
/// edge, the two triangles adjacent to that edge into four triangles. Every edge opposite of
/// the new vertex is then checked and flipped if the triangle on its other side violates the
/// Delaunay property.
#[derive(Clone, Debug)]
pub struct EdgeFlipManager<L: PointLocator = WalkLocator> {
    locator: L,
    config: TriangulationConfig,
    vertices: Vec<Vertex>,
}

impl<L: PointLocator> EdgeFlipManager<L> {
    /// Creates a manager with the default [TriangulationConfig].
    pub fn new(locator: L) -> Self {
        Self::with_config(locator, TriangulationConfig::default())
    }

    /// Creates a manager using `locator` for point location.
    pub fn with_config(locator: L, config: TriangulationConfig) -> Self {
        EdgeFlipManager {
            locator,
            config,
            vertices: Vec::new(),
        }
    }

    /// The configuration used by every run.
    pub fn config(&self) -> &TriangulationConfig {
        &self.config
    }

    /// The point locator, in its state after the last run.
    pub fn locator(&self) -> &L {
        &self.locator
    }
}

impl<L: PointLocator> DelaunayManager for EdgeFlipManager<L> {
    fn init(&mut self, vertices: &[Vertex]) -> Result<(), TriangulationError> {
        validate_input(vertices)?;
        self.vertices = vertices.to_vec();
        Ok(())
    }

    fn triangulation(&mut self) -> Result<Vec<Triangle>, TriangulationError> {
        let config = self.config;
        triangulate(
            &self.vertices,
            &config,
            &mut self.locator,
            |mesh, locator, vertex, triangle| insert_vertex(mesh, locator, vertex, triangle, &config),
        )
    }
}

fn insert_vertex<L: PointLocator>(
    mesh: &mut Mesh,
    locator: &mut L,
    vertex: FixedVertexHandle,
    triangle: FixedTriangleHandle,
    config: &TriangulationConfig,
) -> Result<(), TriangulationError> {
    let position = mesh.vertex_position(vertex);
    let mut stack = LegalizationStack::new();

    let placement = classify(mesh, triangle, position, config.edge_epsilon);
    log::trace!("Vertex {:?} placed {:?}", mesh.vertex(vertex).id(), placement);
    match placement {
        VertexPlacement::Interior => {
            split_triangle(mesh, locator, vertex, triangle, &mut stack)?;
        }
        VertexPlacement::OnEdge(edge) => {
            split_edge(mesh, locator, vertex, triangle, edge, &mut stack)?;
        }
    }
    legalize(mesh, locator, vertex, stack)
}

fn classify(
    mesh: &Mesh,
    triangle: FixedTriangleHandle,
    position: Point2<f64>,
    epsilon: f64,
) -> VertexPlacement {
    let entry = mesh.triangle(triangle);
    let positions = entry.positions();
    let edges = entry.edges();

    for i in 0..3 {
        let from = positions[(i + 1) % 3];
        let to = positions[(i + 2) % 3];
        if math::side_query(from, to, position).is_on_line() {
            return VertexPlacement::OnEdge(edges[i]);
        }
    }

    for edge in edges {
        if mesh.edge(edge).is_on_edge(position, epsilon)
            && can_snap_to_edge(mesh, triangle, edge, position)
        {
            return VertexPlacement::OnEdge(edge);
        }
    }
    VertexPlacement::Interior
}

/// Returns `true` if a position close to, but not exactly on, an inner edge can be treated as
/// lying on that edge.
///
/// This is the case if the triangle across the edge contains the position in its circumcircle
/// and if the position can see all four corners of the two triangles.
fn can_snap_to_edge(
    mesh: &Mesh,
    triangle: FixedTriangleHandle,
    edge: FixedEdgeHandle,
    position: Point2<f64>,
) -> bool {
    let entry = mesh.edge(edge);
    if entry.is_outer_boundary() {
        return false;
    }
    let Some(neighbor) = entry.other_neighbor(triangle) else {
        return false;
    };
    if !mesh.circumcircle_contains(neighbor, position) {
        return false;
    }
    let Ok(opposite) = mesh.triangle(neighbor).opposing_vertex(edge) else {
        return false;
    };

    let [b, c] = entry.positions();
    let d = mesh.vertex_position(opposite);
    math::side_query(b, d, position).is_on_same_side_as(math::side_query(b, d, c))
        && math::side_query(c, d, position).is_on_same_side_as(math::side_query(c, d, b))
}

fn split_triangle<L: PointLocator>(
    mesh: &mut Mesh,
    locator: &mut L,
    vertex: FixedVertexHandle,
    triangle: FixedTriangleHandle,
    stack: &mut LegalizationStack,
) -> Result<(), TriangulationError> {
    //        v2
    //       / | \
    //      /  |  \
    //     /   v   \
    //    /  /   \  \
    //   v0 ------- v1
    let entry = mesh.triangle(triangle);
    let corners = entry.vertices();
    let edges = entry.edges();
    mesh.remove_triangle(triangle);

    let spokes = corners.map(|corner| mesh.add_edge(vertex, corner, false));
    let mut added: SmallVec<[FixedTriangleHandle; 3]> = SmallVec::new();
    for i in 0..3 {
        let new = mesh.create_triangle(edges[i], spokes[(i + 1) % 3], spokes[(i + 2) % 3])?;
        added.push(new);
        stack.push((new, edges[i]));
    }

    locator.on_replace_triangles(&mut mesh.locator_slots(), &[triangle], &added);
    Ok(())
}

fn split_edge<L: PointLocator>(
    mesh: &mut Mesh,
    locator: &mut L,
    vertex: FixedVertexHandle,
    triangle: FixedTriangleHandle,
    edge: FixedEdgeHandle,
    stack: &mut LegalizationStack,
) -> Result<(), TriangulationError> {
    //          a
    //        /   \
    //       /     \
    //      b - v - c   <- edge
    //       \     /
    //        \   /
    //          d       <- only present if the edge has a second triangle
    let not_in_triangle = |triangle| TriangulationError::EdgeNotInTriangle { edge, triangle };

    let entry = mesh.edge(edge);
    let [b, c] = entry.vertices();
    let outer = entry.is_outer_boundary();
    let neighbor = if outer {
        None
    } else {
        entry.other_neighbor(triangle)
    };

    let upper = mesh.triangle(triangle);
    let a = upper.opposing_vertex(edge)?;
    let edge_ab = upper
        .edge_opposite(c)
        .ok_or_else(|| not_in_triangle(triangle))?;
    let edge_ac = upper
        .edge_opposite(b)
        .ok_or_else(|| not_in_triangle(triangle))?;

    let lower = match neighbor {
        Some(neighbor) => {
            let lower = mesh.triangle(neighbor);
            let d = lower.opposing_vertex(edge)?;
            let edge_bd = lower
                .edge_opposite(c)
                .ok_or_else(|| not_in_triangle(neighbor))?;
            let edge_cd = lower
                .edge_opposite(b)
                .ok_or_else(|| not_in_triangle(neighbor))?;
            Some((neighbor, d, edge_bd, edge_cd))
        }
        None => None,
    };

    let mut removed: SmallVec<[FixedTriangleHandle; 2]> = SmallVec::new();
    removed.push(triangle);
    mesh.remove_triangle(triangle);
    if let Some((neighbor, ..)) = lower {
        removed.push(neighbor);
        mesh.remove_triangle(neighbor);
    }
    mesh.remove_edge(edge);

    // The halves of a boundary edge remain boundary edges
    let half_b = mesh.add_edge(vertex, b, outer);
    let half_c = mesh.add_edge(vertex, c, outer);
    let spoke_a = mesh.add_edge(vertex, a, false);

    let mut added: SmallVec<[FixedTriangleHandle; 4]> = SmallVec::new();
    let t0 = mesh.create_triangle(edge_ab, half_b, spoke_a)?;
    let t1 = mesh.create_triangle(edge_ac, half_c, spoke_a)?;
    added.extend([t0, t1]);
    stack.extend([(t0, edge_ab), (t1, edge_ac)]);

    if let Some((_, d, edge_bd, edge_cd)) = lower {
        let spoke_d = mesh.add_edge(vertex, d, false);
        let t2 = mesh.create_triangle(edge_bd, half_b, spoke_d)?;
        let t3 = mesh.create_triangle(edge_cd, half_c, spoke_d)?;
        added.extend([t2, t3]);
        stack.extend([(t2, edge_bd), (t3, edge_cd)]);
    }

    locator.on_replace_triangles(&mut mesh.locator_slots(), &removed, &added);
    Ok(())
}

/// Flips edges until all triangles around `vertex` satisfy the Delaunay property.
///
/// Every stack entry is a triangle adjacent to `vertex` and that triangle's edge opposite of
/// `vertex`.
fn legalize<L: PointLocator>(
    mesh: &mut Mesh,
    locator: &mut L,
    vertex: FixedVertexHandle,
    mut stack: LegalizationStack,
) -> Result<(), TriangulationError> {
    while let Some((triangle, edge)) = stack.pop() {
        let entry = mesh.triangle(triangle);
        if entry.is_removed() || mesh.edge(edge).is_boundary() {
            continue;
        }

        let neighbor = mesh
            .neighbor_across(triangle, edge)
            .ok_or(TriangulationError::MissingNeighbor(edge))?;
        let opposite = mesh.triangle(neighbor).opposing_vertex(edge)?;
        if !mesh.circumcircle_contains_vertex(triangle, opposite) {
            continue;
        }
        if is_flippable(mesh, vertex, opposite, edge) {
            flip(mesh, locator, vertex, triangle, neighbor, edge, &mut stack)?;
        } else {
            log::trace!("Skipped flipping {:?}, its quadrilateral is not convex", edge);
        }
    }
    Ok(())
}

/// Returns `true` if the diagonal `vertex -> opposite` crosses `edge`.
///
/// Orientation uses the corners' real coordinates while circumcircle tests treat them as
/// infinitely far away. Both only disagree for edges almost parallel to a corner direction.
fn is_flippable(
    mesh: &Mesh,
    vertex: FixedVertexHandle,
    opposite: FixedVertexHandle,
    edge: FixedEdgeHandle,
) -> bool {
    let from = mesh.vertex_position(vertex);
    let to = mesh.vertex_position(opposite);
    let [a, b] = mesh.edge(edge).positions();
    let side_a = math::side_query(from, to, a);
    let side_b = math::side_query(from, to, b);
    !side_a.is_on_line() && !side_b.is_on_line() && !side_a.is_on_same_side_as(side_b)
}

fn flip<L: PointLocator>(
    mesh: &mut Mesh,
    locator: &mut L,
    vertex: FixedVertexHandle,
    triangle: FixedTriangleHandle,
    neighbor: FixedTriangleHandle,
    edge: FixedEdgeHandle,
    stack: &mut LegalizationStack,
) -> Result<(), TriangulationError> {
    //       v                  v
    //     /   \              / | \
    //    a-----b    -->     a  |  b
    //     \   /              \ | /
    //       d                  d
    let not_in_triangle = |triangle| TriangulationError::EdgeNotInTriangle { edge, triangle };
    let [a, b] = mesh.edge(edge).vertices();

    let upper = mesh.triangle(triangle);
    let edge_va = upper
        .edge_opposite(b)
        .ok_or_else(|| not_in_triangle(triangle))?;
    let edge_vb = upper
        .edge_opposite(a)
        .ok_or_else(|| not_in_triangle(triangle))?;

    let lower = mesh.triangle(neighbor);
    let d = lower.opposing_vertex(edge)?;
    let edge_ad = lower
        .edge_opposite(b)
        .ok_or_else(|| not_in_triangle(neighbor))?;
    let edge_bd = lower
        .edge_opposite(a)
        .ok_or_else(|| not_in_triangle(neighbor))?;

    mesh.remove_triangle(triangle);
    mesh.remove_triangle(neighbor);
    mesh.remove_edge(edge);

    let diagonal = mesh.add_edge(vertex, d, false);
    let t0 = mesh.create_triangle(edge_va, edge_ad, diagonal)?;
    let t1 = mesh.create_triangle(edge_vb, edge_bd, diagonal)?;
    stack.extend([(t0, edge_ad), (t1, edge_bd)]);
    log::trace!("Flipped {:?} into {:?}", edge, diagonal);

    locator.on_replace_triangles(&mut mesh.locator_slots(), &[triangle, neighbor], &[t0, t1]);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::{classify, insert_vertex, VertexPlacement};
    use crate::locate::test_utilities::{single_triangle, split_triangle};
    use crate::locate::{HistoryDagLocator, QuadTreeLocator, WalkLocator};
    use crate::{
        DelaunayManager, EdgeFlipManager, Point2, TriangulationConfig, TriangulationError, Vertex,
    };

    #[test]
    fn test_single_triangle() -> Result<(), TriangulationError> {
        let vertices = [
            Vertex::new(0.0, 0.0),
            Vertex::new(1.0, 0.0),
            Vertex::new(0.0, 1.0),
        ];
        let mut manager = EdgeFlipManager::new(WalkLocator::new());
        manager.init(&vertices)?;
        let triangles = manager.triangulation()?;
        assert_eq!(triangles.len(), 1);
        for vertex in &vertices {
            assert!(triangles[0].contains_vertex(vertex.id()));
        }
        Ok(())
    }

    #[test]
    fn test_insert_on_edges() -> Result<(), TriangulationError> {
        // The center lies on the first diagonal
        let vertices = [
            Vertex::new(0.0, 0.0),
            Vertex::new(2.0, 0.0),
            Vertex::new(2.0, 2.0),
            Vertex::new(0.0, 2.0),
            Vertex::new(1.0, 1.0),
            Vertex::new(1.0, 0.0),
        ];
        let mut manager = EdgeFlipManager::new(HistoryDagLocator::new());
        manager.init(&vertices)?;
        let triangles = manager.triangulation()?;
        // 2n - h - 2 with n = 6 and h = 5
        assert_eq!(triangles.len(), 5);
        let center = vertices[4].id();
        assert_eq!(
            triangles.iter().filter(|t| t.contains_vertex(center)).count(),
            5
        );
        Ok(())
    }

    #[test]
    fn test_classify() -> Result<(), TriangulationError> {
        let mut locator = WalkLocator::new();
        let (mut mesh, root) = single_triangle(&mut locator)?;
        let added = split_triangle(&mut mesh, &mut locator, root, Point2::new(0.0, 0.0))?;
        let lower = added
            .iter()
            .copied()
            .find(|t| mesh.triangle(*t).contains(Point2::new(0.0, -5.0)))
            .expect("Lower triangle must exist");

        assert_eq!(
            classify(&mesh, lower, Point2::new(0.0, -5.0), 1e-9),
            VertexPlacement::Interior
        );
        match classify(&mesh, lower, Point2::new(0.0, -10.0), 1e-9) {
            VertexPlacement::OnEdge(edge) => assert!(mesh.edge(edge).is_outer_boundary()),
            other => panic!("Unexpected placement {:?}", other),
        }
        match classify(&mesh, lower, Point2::new(-5.0, -5.0), 1e-9) {
            VertexPlacement::OnEdge(edge) => assert!(!mesh.edge(edge).is_outer_boundary()),
            other => panic!("Unexpected placement {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_split_outer_edge() -> Result<(), TriangulationError> {
        let mut locator = WalkLocator::new();
        let (mut mesh, root) = single_triangle(&mut locator)?;
        let vertex = mesh.add_vertex(Vertex::new(0.0, -10.0));
        insert_vertex(
            &mut mesh,
            &mut locator,
            vertex,
            root,
            &TriangulationConfig::default(),
        )?;

        assert_eq!(mesh.num_triangles(), 2);
        // Both halves of the split edge remain on the outer boundary
        let outer_halves = mesh
            .triangles()
            .flat_map(|triangle| triangle.edges())
            .filter(|edge| {
                let edge = mesh.edge(*edge);
                edge.is_outer_boundary() && edge.has_vertex(vertex)
            })
            .count();
        assert_eq!(outer_halves, 2);
        mesh.sanity_check();
        Ok(())
    }

    #[test]
    fn test_hull_edge_of_flat_triangle_is_kept() -> Result<(), TriangulationError> {
        // The circumcircle of the first three vertices reaches far beyond the super-triangle
        let vertices = [
            Vertex::new(0.0, 0.0),
            Vertex::new(1.0, 0.0),
            Vertex::new(0.5, 1.0e-7),
            Vertex::new(0.5, 1.0),
        ];
        let mut manager = EdgeFlipManager::new(QuadTreeLocator::default());
        manager.init(&vertices)?;
        let triangles = manager.triangulation()?;
        assert_eq!(triangles.len(), 3);
        let (first, second) = (vertices[0].id(), vertices[1].id());
        assert!(triangles
            .iter()
            .any(|t| t.contains_vertex(first) && t.contains_vertex(second)));
        Ok(())
    }
}
