use hashbrown::HashSet;
use smallvec::SmallVec;

use super::{triangulate, validate_input, DelaunayManager};
use crate::delaunay_core::{
    DelaunayEdgeList, FixedEdgeHandle, FixedTriangleHandle, FixedVertexHandle, Mesh,
};
use crate::locate::{HistoryDagLocator, PointLocator};
use crate::{Point2, Triangle, TriangulationConfig, TriangulationError, Vertex, VertexId};

/// Triangulates by re-triangulating the cavity of every new vertex (Bowyer-Watson).
///
/// All triangles whose circumcircle strictly contains the new vertex form a star shaped
/// cavity. The cavity is removed and its border is connected to the new vertex.
#[derive(Clone, Debug)]
pub struct WatsonManager<L: PointLocator = HistoryDagLocator> {
    locator: L,
    config: TriangulationConfig,
    vertices: Vec<Vertex>,
}

impl<L: PointLocator> WatsonManager<L> {
    /// Creates a manager with the default [TriangulationConfig].
    pub fn new(locator: L) -> Self {
        Self::with_config(locator, TriangulationConfig::default())
    }

    /// Creates a manager with a custom configuration.
    pub fn with_config(locator: L, config: TriangulationConfig) -> Self {
        WatsonManager {
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

impl<L: PointLocator> DelaunayManager for WatsonManager<L> {
    fn init(&mut self, vertices: &[Vertex]) -> Result<(), TriangulationError> {
        validate_input(vertices)?;
        self.vertices = vertices.to_vec();
        Ok(())
    }

    fn triangulation(&mut self) -> Result<Vec<Triangle>, TriangulationError> {
        let config = self.config;
        triangulate(&self.vertices, &config, &mut self.locator, insert_vertex::<L>)
    }
}

fn insert_vertex<L: PointLocator>(
    mesh: &mut Mesh,
    locator: &mut L,
    vertex: FixedVertexHandle,
    triangle: FixedTriangleHandle,
) -> Result<(), TriangulationError> {
    let position = mesh.vertex_position(vertex);
    let id = mesh.vertex(vertex).id();
    let cavity = find_cavity(mesh, triangle, position);
    log::trace!("Vertex {:?} conflicts with {} triangles", id, cavity.len());

    let mut border = DelaunayEdgeList::new();
    let mut inner_edges: SmallVec<[FixedEdgeHandle; 16]> = SmallVec::new();
    for triangle in &cavity {
        for edge in mesh.triangle(*triangle).edges() {
            if !border.exists(edge) {
                border.add_last(edge);
            } else if border.remove_non_boundary_edge(mesh, edge) {
                // Both adjacent triangles belong to the cavity
                inner_edges.push(edge);
            }
        }
    }

    for triangle in &cavity {
        mesh.remove_triangle(*triangle);
    }
    for edge in inner_edges {
        mesh.remove_edge(edge);
    }

    let contour = contourize(mesh, border, id)?;
    let added = fan_triangulate(mesh, vertex, &contour)?;
    locator.on_replace_triangles(&mut mesh.locator_slots(), &cavity, &added);
    Ok(())
}

/// Collects all triangles connected to `start` whose circumcircle strictly contains `position`.
fn find_cavity(
    mesh: &Mesh,
    start: FixedTriangleHandle,
    position: Point2<f64>,
) -> Vec<FixedTriangleHandle> {
    let mut cavity = Vec::new();
    let mut visited = HashSet::new();
    let mut work_list = vec![start];
    visited.insert(start);

    while let Some(current) = work_list.pop() {
        cavity.push(current);
        for edge in mesh.triangle(current).edges() {
            let Some(neighbor) = mesh.neighbor_across(current, edge) else {
                continue;
            };
            if !visited.insert(neighbor) {
                continue;
            }
            if mesh.circumcircle_contains(neighbor, position) {
                work_list.push(neighbor);
            }
        }
    }
    cavity
}

/// Orders the cavity border into a closed chain of edges.
///
/// Edges are flipped as needed such that the `to` vertex of every edge is the `from` vertex of
/// the next edge.
fn contourize(
    mesh: &mut Mesh,
    mut border: DelaunayEdgeList,
    vertex: VertexId,
) -> Result<Vec<FixedEdgeHandle>, TriangulationError> {
    let no_contour = TriangulationError::NoClosedContour(vertex);
    let first = border.pop_first().ok_or(no_contour)?;
    let start = mesh.edge(first).from();
    let mut tail = mesh.edge(first).to();
    let mut contour = Vec::with_capacity(border.len() + 1);
    contour.push(first);

    while !border.is_empty() {
        let index = border
            .iter()
            .position(|edge| mesh.edge(edge).has_vertex(tail))
            .ok_or(no_contour)?;
        let next = border.take(index).ok_or(no_contour)?;
        if mesh.edge(next).to() == tail {
            mesh.flip_edge_vertices(next);
        }
        tail = mesh.edge(next).to();
        contour.push(next);
    }

    if tail != start || contour.len() < 3 {
        return Err(no_contour);
    }
    Ok(contour)
}

/// Connects `vertex` with every edge of a closed contour.
fn fan_triangulate(
    mesh: &mut Mesh,
    vertex: FixedVertexHandle,
    contour: &[FixedEdgeHandle],
) -> Result<Vec<FixedTriangleHandle>, TriangulationError> {
    let mut added = Vec::with_capacity(contour.len());
    let Some(first) = contour.first() else {
        return Ok(added);
    };
    let first_spoke = mesh.add_edge(vertex, mesh.edge(*first).from(), false);
    let mut previous_spoke = first_spoke;

    for (index, edge) in contour.iter().enumerate() {
        let next_spoke = if index + 1 == contour.len() {
            first_spoke
        } else {
            mesh.add_edge(vertex, mesh.edge(*edge).to(), false)
        };
        added.push(mesh.create_triangle(*edge, previous_spoke, next_spoke)?);
        previous_spoke = next_spoke;
    }
    Ok(added)
}

#[cfg(test)]
mod test {
    use super::{contourize, find_cavity};
    use crate::delaunay_core::{DelaunayEdgeList, Mesh};
    use crate::locate::test_utilities::{single_triangle, split_triangle};
    use crate::locate::{QuadTreeLocator, WalkLocator};
    use crate::{DelaunayManager, Point2, TriangulationError, Vertex, VertexId, WatsonManager};

    #[test]
    fn test_square_with_center() -> Result<(), TriangulationError> {
        let vertices = [
            Vertex::new(0.0, 0.0),
            Vertex::new(1.0, 0.0),
            Vertex::new(1.0, 1.0),
            Vertex::new(0.0, 1.0),
            Vertex::new(0.5, 0.5),
        ];
        let mut manager = WatsonManager::new(QuadTreeLocator::default());
        manager.init(&vertices)?;
        let triangles = manager.triangulation()?;
        assert_eq!(triangles.len(), 4);
        assert!(triangles.iter().all(|t| t.contains_vertex(vertices[4].id())));
        Ok(())
    }

    #[test]
    fn test_find_cavity() -> Result<(), TriangulationError> {
        let mut locator = WalkLocator::new();
        let (mut mesh, root) = single_triangle(&mut locator)?;
        let added = split_triangle(&mut mesh, &mut locator, root, Point2::new(0.0, 0.0))?;

        let containing = |position: Point2<f64>| {
            added
                .iter()
                .copied()
                .find(|t| mesh.triangle(*t).contains(position))
                .expect("Position must be inside of the mesh")
        };

        // Inside the circumcircles of the right and the lower triangle
        let position = Point2::new(0.1, -0.01);
        let right = containing(position);
        let lower = containing(Point2::new(0.0, -9.0));
        let mut cavity = find_cavity(&mesh, right, position);
        cavity.sort();
        let mut expected = vec![right, lower];
        expected.sort();
        assert_eq!(cavity, expected);

        // Close to the bottom edge, only the lower triangle is affected
        let cavity = find_cavity(&mesh, lower, Point2::new(0.0, -9.0));
        assert_eq!(cavity, vec![lower]);
        Ok(())
    }

    #[test]
    fn test_contourize() -> Result<(), TriangulationError> {
        let mut mesh = Mesh::new();
        let v: Vec<_> = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
            .iter()
            .map(|(x, y)| mesh.add_vertex(Vertex::new(*x, *y)))
            .collect();
        let e0 = mesh.add_edge(v[0], v[1], false);
        // Reversed orientation
        let e1 = mesh.add_edge(v[2], v[1], false);
        let e2 = mesh.add_edge(v[3], v[0], false);
        let e3 = mesh.add_edge(v[2], v[3], false);

        let mut border = DelaunayEdgeList::new();
        for edge in [e0, e2, e1, e3] {
            border.add_last(edge);
        }
        let contour = contourize(&mut mesh, border, VertexId::synthetic(0))?;
        assert_eq!(contour, vec![e0, e1, e3, e2]);
        for (index, edge) in contour.iter().enumerate() {
            let next = contour[(index + 1) % contour.len()];
            assert_eq!(mesh.edge(*edge).to(), mesh.edge(next).from());
        }

        // An open chain
        let mut border = DelaunayEdgeList::new();
        for edge in [e0, e1, e3] {
            border.add_last(edge);
        }
        assert_eq!(
            contourize(&mut mesh, border, VertexId::synthetic(0)),
            Err(TriangulationError::NoClosedContour(VertexId::synthetic(0)))
        );
        Ok(())
    }
}
