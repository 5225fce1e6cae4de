//! Incremental triangulation algorithms.
//!
//! A [DelaunayManager] is constructed with an already chosen [PointLocator] and triangulates
//! the vertices passed to [DelaunayManager::init]. Two algorithms are available:
//!  - [EdgeFlipManager] splits the triangle containing a new vertex and restores the Delaunay
//!    property by flipping illegal edges.
//!  - [WatsonManager] removes every triangle whose circumcircle contains the new vertex and
//!    connects the new vertex with the border of the resulting cavity.
//!
//! Both algorithms start with a super-triangle that encloses all input vertices and remove
//! every triangle touching one of its corners once all vertices are inserted.

mod edge_flip;
mod watson;


pub use edge_flip::EdgeFlipManager;
pub use watson::WatsonManager;

use crate::delaunay_core::{math, FixedTriangleHandle, FixedVertexHandle, Mesh};
use crate::locate::PointLocator;
use crate::{
    validate_vertex, BoundingRect, Triangle, TriangulationConfig, TriangulationError, Vertex,
};

/// Builds a Delaunay triangulation from a set of vertices.
///
/// # Example
/// ```
/// use incremental_delaunay::{DelaunayManager, EdgeFlipManager, Vertex, WalkLocator};
///
/// # fn main() -> Result<(), incremental_delaunay::TriangulationError> {
/// let mut manager = EdgeFlipManager::new(WalkLocator::new());
/// manager.init(&[
///     Vertex::new(0.0, 0.0),
///     Vertex::new(1.0, 0.0),
///     Vertex::new(0.0, 1.0),
///     Vertex::new(1.0, 1.0),
/// ])?;
/// let triangles = manager.triangulation()?;
/// assert_eq!(triangles.len(), 2);
/// # Ok(())
/// # }
/// ```
pub trait DelaunayManager {
    /// Sets the vertices of the next triangulation.
    ///
    /// The vertices are copied. Fails with [TriangulationError::InvalidCoordinate] if any
    /// coordinate is NaN, infinite or outside of the supported range, in which case the
    /// previously set vertices are kept.
    fn init(&mut self, vertices: &[Vertex]) -> Result<(), TriangulationError>;

    /// Triangulates the vertices given to [DelaunayManager::init].
    ///
    /// Vertices are inserted in the given order. Vertices coinciding with an already inserted
    /// vertex are skipped. Returns an empty list if there are fewer than three vertices or if
    /// all vertices are collinear.
    fn triangulation(&mut self) -> Result<Vec<Triangle>, TriangulationError>;
}

/// Checks all vertices before any state is changed.
pub(crate) fn validate_input(vertices: &[Vertex]) -> Result<(), TriangulationError> {
    for vertex in vertices {
        validate_vertex(vertex).map_err(|source| TriangulationError::InvalidCoordinate {
            vertex: vertex.id(),
            source,
        })?;
    }
    Ok(())
}

/// Returns `true` if the vertices cannot form a single triangle.
pub(crate) fn is_degenerate_input(vertices: &[Vertex]) -> bool {
    let Some(first) = vertices.first().map(|v| v.position()) else {
        return true;
    };
    let Some(second) = vertices
        .iter()
        .map(|v| v.position())
        .find(|p| *p != first)
    else {
        return true;
    };
    vertices
        .iter()
        .all(|v| math::side_query(first, second, v.position()).is_on_line())
}

fn create_super_triangle(
    input_bounds: &BoundingRect,
    config: &TriangulationConfig,
    num_vertices: usize,
) -> Result<(Mesh, FixedTriangleHandle), TriangulationError> {
    let center = input_bounds.center();
    let extent = input_bounds.width().max(input_bounds.height());
    let radius = config.super_triangle_scale * if extent > 0.0 { extent } else { 1.0 };

    let corners = math::SUPER_CORNER_DIRECTIONS.map(|direction| center.add(direction.mul(radius)));

    let mut mesh = Mesh::with_capacity(num_vertices + corners.len());
    let [v0, v1, v2] = [0, 1, 2].map(|corner| mesh.add_super_corner(corner, corners[corner]));
    let e0 = mesh.add_edge(v1, v2, true);
    let e1 = mesh.add_edge(v2, v0, true);
    let e2 = mesh.add_edge(v0, v1, true);
    let triangle = mesh.create_triangle(e0, e1, e2)?;
    Ok((mesh, triangle))
}

/// The largest coincidence tolerance relative to the input's extent.
const MAX_RELATIVE_VERTEX_TOLERANCE: f64 = 1e-6;

/// Returns the configured vertex tolerance, limited by the extent of the input.
fn vertex_tolerance(input_bounds: &BoundingRect, config: &TriangulationConfig) -> f64 {
    let extent = input_bounds.width().max(input_bounds.height());
    let limit = extent * MAX_RELATIVE_VERTEX_TOLERANCE;
    if config.vertex_tolerance > limit {
        log::debug!(
            "Vertex tolerance {} is too large for an input extent of {}, using {}",
            config.vertex_tolerance,
            extent,
            limit
        );
        limit
    } else {
        config.vertex_tolerance
    }
}

/// Returns a vertex of `triangle` that lies within `tolerance` of `vertex`.
fn coincident_vertex(
    mesh: &Mesh,
    triangle: FixedTriangleHandle,
    vertex: &Vertex,
    tolerance: f64,
) -> Option<FixedVertexHandle> {
    mesh.triangle(triangle)
        .vertices()
        .into_iter()
        .find(|corner| mesh.vertex(*corner).coincides_with(vertex, tolerance))
}

fn collect_triangles(mesh: &Mesh) -> Vec<Triangle> {
    mesh.triangles()
        .filter(|triangle| {
            !triangle
                .vertices()
                .iter()
                .any(|vertex| mesh.is_synthetic(*vertex))
        })
        .map(|triangle| Triangle::new(triangle.vertices().map(|vertex| *mesh.vertex(vertex))))
        .collect()
}

/// Runs a full triangulation.
///
/// Locates every vertex and skips coincident ones. All other vertices are added to the mesh
/// and handed to `insert` together with the triangle containing them.
pub(crate) fn triangulate<L, F>(
    vertices: &[Vertex],
    config: &TriangulationConfig,
    locator: &mut L,
    mut insert: F,
) -> Result<Vec<Triangle>, TriangulationError>
where
    L: PointLocator,
    F: FnMut(
        &mut Mesh,
        &mut L,
        FixedVertexHandle,
        FixedTriangleHandle,
    ) -> Result<(), TriangulationError>,
{
    if is_degenerate_input(vertices) {
        log::debug!(
            "{} vertices do not span a triangle, returning an empty triangulation",
            vertices.len()
        );
        return Ok(Vec::new());
    }

    log::debug!("Triangulating {} vertices", vertices.len());
    let input_bounds = BoundingRect::from_points(vertices.iter().map(|v| v.position()));
    let tolerance = vertex_tolerance(&input_bounds, config);
    let (mut mesh, super_triangle) = create_super_triangle(&input_bounds, config, vertices.len())?;
    locator.initialize(&mut mesh.locator_slots(), super_triangle, input_bounds);

    let mut num_skipped = 0;
    for vertex in vertices {
        let Some(triangle) = locator.locate(&mesh, vertex.position()) else {
            log::warn!(
                "Could not locate vertex {:?} at {:?}",
                vertex.id(),
                vertex.position()
            );
            return Err(TriangulationError::LocationFailed(vertex.id()));
        };

        if let Some(existing) = coincident_vertex(&mesh, triangle, vertex, tolerance)
        {
            log::trace!(
                "Vertex {:?} coincides with {:?}, skipping",
                vertex.id(),
                mesh.vertex(existing).id()
            );
            num_skipped += 1;
            continue;
        }

        let handle = mesh.add_vertex(*vertex);
        if let Err(error) = insert(&mut mesh, &mut *locator, handle, triangle) {
            log::warn!("Inserting vertex {:?} failed: {}", vertex.id(), error);
            return Err(error);
        }
    }

    let result = collect_triangles(&mesh);
    log::debug!(
        "Triangulation finished with {} triangles, {} coincident vertices skipped",
        result.len(),
        num_skipped
    );
    Ok(result)
}
