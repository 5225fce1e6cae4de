//! Point location strategies.
//!
//! A [PointLocator] answers "which triangle contains this position" for a
//! [DelaunayManager](crate::DelaunayManager). The manager owns the [Mesh] and notifies the
//! locator after every local retriangulation. Three strategies are provided:
//!  - [HistoryDagLocator]: keeps every superseded triangle in a directed acyclic graph and
//!    descends from the super-triangle. `O(log(n))` amortized for random insertion order.
//!  - [WalkLocator]: walks across neighboring triangles, starting at the last located triangle.
//!    Constant time for spatially coherent insertion order, `O(sqrt(n))` otherwise.
//!  - [QuadTreeLocator]: buckets triangles into two overlaid fixed depth quad trees.

mod history_dag;
mod quad_tree;
mod walk;

pub use history_dag::HistoryDagLocator;
pub use quad_tree::{QuadTreeLocator, MAX_QUAD_TREE_DEPTH};
pub use walk::WalkLocator;

use crate::delaunay_core::{FixedTriangleHandle, Mesh, TriangleEntry};
use crate::{BoundingRect, Point2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Locator owned annotation stored on every triangle.
///
/// Only the active [PointLocator] writes and reads this value. It is a weak reference into the
/// locator's own index, the mesh never interprets it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LocatorHandle {
    /// The triangle is not annotated.
    #[default]
    None,
    /// Index of the triangle's node in a [HistoryDagLocator].
    HistoryNode(usize),
    /// The bucket of a [QuadTreeLocator] the triangle is stored in.
    QuadTreeBucket {
        /// Which of the two overlaid trees
        tree: usize,
        /// Node index within that tree
        node: usize,
    },
}

/// The view of the mesh handed to a locator during updates.
///
/// Geometry and topology are read-only, the only writable state is the triangles'
/// [LocatorHandle].
pub struct LocatorSlots<'a> {
    mesh: &'a mut Mesh,
}

impl<'a> LocatorSlots<'a> {
    pub(crate) fn new(mesh: &'a mut Mesh) -> Self {
        LocatorSlots { mesh }
    }

    /// Read access to the whole mesh.
    pub fn mesh(&self) -> &Mesh {
        self.mesh
    }

    /// Returns a triangle, removed or not.
    pub fn triangle(&self, handle: FixedTriangleHandle) -> &TriangleEntry {
        self.mesh.triangle(handle)
    }

    /// Annotates a triangle.
    pub fn set_locator_handle(&mut self, triangle: FixedTriangleHandle, handle: LocatorHandle) {
        self.mesh.set_locator_handle(triangle, handle);
    }

    /// Returns the triangle's annotation and resets it to [LocatorHandle::None].
    pub fn take_locator_handle(&mut self, triangle: FixedTriangleHandle) -> LocatorHandle {
        self.mesh.take_locator_handle(triangle)
    }
}

/// Maps query positions to triangles of a [Mesh].
///
/// Implementations keep an index over the mesh's active triangles. The index is only ever
/// updated through [PointLocator::initialize] and [PointLocator::on_replace_triangles], a
/// locator never changes the mesh's topology.
pub trait PointLocator {
    /// Resets the index for a new run that starts with a single `super_triangle`.
    ///
    /// `input_bounds` is the bounding rectangle of all vertices that will be inserted.
    fn initialize(
        &mut self,
        slots: &mut LocatorSlots<'_>,
        super_triangle: FixedTriangleHandle,
        input_bounds: BoundingRect,
    );

    /// Returns an active triangle that contains `position` in its closed interior.
    ///
    /// Such a triangle also contains `position` within its circumcircle. Returns `None` if no
    /// such triangle could be found.
    fn locate(&mut self, mesh: &Mesh, position: Point2<f64>) -> Option<FixedTriangleHandle>;

    /// Updates the index after `removed` triangles were replaced by `added` triangles.
    ///
    /// The removed triangles are already detached from the mesh but their geometry and
    /// annotations are still readable.
    fn on_replace_triangles(
        &mut self,
        slots: &mut LocatorSlots<'_>,
        removed: &[FixedTriangleHandle],
        added: &[FixedTriangleHandle],
    );
}

impl<L: PointLocator + ?Sized> PointLocator for Box<L> {
    fn initialize(
        &mut self,
        slots: &mut LocatorSlots<'_>,
        super_triangle: FixedTriangleHandle,
        input_bounds: BoundingRect,
    ) {
        (**self).initialize(slots, super_triangle, input_bounds)
    }

    fn locate(&mut self, mesh: &Mesh, position: Point2<f64>) -> Option<FixedTriangleHandle> {
        (**self).locate(mesh, position)
    }

    fn on_replace_triangles(
        &mut self,
        slots: &mut LocatorSlots<'_>,
        removed: &[FixedTriangleHandle],
        added: &[FixedTriangleHandle],
    ) {
        (**self).on_replace_triangles(slots, removed, added)
    }
}

/// Returns an active triangle containing `position` by testing all triangles.
pub(crate) fn locate_by_scan(mesh: &Mesh, position: Point2<f64>) -> Option<FixedTriangleHandle> {
    mesh.triangles()
        .find(|triangle| triangle.contains(position))
        .map(|triangle| triangle.handle())
}

#[cfg(test)]
pub(crate) mod test_utilities {
    use super::{LocatorSlots, PointLocator};
    use crate::delaunay_core::{FixedTriangleHandle, Mesh};
    use crate::{BoundingRect, Point2, TriangulationError, Vertex};

    /// A single triangle registered at a locator.
    pub fn single_triangle<L: PointLocator>(
        locator: &mut L,
    ) -> Result<(Mesh, FixedTriangleHandle), TriangulationError> {
        let mut mesh = Mesh::new();
        let v0 = mesh.add_super_corner(0, Point2::new(-10.0, -10.0));
        let v1 = mesh.add_super_corner(1, Point2::new(10.0, -10.0));
        let v2 = mesh.add_super_corner(2, Point2::new(0.0, 10.0));
        let e0 = mesh.add_edge(v1, v2, true);
        let e1 = mesh.add_edge(v2, v0, true);
        let e2 = mesh.add_edge(v0, v1, true);
        let root = mesh.create_triangle(e0, e1, e2)?;
        let bounds = BoundingRect::from_corners(Point2::new(-1.0, -1.0), Point2::new(1.0, 1.0));
        locator.initialize(&mut LocatorSlots::new(&mut mesh), root, bounds);
        Ok((mesh, root))
    }

    /// Splits `triangle` into three triangles around a new vertex at `position`.
    pub fn split_triangle<L: PointLocator>(
        mesh: &mut Mesh,
        locator: &mut L,
        triangle: FixedTriangleHandle,
        position: Point2<f64>,
    ) -> Result<Vec<FixedTriangleHandle>, TriangulationError> {
        let entry = mesh.triangle(triangle);
        let vertices = entry.vertices();
        let edges = entry.edges();
        let center = mesh.add_vertex(Vertex::new(position.x, position.y));
        mesh.remove_triangle(triangle);

        let spokes: Vec<_> = vertices
            .iter()
            .map(|v| mesh.add_edge(center, *v, false))
            .collect();
        let mut added = Vec::new();
        for i in 0..3 {
            added.push(mesh.create_triangle(edges[i], spokes[(i + 1) % 3], spokes[(i + 2) % 3])?);
        }
        locator.on_replace_triangles(&mut LocatorSlots::new(mesh), &[triangle], &added);
        Ok(added)
    }

    /// Splits the triangles that contain the given positions one after another and checks
    /// that every position remains locatable.
    pub fn check_locator<L: PointLocator>(mut locator: L) -> Result<(), TriangulationError> {
        let (mut mesh, _) = single_triangle(&mut locator)?;
        let positions = [
            Point2::new(0.0, 0.0),
            Point2::new(0.5, 0.5),
            Point2::new(-0.5, 0.25),
            Point2::new(0.25, -0.75),
            Point2::new(-0.8, -0.9),
            Point2::new(0.9, 0.1),
        ];
        for (index, position) in positions.iter().enumerate() {
            let triangle = locator
                .locate(&mesh, *position)
                .expect("Position must be locatable");
            assert!(mesh.triangle(triangle).contains(*position));
            split_triangle(&mut mesh, &mut locator, triangle, *position)?;
            for previous in &positions[..=index] {
                let found = locator
                    .locate(&mesh, *previous)
                    .expect("Inserted position must be locatable");
                assert!(!mesh.triangle(found).is_removed());
                assert!(mesh.triangle(found).contains(*previous));
            }
        }
        mesh.sanity_check();

        for query in [Point2::new(3.0, -2.0), Point2::new(-5.0, -9.0), Point2::new(0.0, 9.0)] {
            let found = locator.locate(&mesh, query).expect("Query must be locatable");
            assert!(mesh.triangle(found).contains(query));
        }
        assert_eq!(locator.locate(&mesh, Point2::new(100.0, 100.0)), None);
        Ok(())
    }
}
