use super::{locate_by_scan, LocatorSlots, PointLocator};
use crate::delaunay_core::{math, FixedTriangleHandle, Mesh};
use crate::{BoundingRect, Point2};

/// Locates positions by walking across neighboring triangles.
///
/// The walk starts at the triangle that was located or created last. Each step crosses an edge
/// that separates the current triangle from the query position. The walk is fast if
/// consecutive queries are spatially close.
///
/// Walks are guaranteed to terminate on Delaunay triangulations. If a walk takes more steps
/// than there are triangles, the locator falls back to testing every triangle.
#[derive(Clone, Debug, Default)]
pub struct WalkLocator {
    last: Option<FixedTriangleHandle>,
}

impl WalkLocator {
    /// Creates a locator without a start triangle.
    pub fn new() -> Self {
        Self::default()
    }

    fn start(&self, mesh: &Mesh) -> Option<FixedTriangleHandle> {
        match self.last {
            Some(last) if !mesh.triangle(last).is_removed() => Some(last),
            _ => mesh.triangles().next().map(|t| t.handle()),
        }
    }
}

impl PointLocator for WalkLocator {
    fn initialize(
        &mut self,
        _: &mut LocatorSlots<'_>,
        super_triangle: FixedTriangleHandle,
        _: BoundingRect,
    ) {
        self.last = Some(super_triangle);
    }

    fn locate(&mut self, mesh: &Mesh, position: Point2<f64>) -> Option<FixedTriangleHandle> {
        let mut current = self.start(mesh)?;
        let max_steps = mesh.num_triangles() + 1;

        for step in 0..max_steps {
            let triangle = mesh.triangle(current);
            let positions = triangle.positions();
            // Rotate the first tested edge to avoid cycling on degenerate configurations
            let outside = (0..3).map(|i| (i + step) % 3).find(|i| {
                let from = positions[(i + 1) % 3];
                let to = positions[(i + 2) % 3];
                math::side_query(from, to, position).is_on_right_side()
            });

            match outside {
                None => {
                    self.last = Some(current);
                    return Some(current);
                }
                Some(index) => {
                    // Stepping over the outer boundary: the position lies outside of the mesh
                    current = mesh.neighbor_across(current, triangle.edges()[index])?;
                }
            }
        }

        log::trace!("Walk did not terminate, scanning all triangles");
        let result = locate_by_scan(mesh, position);
        if result.is_some() {
            self.last = result;
        }
        result
    }

    fn on_replace_triangles(
        &mut self,
        _: &mut LocatorSlots<'_>,
        _: &[FixedTriangleHandle],
        added: &[FixedTriangleHandle],
    ) {
        if let Some(first) = added.first() {
            self.last = Some(*first);
        }
    }
}
