use smallvec::SmallVec;

use super::{LocatorHandle, LocatorSlots, PointLocator};
use crate::delaunay_core::{FixedTriangleHandle, Mesh};
use crate::{BoundingRect, Point2};

#[derive(Clone, Debug)]
struct DagNode {
    triangle: FixedTriangleHandle,
    children: SmallVec<[usize; 4]>,
}

/// Locates positions by descending a history of all triangles ever created.
///
/// Every triangle of a run corresponds to a node of a directed acyclic graph rooted at the
/// super-triangle. Whenever triangles are replaced, the nodes of the removed triangles receive
/// the overlapping added triangles as children. Locating descends from the root into any child
/// containing the query position until a node without children, which is always an active
/// triangle, is reached.
#[derive(Clone, Debug, Default)]
pub struct HistoryDagLocator {
    nodes: Vec<DagNode>,
}

impl HistoryDagLocator {
    /// Creates an empty locator. The history is built by [PointLocator::initialize].
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes, active or superseded, in the history.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn add_node(&mut self, slots: &mut LocatorSlots<'_>, triangle: FixedTriangleHandle) -> usize {
        let index = self.nodes.len();
        self.nodes.push(DagNode {
            triangle,
            children: SmallVec::new(),
        });
        slots.set_locator_handle(triangle, LocatorHandle::HistoryNode(index));
        index
    }
}

impl PointLocator for HistoryDagLocator {
    fn initialize(
        &mut self,
        slots: &mut LocatorSlots<'_>,
        super_triangle: FixedTriangleHandle,
        _: BoundingRect,
    ) {
        self.nodes.clear();
        self.add_node(slots, super_triangle);
    }

    fn locate(&mut self, mesh: &Mesh, position: Point2<f64>) -> Option<FixedTriangleHandle> {
        let root = self.nodes.first()?;
        if !mesh.triangle(root.triangle).contains(position) {
            return None;
        }

        let mut current = root;
        while !current.children.is_empty() {
            current = current
                .children
                .iter()
                .map(|child| &self.nodes[*child])
                .find(|child| mesh.triangle(child.triangle).contains(position))?;
        }

        let leaf = mesh.triangle(current.triangle);
        if leaf.is_removed() {
            None
        } else {
            Some(current.triangle)
        }
    }

    fn on_replace_triangles(
        &mut self,
        slots: &mut LocatorSlots<'_>,
        removed: &[FixedTriangleHandle],
        added: &[FixedTriangleHandle],
    ) {
        let added_nodes: SmallVec<[(usize, BoundingRect); 8]> = added
            .iter()
            .map(|triangle| {
                let rect = slots.triangle(*triangle).bounding_rect();
                (self.add_node(slots, *triangle), rect)
            })
            .collect();

        for triangle in removed {
            let parent = match slots.take_locator_handle(*triangle) {
                LocatorHandle::HistoryNode(index) => index,
                _ => continue,
            };
            let rect = slots.triangle(*triangle).bounding_rect();
            self.nodes[parent].children.extend(
                added_nodes
                    .iter()
                    .filter(|(_, child_rect)| child_rect.intersects(&rect))
                    .map(|(child, _)| *child),
            );
        }
    }
}
