use std::collections::VecDeque;

use super::{FixedEdgeHandle, Mesh};

/// An ordered list of edges used to collect the border of a cavity.
#[derive(Clone, Debug, Default)]
pub struct DelaunayEdgeList {
    edges: VecDeque<FixedEdgeHandle>,
}

impl DelaunayEdgeList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends an edge.
    pub fn add_first(&mut self, edge: FixedEdgeHandle) {
        self.edges.push_front(edge);
    }

    /// Appends an edge.
    pub fn add_last(&mut self, edge: FixedEdgeHandle) {
        self.edges.push_back(edge);
    }

    /// Returns `true` if the list contains `edge`. Linear in the list's length.
    pub fn exists(&self, edge: FixedEdgeHandle) -> bool {
        self.edges.contains(&edge)
    }

    /// Removes `edge` unless it is an outer boundary edge of the mesh.
    ///
    /// Returns `true` if the edge was removed.
    pub fn remove_non_boundary_edge(&mut self, mesh: &Mesh, edge: FixedEdgeHandle) -> bool {
        if mesh.edge(edge).is_outer_boundary() {
            return false;
        }
        match self.edges.iter().position(|e| *e == edge) {
            Some(index) => {
                self.edges.remove(index);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the first edge.
    pub fn pop_first(&mut self) -> Option<FixedEdgeHandle> {
        self.edges.pop_front()
    }

    /// Removes the edge at `index`, shifting all later edges.
    pub fn take(&mut self, index: usize) -> Option<FixedEdgeHandle> {
        self.edges.remove(index)
    }

    /// The first edge, if any.
    pub fn first(&self) -> Option<FixedEdgeHandle> {
        self.edges.front().copied()
    }

    /// The last edge, if any.
    pub fn last(&self) -> Option<FixedEdgeHandle> {
        self.edges.back().copied()
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the list holds no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Removes all edges.
    pub fn clear(&mut self) {
        self.edges.clear();
    }

    /// Iterates over all edges in order.
    pub fn iter(&self) -> impl Iterator<Item = FixedEdgeHandle> + '_ {
        self.edges.iter().copied()
    }
}
