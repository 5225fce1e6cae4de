#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tunable parameters of a triangulation run.
///
/// # Example
/// ```
/// use incremental_delaunay::TriangulationConfig;
///
/// let config = TriangulationConfig::default()
///     .with_vertex_tolerance(1e-6)
///     .with_quad_tree_depth(8);
/// assert_eq!(config.quad_tree_depth, 8);
/// ```
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TriangulationConfig {
    /// Vertices closer than this distance to an existing vertex are considered duplicates and
    /// are skipped.
    ///
    /// The distance is absolute, but a triangulation never uses more than a millionth of the
    /// input's extent. Inputs smaller than the tolerance therefore keep their vertices.
    pub vertex_tolerance: f64,

    /// Distance used by [EdgeEntry::is_on_edge](crate::delaunay_core::EdgeEntry::is_on_edge).
    pub edge_epsilon: f64,

    /// Size of the super-triangle relative to the extent of the input vertices.
    pub super_triangle_scale: f64,

    /// Number of levels below the root of each tree of a [QuadTreeLocator](crate::QuadTreeLocator).
    ///
    /// Values above [MAX_QUAD_TREE_DEPTH](crate::MAX_QUAD_TREE_DEPTH) are clamped.
    pub quad_tree_depth: usize,
}

impl Default for TriangulationConfig {
    fn default() -> Self {
        TriangulationConfig {
            vertex_tolerance: 1e-9,
            edge_epsilon: 1e-9,
            super_triangle_scale: 1e5,
            quad_tree_depth: 6,
        }
    }
}

impl TriangulationConfig {
    /// Sets [TriangulationConfig::vertex_tolerance].
    pub fn with_vertex_tolerance(mut self, vertex_tolerance: f64) -> Self {
        self.vertex_tolerance = vertex_tolerance;
        self
    }

    /// Sets [TriangulationConfig::edge_epsilon].
    pub fn with_edge_epsilon(mut self, edge_epsilon: f64) -> Self {
        self.edge_epsilon = edge_epsilon;
        self
    }

    /// Sets [TriangulationConfig::super_triangle_scale].
    pub fn with_super_triangle_scale(mut self, super_triangle_scale: f64) -> Self {
        self.super_triangle_scale = super_triangle_scale;
        self
    }

    /// Sets [TriangulationConfig::quad_tree_depth].
    pub fn with_quad_tree_depth(mut self, quad_tree_depth: usize) -> Self {
        self.quad_tree_depth = quad_tree_depth;
        self
    }
}
