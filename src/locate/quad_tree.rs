use hashbrown::HashSet;
use smallvec::SmallVec;

use super::{LocatorHandle, LocatorSlots, PointLocator};
use crate::delaunay_core::{FixedTriangleHandle, Mesh, TriangleEntry};
use crate::{BoundingRect, Point2, TriangulationConfig};

/// The largest depth a [QuadTreeLocator] accepts.
///
/// Each of its trees then holds 87381 buckets.
pub const MAX_QUAD_TREE_DEPTH: usize = 8;

/// A complete quad tree of fixed depth, stored in breadth first order.
///
/// The children of node `n` are the nodes `4 * n + 1` to `4 * n + 4`, ordered
/// lower left, lower right, upper left, upper right.
#[derive(Clone, Debug)]
struct QuadTree {
    lower: Point2<f64>,
    size: f64,
    depth: usize,
    buckets: Vec<HashSet<FixedTriangleHandle>>,
}

impl QuadTree {
    fn new(lower: Point2<f64>, size: f64, depth: usize) -> Self {
        let num_nodes = ((1usize << (2 * (depth + 1))) - 1) / 3;
        QuadTree {
            lower,
            size,
            depth,
            buckets: vec![HashSet::new(); num_nodes],
        }
    }

    fn root_rect(&self) -> BoundingRect {
        BoundingRect::from_corners(
            self.lower,
            Point2::new(self.lower.x + self.size, self.lower.y + self.size),
        )
    }

    /// Returns the deepest node whose square fully contains `rect`, and that node's level.
    fn insertion_node(&self, rect: &BoundingRect) -> (usize, usize) {
        let mut node = 0;
        let mut lower = self.lower;
        let mut size = self.size;
        if !self.root_rect().contains_rect(rect) {
            return (0, 0);
        }

        for level in 0..self.depth {
            size *= 0.5;
            let center = Point2::new(lower.x + size, lower.y + size);
            let quadrant_x = if rect.upper().x <= center.x {
                0
            } else if rect.lower().x >= center.x {
                1
            } else {
                return (node, level);
            };
            let quadrant_y = if rect.upper().y <= center.y {
                0
            } else if rect.lower().y >= center.y {
                1
            } else {
                return (node, level);
            };
            lower = Point2::new(
                lower.x + size * quadrant_x as f64,
                lower.y + size * quadrant_y as f64,
            );
            node = 4 * node + 1 + quadrant_x + 2 * quadrant_y;
        }
        (node, self.depth)
    }

    /// Returns the nodes from the root down to the leaf containing `position`.
    fn path(&self, position: Point2<f64>) -> SmallVec<[usize; 16]> {
        let mut result = SmallVec::new();
        result.push(0);
        if !self.root_rect().contains_point(position) {
            return result;
        }

        let mut node = 0;
        let mut lower = self.lower;
        let mut size = self.size;
        for _ in 0..self.depth {
            size *= 0.5;
            let quadrant_x = usize::from(position.x >= lower.x + size);
            let quadrant_y = usize::from(position.y >= lower.y + size);
            lower = Point2::new(
                lower.x + size * quadrant_x as f64,
                lower.y + size * quadrant_y as f64,
            );
            node = 4 * node + 1 + quadrant_x + 2 * quadrant_y;
            result.push(node);
        }
        result
    }
}

/// Locates positions with two overlaid quad trees.
///
/// Every active triangle is stored in the bucket of the deepest quad tree node that fully
/// contains the bounding box of the triangle and its circumcircle. Triangles straddling a
/// node border get stuck in a large bucket close to the root. To mitigate this, a second tree
/// is shifted diagonally against the first one and every triangle is stored in whichever tree
/// holds it deeper.
///
/// Locating scans the buckets along the query position's path in both trees, starting at the
/// leaves.
#[derive(Clone, Debug)]
pub struct QuadTreeLocator {
    depth: usize,
    trees: Vec<QuadTree>,
}

impl Default for QuadTreeLocator {
    fn default() -> Self {
        Self::new(TriangulationConfig::default().quad_tree_depth)
    }
}

impl QuadTreeLocator {
    /// Creates a locator whose trees have `depth` levels below their root.
    ///
    /// A tree of depth `d` allocates `(4^(d+1) - 1) / 3` buckets up front. Depths above
    /// [MAX_QUAD_TREE_DEPTH] are clamped to it.
    pub fn new(depth: usize) -> Self {
        if depth > MAX_QUAD_TREE_DEPTH {
            log::warn!(
                "Quad tree depth {} exceeds the maximum, using {}",
                depth,
                MAX_QUAD_TREE_DEPTH
            );
        }
        QuadTreeLocator {
            depth: depth.min(MAX_QUAD_TREE_DEPTH),
            trees: Vec::new(),
        }
    }

    /// Creates a locator using [TriangulationConfig::quad_tree_depth].
    pub fn with_config(config: &TriangulationConfig) -> Self {
        Self::new(config.quad_tree_depth)
    }

    /// The number of levels below each tree's root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn key_rect(triangle: &TriangleEntry) -> BoundingRect {
        let mut rect = triangle.bounding_rect();
        if let Some(circle) = triangle.circumcircle() {
            rect.add_rect(&circle.bounding_rect());
        }
        rect
    }

    fn insert(&mut self, slots: &mut LocatorSlots<'_>, triangle: FixedTriangleHandle) {
        let rect = Self::key_rect(slots.triangle(triangle));
        let mut best: Option<(usize, usize, usize)> = None;
        for (tree_index, tree) in self.trees.iter().enumerate() {
            let (node, level) = tree.insertion_node(&rect);
            if best.map_or(true, |(_, _, best_level)| level > best_level) {
                best = Some((tree_index, node, level));
            }
        }
        if let Some((tree, node, _)) = best {
            self.trees[tree].buckets[node].insert(triangle);
            slots.set_locator_handle(triangle, LocatorHandle::QuadTreeBucket { tree, node });
        }
    }
}

impl PointLocator for QuadTreeLocator {
    fn initialize(
        &mut self,
        slots: &mut LocatorSlots<'_>,
        super_triangle: FixedTriangleHandle,
        input_bounds: BoundingRect,
    ) {
        let center = input_bounds.center();
        let extent = input_bounds.width().max(input_bounds.height());
        let size = if extent > 0.0 { extent * 1.02 } else { 1.0 };
        let lower = Point2::new(center.x - size * 0.5, center.y - size * 0.5);
        let shift = size / 3.0;

        self.trees = vec![
            QuadTree::new(lower, size, self.depth),
            QuadTree::new(
                Point2::new(lower.x - shift, lower.y - shift),
                size + shift,
                self.depth,
            ),
        ];
        self.insert(slots, super_triangle);
    }

    fn locate(&mut self, mesh: &Mesh, position: Point2<f64>) -> Option<FixedTriangleHandle> {
        let paths: SmallVec<[_; 2]> = self.trees.iter().map(|tree| tree.path(position)).collect();
        let longest = paths.iter().map(|path| path.len()).max()?;

        for level in (0..longest).rev() {
            for (tree, path) in self.trees.iter().zip(&paths) {
                let Some(node) = path.get(level) else {
                    continue;
                };
                let found = tree.buckets[*node].iter().copied().find(|handle| {
                    let triangle = mesh.triangle(*handle);
                    !triangle.is_removed() && triangle.contains(position)
                });
                if found.is_some() {
                    return found;
                }
            }
        }
        None
    }

    fn on_replace_triangles(
        &mut self,
        slots: &mut LocatorSlots<'_>,
        removed: &[FixedTriangleHandle],
        added: &[FixedTriangleHandle],
    ) {
        for triangle in removed {
            if let LocatorHandle::QuadTreeBucket { tree, node } = slots.take_locator_handle(*triangle)
            {
                self.trees[tree].buckets[node].remove(triangle);
            }
        }
        for triangle in added {
            self.insert(slots, *triangle);
        }
    }
}
