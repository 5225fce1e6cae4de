use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{HasPosition, Point2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

static NEXT_VERTEX_ID: AtomicUsize = AtomicUsize::new(0);

/// Identity of a [Vertex].
///
/// Two vertices are considered the same vertex if and only if their ids are equal,
/// regardless of their coordinates.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VertexId(usize);

impl VertexId {
    /// Returns the raw id value.
    pub fn index(&self) -> usize {
        self.0
    }

    /// Ids of the super-triangle corners, counted down from `usize::MAX`.
    pub(crate) fn synthetic(corner: usize) -> Self {
        VertexId(usize::MAX - corner)
    }
}

/// An identity-bearing, immutable 2D point.
///
/// Vertices created by [Vertex::new] receive a process-unique id taken from a monotonic counter.
/// The counter can be reset between independent triangulation runs with [Vertex::reset_ids].
///
/// # Example
/// ```
/// use incremental_delaunay::Vertex;
///
/// let v0 = Vertex::new(0.0, 0.0);
/// let v1 = Vertex::new(0.0, 0.0);
/// // Same coordinates, different identity
/// assert_ne!(v0.id(), v1.id());
/// assert!(v0.coincides_with(&v1, 0.0));
/// ```
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    id: VertexId,
    position: Point2<f64>,
}

impl Vertex {
    /// Creates a vertex with a fresh id.
    pub fn new(x: f64, y: f64) -> Self {
        Self::with_id(Self::next_id(), Point2::new(x, y))
    }

    /// Creates a vertex with a fresh id from anything that has a position.
    pub fn from_position<P: HasPosition>(source: &P) -> Self {
        Self::with_id(Self::next_id(), source.position().to_f64())
    }

    /// Creates a vertex with an explicitly given id.
    ///
    /// The caller is responsible for keeping ids unique within a triangulation run.
    pub fn with_id(id: VertexId, position: Point2<f64>) -> Self {
        Self { id, position }
    }

    /// Resets the id counter used by [Vertex::new].
    ///
    /// Vertices created before the reset may share ids with vertices created afterwards.
    pub fn reset_ids() {
        NEXT_VERTEX_ID.store(0, Ordering::Relaxed);
    }

    fn next_id() -> VertexId {
        VertexId(NEXT_VERTEX_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns this vertex' identity.
    pub fn id(&self) -> VertexId {
        self.id
    }

    /// Returns this vertex' position.
    pub fn position(&self) -> Point2<f64> {
        self.position
    }

    /// The vertex' x coordinate
    pub fn x(&self) -> f64 {
        self.position.x
    }

    /// The vertex' y coordinate
    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// Returns `true` if both vertices have the same identity.
    pub fn is_same_vertex(&self, other: &Vertex) -> bool {
        self.id == other.id
    }

    /// Returns `true` if the distance between both vertices is at most `tolerance`.
    pub fn coincides_with(&self, other: &Vertex, tolerance: f64) -> bool {
        self.position.distance_2(other.position) <= tolerance * tolerance
    }
}

impl HasPosition for Vertex {
    type Scalar = f64;

    fn position(&self) -> Point2<f64> {
        self.position
    }
}
