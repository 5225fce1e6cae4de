//! Handles to the elements of a [Mesh](super::Mesh).
//!
//! Vertices, edges and triangles live in arenas owned by the mesh. They reference each
//! other by _fixed handles_, which are plain typed indices into these arenas. A handle
//! stays valid for the whole triangulation run: removed elements are marked as removed
//! but their slots are never reused.

use std::convert::TryInto;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Internal type definition that is only exposed for documentation purposes.
///
/// Use the type aliases [FixedVertexHandle], [FixedEdgeHandle] and [FixedTriangleHandle].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixedHandleImpl<Type> {
    index: u32,
    ty: Type,
}

impl<Type: ElementTag> std::fmt::Debug for FixedHandleImpl<Type> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(Type::debug_string())
            .field("index", &self.index)
            .finish()
    }
}

impl<Type: Default> FixedHandleImpl<Type> {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index: index
                .try_into()
                .expect("Index too big - at most 2^32 elements supported"),
            ty: Type::default(),
        }
    }

    /// Returns the index of the referenced element within its arena.
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

/// Marker trait for the handle tags.
///
/// There should be no need to implement this.
pub trait ElementTag:
    Clone + Copy + PartialEq + Eq + PartialOrd + Ord + std::fmt::Debug + Default + std::hash::Hash
{
    /// Name used by the handle's `Debug` output.
    fn debug_string() -> &'static str;
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
/// Tag of [FixedVertexHandle].
pub struct VertexTag;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
/// Tag of [FixedEdgeHandle].
pub struct EdgeTag;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
/// Tag of [FixedTriangleHandle].
pub struct TriangleTag;

impl ElementTag for VertexTag {
    fn debug_string() -> &'static str {
        "FixedVertexHandle"
    }
}

impl ElementTag for EdgeTag {
    fn debug_string() -> &'static str {
        "FixedEdgeHandle"
    }
}

impl ElementTag for TriangleTag {
    fn debug_string() -> &'static str {
        "FixedTriangleHandle"
    }
}

/// Fixed handle to a vertex of a [Mesh](super::Mesh).
pub type FixedVertexHandle = FixedHandleImpl<VertexTag>;

/// Fixed handle to an edge of a [Mesh](super::Mesh).
pub type FixedEdgeHandle = FixedHandleImpl<EdgeTag>;

/// Fixed handle to a triangle of a [Mesh](super::Mesh).
pub type FixedTriangleHandle = FixedHandleImpl<TriangleTag>;
