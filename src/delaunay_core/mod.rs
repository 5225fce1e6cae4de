//! The triangle mesh shared by all managers and locators, plus its geometric predicates.

mod edge;
mod edge_list;
mod handles;
mod line_side_info;
mod mesh;
mod triangle;

pub(crate) mod math;

pub use edge::{EdgeEntry, LineEquation};
pub use edge_list::DelaunayEdgeList;
pub use handles::*;
pub use line_side_info::LineSideInfo;
pub use mesh::Mesh;
pub use triangle::{Circumcircle, TriangleEntry};
