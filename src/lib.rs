//! # Incremental Delaunay
//!
//! Incremental planar Delaunay triangulation with pluggable point location.
//!
//! # Features
//!  * Two insertion algorithms: edge flip legalization ([EdgeFlipManager]) and cavity
//!    re-triangulation ([WatsonManager]).
//!  * Three point location strategies: a history DAG ([HistoryDagLocator]), a walk across
//!    neighboring triangles ([WalkLocator]) and two overlaid quad trees ([QuadTreeLocator]).
//!  * Uses exact geometric predicates to avoid floating point rounding issues.
//!  * Duplicate vertices are detected and skipped.
//!
//! # Example
//! ```
//! use incremental_delaunay::{DelaunayManager, QuadTreeLocator, Vertex, WatsonManager};
//!
//! # fn main() -> Result<(), incremental_delaunay::TriangulationError> {
//! let vertices = [
//!     Vertex::new(0.0, 0.0),
//!     Vertex::new(1.0, 0.0),
//!     Vertex::new(1.0, 1.0),
//!     Vertex::new(0.0, 1.0),
//!     Vertex::new(0.5, 0.5),
//! ];
//!
//! let mut manager = WatsonManager::new(QuadTreeLocator::default());
//! manager.init(&vertices)?;
//! let triangles = manager.triangulation()?;
//! assert_eq!(triangles.len(), 4);
//! # Ok(())
//! # }
//! ```
//!
//! Managers and locators are plain values. Use a new manager, or call
//! [DelaunayManager::triangulation] again, for every independent run.

#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod bounding_rect;
mod config;
pub mod delaunay_core;
mod error;
mod locate;
mod manager;
mod point;
mod triangulation;
mod vertex;

#[cfg(test)]
mod test_utilities;

pub use bounding_rect::BoundingRect;
pub use config::TriangulationConfig;
pub use error::{InsertionError, TriangulationError};
pub use point::{DelaunayNum, HasPosition, Point2};
pub use triangulation::Triangle;
pub use vertex::{Vertex, VertexId};

pub use delaunay_core::math::{
    contained_in_circumference, mitigate_underflow, side_query, validate_coordinate,
    validate_vertex, MAX_ALLOWED_VALUE, MIN_ALLOWED_VALUE,
};
pub use delaunay_core::LineSideInfo;

pub use locate::{
    HistoryDagLocator, LocatorHandle, LocatorSlots, PointLocator, QuadTreeLocator, WalkLocator,
    MAX_QUAD_TREE_DEPTH,
};
pub use manager::{DelaunayManager, EdgeFlipManager, WatsonManager};
