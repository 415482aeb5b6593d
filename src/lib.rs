//! A* route planning over road networks, with support for starting or
//! ending a search at arbitrary off-graph coordinates.
//!
//! A query point that does not coincide with a road connection is snapped
//! onto the nearest segment and *virtualized*: two synthetic one-way
//! segments are grafted from the query coordinate to the real segment's
//! endpoints, so the generic search can enter and leave the real graph
//! anywhere along a road. Returned paths contain only real segments.

pub mod error;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;
pub use model::{RoadNetwork, RoadNetworkBuilder, RoadPath, StandardRoadNetwork};
pub use routing::RoadAStar;

/// Distance below which two positions are considered the same point.
pub const DISTANCE_EPSILON: f64 = 1e-6;
