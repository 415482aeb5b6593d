//! Convenient re-exports of the commonly used types
//!
//! ```
//! use roadstar::prelude::*;
//! ```

pub use crate::error::Error;
pub use crate::model::{
    AttributeValue, ConnectionId, ConnectionRef, EdgeId, PointId, RoadAttributes, RoadConnection,
    RoadNetwork, RoadNetworkBuilder, RoadPath, RoadSegment, RoadType, SegmentId, SegmentRef,
    StandardRoadNetwork, TrafficDirection,
};
pub use crate::routing::{
    AStar, AStarCostComputer, AStarHeuristic, AStarHooks, EuclideanHeuristic, RoadAStar,
    VirtualPoint,
};
