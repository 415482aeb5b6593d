//! Data model for road routing
//!
//! Contains the graph capability traits, the standard road network
//! implementation and the path result type.

pub mod attributes;
pub mod network;
pub mod path;
pub mod primitives;

pub use attributes::{AttributeValue, RoadAttributes, RoadType, TrafficDirection};
pub use network::{ConnectionId, RoadNetwork, RoadNetworkBuilder, SegmentId, StandardRoadNetwork};
pub use path::RoadPath;
pub use primitives::{
    ConnectionRef, EdgeId, EndpointSide, PointConnection, PointId, RoadConnection, RoadSegment,
    SegmentRef,
};
