//! Graph capability traits for road connections and segments
//!
//! Only the search-relevant capability tier is expressed here: the
//! operations the planner needs from a vertex (position, adjacency,
//! identity) and from an edge (endpoints, length, traversability,
//! attributes). Both the persistent network elements and the per-search
//! virtual elements implement these traits; richer graph-navigation
//! queries exist only on the concrete network types.

use std::rc::Rc;

use geo::{Distance, Euclidean, LineString, Point};

use crate::DISTANCE_EPSILON;
use crate::model::attributes::{AttributeValue, RoadType, TrafficDirection};
use crate::model::network::{ConnectionId, SegmentId};

pub type ConnectionRef = Rc<dyn RoadConnection>;
pub type SegmentRef = Rc<dyn RoadSegment>;

/// Identity of a connection point, usable as a visited-set key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PointId {
    /// A persistent connection owned by a road network
    Real(ConnectionId),
    /// A per-search virtual point
    Virtual(u64),
}

/// Which endpoint of a virtualized segment a virtual segment leads to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EndpointSide {
    Begin,
    End,
}

/// Identity of a segment, usable as a visited-set key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeId {
    /// A persistent segment owned by a road network
    Real(SegmentId),
    /// A virtual segment, identified by its owning point and direction
    Virtual(u64, EndpointSide),
}

/// Adjacency record pairing a connection point with one of its segments
pub struct PointConnection {
    pub segment: SegmentRef,
    /// Whether the segment is attached to the point by its begin point
    pub start_connected: bool,
}

/// A vertex of the road graph
pub trait RoadConnection {
    fn id(&self) -> PointId;

    /// Physical position of the connection
    fn position(&self) -> Point<f64>;

    fn connected_segment_count(&self) -> usize;

    fn connected_segment(&self, index: usize) -> Option<SegmentRef>;

    fn connected_segments(&self) -> Vec<SegmentRef>;

    /// Adjacency records for every connected segment
    fn connections(&self) -> Vec<PointConnection>;

    fn is_connected_segment(&self, segment: &dyn RoadSegment) -> bool {
        self.connected_segments()
            .iter()
            .any(|s| s.id() == segment.id())
    }

    /// The other segment attached to this point, when the point joins
    /// exactly two segments.
    fn other_side_segment(&self, reference: &dyn RoadSegment) -> Option<SegmentRef> {
        if self.connected_segment_count() != 2 {
            return None;
        }
        let segments = self.connected_segments();
        if segments[0].id() == reference.id() {
            Some(segments[1].clone())
        } else if segments[1].id() == reference.id() {
            Some(segments[0].clone())
        } else {
            None
        }
    }

    fn is_near_point(&self, point: &Point<f64>) -> bool {
        Euclidean.distance(self.position(), *point) <= DISTANCE_EPSILON
    }

    /// The real segment this point was snapped onto; `None` for
    /// persistent connections.
    fn virtualized_segment(&self) -> Option<SegmentRef> {
        None
    }
}

/// A directed-capable edge of the road graph
pub trait RoadSegment {
    fn id(&self) -> EdgeId;

    fn begin_point(&self) -> ConnectionRef;

    fn end_point(&self) -> ConnectionRef;

    fn other_side_point(&self, point: &dyn RoadConnection) -> Option<ConnectionRef> {
        let begin = self.begin_point();
        if begin.id() == point.id() {
            return Some(self.end_point());
        }
        let end = self.end_point();
        if end.id() == point.id() {
            return Some(begin);
        }
        None
    }

    /// Geometric length of the segment
    fn length(&self) -> f64;

    fn geometry(&self) -> LineString<f64>;

    /// Whether traffic may leave `point` along this segment
    fn is_traversable_from(&self, point: &dyn RoadConnection) -> bool;

    fn lane_count(&self) -> u32;

    fn road_type(&self) -> RoadType;

    fn traffic_direction(&self) -> TrafficDirection;

    fn name(&self) -> Option<String>;

    fn attribute(&self, key: &str) -> Option<AttributeValue>;

    /// The real segment this segment virtualizes; `None` for persistent
    /// segments. Also serves as the "is virtual" predicate.
    fn virtualized_segment(&self) -> Option<SegmentRef> {
        None
    }
}
